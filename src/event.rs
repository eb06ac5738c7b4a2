use crate::launch::{FetchError, LaunchError, LauncherConfig};

#[derive(Debug)]
pub enum Event {
    Launch(LauncherConfig),
    CancelFetch,
    FetchStarted,
    FetchFinished(Result<(), FetchError>),
    GameStarted(u32),
    GameExited(Option<i32>),
    LaunchAborted(LaunchError),
}
