use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Handle to the in-flight `git clone` child, shared with the cancel path.
pub type FetchSlot = Arc<Mutex<Option<Child>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub repo_url: String,
    pub clone_dir: String,
    pub run_subdir: String,
    pub run_command: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/ThousandthStar/8bit-duels".to_string(),
            clone_dir: "8bit-duels".to_string(),
            run_subdir: "client".to_string(),
            run_command: "cargo run".to_string(),
        }
    }
}

impl LauncherConfig {
    pub fn project_dir(&self) -> PathBuf {
        Path::new(&self.clone_dir).join(&self.run_subdir)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Download skipped, {} is already there", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Downloading failed, git is not installed")]
    ToolMissing,
    #[error("Downloading failed, defaulting to running")]
    Remote(String),
    #[error("Downloading failed: {0}")]
    Clone(String),
    #[error("Download cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    #[error("Nothing to run, {} is missing", .0.display())]
    MissingProjectDir(PathBuf),
    #[error("Run command is empty")]
    EmptyCommand,
    #[error("Could not start `{0}`: {1}")]
    Spawn(String, String),
}

/// Clone the upstream repository into the configured directory. The child is
/// parked in `slot` while it runs so `cancel_fetch` can reach it.
pub fn fetch(config: &LauncherConfig, slot: &FetchSlot) -> Result<(), FetchError> {
    let dest = Path::new(&config.clone_dir);
    if dest.exists() {
        return Err(FetchError::AlreadyExists(dest.to_path_buf()));
    }

    let mut child = Command::new("git")
        .arg("clone")
        .arg(&config.repo_url)
        .arg(&config.clone_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_fetch_error)?;

    let mut stderr = child.stderr.take();
    *slot.lock().unwrap() = Some(child);

    let status = loop {
        let polled = {
            let mut guard = slot.lock().unwrap();
            match guard.as_mut() {
                // cancel_fetch took the child and killed it
                None => return Err(FetchError::Cancelled),
                Some(child) => child.try_wait(),
            }
        };
        match polled {
            Ok(Some(status)) => break status,
            Ok(None) => std::thread::sleep(Duration::from_millis(50)),
            Err(e) => {
                slot.lock().unwrap().take();
                return Err(FetchError::Clone(e.to_string()));
            }
        }
    };
    slot.lock().unwrap().take();

    if status.success() {
        return Ok(());
    }

    let mut output = String::new();
    if let Some(stderr) = stderr.as_mut() {
        stderr.read_to_string(&mut output).ok();
    }
    Err(classify_clone_failure(dest, &output))
}

/// Kill and reap the in-flight clone, if any. Returns whether one was there.
pub fn cancel_fetch(slot: &FetchSlot) -> bool {
    if let Some(mut child) = slot.lock().unwrap().take() {
        child.kill().ok();
        child.wait().ok();
        true
    } else {
        false
    }
}

fn spawn_fetch_error(error: std::io::Error) -> FetchError {
    if error.kind() == std::io::ErrorKind::NotFound {
        FetchError::ToolMissing
    } else {
        FetchError::Clone(error.to_string())
    }
}

fn classify_clone_failure(dest: &Path, stderr: &str) -> FetchError {
    let detail = stderr.trim().to_string();
    let lowered = detail.to_lowercase();
    if lowered.contains("already exists") {
        return FetchError::AlreadyExists(dest.to_path_buf());
    }
    let remote_markers = [
        "could not resolve host",
        "unable to access",
        "connection refused",
        "connection timed out",
        "authentication failed",
        "permission denied",
        "could not read from remote",
    ];
    if remote_markers.iter().any(|marker| lowered.contains(marker)) {
        return FetchError::Remote(detail);
    }
    FetchError::Clone(detail)
}

pub fn resolve_project_dir(config: &LauncherConfig) -> Result<PathBuf, LaunchError> {
    let dir = config.project_dir();
    if !dir.is_dir() {
        return Err(LaunchError::MissingProjectDir(dir));
    }
    Ok(dir)
}

/// Spawn the run command with the project directory passed explicitly,
/// leaving the launcher's own working directory alone.
pub fn spawn_game(config: &LauncherConfig, dir: &Path) -> Result<Child, LaunchError> {
    let mut parts = config.run_command.split_whitespace();
    let program = parts.next().ok_or(LaunchError::EmptyCommand)?;
    Command::new(program)
        .args(parts)
        .current_dir(dir)
        .spawn()
        .map_err(|e| LaunchError::Spawn(config.run_command.clone(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> LauncherConfig {
        LauncherConfig {
            clone_dir: dir.join("8bit-duels").to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_matches_upstream() {
        let config = LauncherConfig::default();
        assert_eq!(
            config.repo_url,
            "https://github.com/ThousandthStar/8bit-duels"
        );
        assert_eq!(config.clone_dir, "8bit-duels");
        assert_eq!(config.run_subdir, "client");
        assert_eq!(config.run_command, "cargo run");
    }

    #[test]
    fn fetch_refuses_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        std::fs::create_dir(&config.clone_dir).unwrap();
        let slot = FetchSlot::default();
        match fetch(&config, &slot) {
            Err(FetchError::AlreadyExists(path)) => {
                assert_eq!(path, Path::new(&config.clone_dir))
            }
            other => panic!("unexpected fetch result: {:?}", other),
        }
    }

    #[test]
    fn classifies_destination_collision() {
        let err = classify_clone_failure(
            Path::new("8bit-duels"),
            "fatal: destination path '8bit-duels' already exists and is not an empty directory.",
        );
        assert_eq!(err, FetchError::AlreadyExists(PathBuf::from("8bit-duels")));
    }

    #[test]
    fn classifies_unreachable_remote() {
        let err = classify_clone_failure(
            Path::new("8bit-duels"),
            "Cloning into '8bit-duels'...\nfatal: unable to access \
             'https://github.com/ThousandthStar/8bit-duels/': Could not resolve host: github.com",
        );
        assert!(matches!(err, FetchError::Remote(_)));
        assert_eq!(err.to_string(), "Downloading failed, defaulting to running");
    }

    #[test]
    fn classifies_rejected_credentials() {
        let err = classify_clone_failure(
            Path::new("8bit-duels"),
            "fatal: Authentication failed for 'https://github.com/ThousandthStar/8bit-duels/'",
        );
        assert!(matches!(err, FetchError::Remote(_)));
    }

    #[test]
    fn missing_git_is_reported_distinctly() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(spawn_fetch_error(io), FetchError::ToolMissing);
    }

    #[test]
    fn resolves_run_directory_only_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        assert!(matches!(
            resolve_project_dir(&config),
            Err(LaunchError::MissingProjectDir(_))
        ));
        std::fs::create_dir_all(config.project_dir()).unwrap();
        assert_eq!(resolve_project_dir(&config).unwrap(), config.project_dir());
    }

    #[test]
    fn spawns_run_command_in_the_project_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.run_command = "rm started.marker".to_string();
        std::fs::create_dir_all(config.project_dir()).unwrap();
        let dir = resolve_project_dir(&config).unwrap();
        let marker = dir.join("started.marker");
        std::fs::write(&marker, "x").unwrap();

        let mut child = spawn_game(&config, &dir).unwrap();
        let status = child.wait().unwrap();
        assert!(status.success());
        // the marker is only reachable relative to the explicit working dir
        assert!(!marker.exists());
    }

    #[test]
    fn empty_run_command_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.run_command = "   ".to_string();
        assert_eq!(
            spawn_game(&config, tmp.path()).unwrap_err(),
            LaunchError::EmptyCommand
        );
    }

    #[test]
    fn cancel_without_inflight_fetch_is_a_noop() {
        let slot = FetchSlot::default();
        assert!(!cancel_fetch(&slot));
    }

    #[test]
    fn cancel_kills_the_parked_child() {
        let slot = FetchSlot::default();
        let child = Command::new("sleep").arg("5").spawn().unwrap();
        *slot.lock().unwrap() = Some(child);

        let begin = std::time::Instant::now();
        assert!(cancel_fetch(&slot));
        assert!(begin.elapsed() < Duration::from_secs(5));
        assert!(slot.lock().unwrap().is_none());
    }
}
