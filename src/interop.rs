use crate::event::Event;
use crate::launch::{self, FetchError, FetchSlot, LauncherConfig};
use crate::ui::launcher::{LaunchPhase, Launcher};
use crossbeam::channel::{Receiver, Sender};
use eframe::egui;

pub fn spawn_interop_thread(sender: Sender<Event>, receiver: Receiver<Event>) {
    let slot = FetchSlot::default();
    std::thread::spawn(move || {
        while let Ok(event) = receiver.recv() {
            match event {
                Event::Launch(config) => {
                    let sender = sender.clone();
                    let slot = slot.clone();
                    std::thread::spawn(move || {
                        run_launch(config, sender, slot);
                    });
                }
                Event::CancelFetch => {
                    if launch::cancel_fetch(&slot) {
                        log::info!("cancelled in-flight download");
                    }
                }
                _ => {}
            }
        }
    });
}

fn run_launch(config: LauncherConfig, sender: Sender<Event>, slot: FetchSlot) {
    sender.send(Event::FetchStarted).unwrap();
    log::info!("cloning {} into {}", config.repo_url, config.clone_dir);

    let fetched = launch::fetch(&config, &slot);
    let cancelled = matches!(fetched, Err(FetchError::Cancelled));
    if let Err(e) = &fetched {
        log::warn!("download failed: {}", e);
    }
    sender.send(Event::FetchFinished(fetched)).unwrap();
    if cancelled {
        return;
    }

    let dir = match launch::resolve_project_dir(&config) {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("launch aborted: {}", e);
            sender.send(Event::LaunchAborted(e)).unwrap();
            return;
        }
    };

    let mut child = match launch::spawn_game(&config, &dir) {
        Ok(child) => child,
        Err(e) => {
            log::error!("launch aborted: {}", e);
            sender.send(Event::LaunchAborted(e)).unwrap();
            return;
        }
    };
    log::info!("running `{}` in {}", config.run_command, dir.display());
    sender.send(Event::GameStarted(child.id())).unwrap();

    let code = match child.wait() {
        Ok(status) => status.code(),
        Err(e) => {
            log::error!("failed to wait on the game process: {}", e);
            None
        }
    };
    log::info!("game exited with {:?}", code);
    sender.send(Event::GameExited(code)).unwrap();
}

pub fn match_events(receiver: &mut Receiver<Event>, ctx: &egui::CtxRef, launcher: &mut Launcher) {
    while let Ok(event) = receiver.recv_deadline(std::time::Instant::now()) {
        match event {
            Event::FetchStarted => {
                launcher.phase = LaunchPhase::Fetching;
                launcher.set_status("Downloading 8bit Duels");
            }
            Event::FetchFinished(Ok(())) => {
                launcher.phase = LaunchPhase::Launching;
                launcher.set_status("Download finished");
            }
            Event::FetchFinished(Err(FetchError::Cancelled)) => {
                launcher.phase = LaunchPhase::Idle;
                launcher.set_status("Download cancelled");
            }
            Event::FetchFinished(Err(e)) => {
                launcher.phase = LaunchPhase::Launching;
                launcher.set_status(e.to_string());
            }
            Event::GameStarted(pid) => {
                launcher.phase = LaunchPhase::Running;
                launcher.set_status(format!("Game running (pid {})", pid));
            }
            Event::GameExited(code) => {
                launcher.phase = LaunchPhase::Idle;
                launcher.record_exit(code);
            }
            Event::LaunchAborted(e) => {
                launcher.phase = LaunchPhase::Failed;
                launcher.record_abort(e);
            }
            _ => {}
        }
        ctx.request_repaint();
    }
}
