use crate::event::Event;
use crate::launch::{LaunchError, LauncherConfig};
use crossbeam::channel::Sender;
use eframe::egui;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum LaunchPhase {
    Idle,
    Fetching,
    Launching,
    Running,
    Failed,
}

impl Default for LaunchPhase {
    fn default() -> Self {
        Self::Idle
    }
}

const HISTORY_LIMIT: usize = 16;

#[derive(Debug)]
pub struct Launcher {
    pub config: LauncherConfig,
    pub phase: LaunchPhase,
    pub status: Option<String>,
    pub history: Vec<String>,
    pub show_settings: bool,
}

impl Default for Launcher {
    fn default() -> Self {
        let config = confy::load::<LauncherConfig>("duelauncher/launcher").unwrap_or_default();

        Self {
            config,
            phase: Default::default(),
            status: None,
            history: vec![],
            show_settings: false,
        }
    }
}

impl Launcher {
    pub fn save(&self) {
        confy::store("duelauncher/launcher", self.config.clone()).unwrap();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn record_exit(&mut self, code: Option<i32>) {
        let line = match code {
            Some(0) => "Game exited cleanly".to_string(),
            Some(code) => format!("Game exited with code {}", code),
            None => "Game was killed by a signal".to_string(),
        };
        self.set_status(line.clone());
        self.push_history(line);
    }

    pub fn record_abort(&mut self, error: LaunchError) {
        let line = error.to_string();
        self.set_status(line.clone());
        self.push_history(line);
    }

    fn push_history(&mut self, line: String) {
        self.history.push(line);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, sender: &Sender<Event>) {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new("8bit Duels Launcher")
                    .text_style(egui::TextStyle::Heading)
                    .color(crate::ui::colors::INDIGO_A700),
            );
            ui.add_space(5.0);
            self.ui_status(ui);
            ui.add_space(10.0);
            self.ui_actions(ui, sender);
            ui.add_space(10.0);
            ui.add(egui::Separator::default());
            self.ui_history(ui);
        });
    }

    fn ui_status(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new(self.phase.to_string())
                .text_style(egui::TextStyle::Button)
                .color(self.phase_color()),
        );
        if let Some(status) = &self.status {
            ui.label(egui::RichText::new(status));
        }
    }

    fn phase_color(&self) -> egui::Color32 {
        match self.phase {
            LaunchPhase::Idle => crate::ui::colors::GRAY_A500,
            LaunchPhase::Fetching => crate::ui::colors::BLUE_A400,
            LaunchPhase::Launching => crate::ui::colors::YELLOW_A800,
            LaunchPhase::Running => crate::ui::colors::GREEN_A400,
            LaunchPhase::Failed => crate::ui::colors::RED_A500,
        }
    }

    fn ui_actions(&mut self, ui: &mut egui::Ui, sender: &Sender<Event>) {
        match self.phase {
            LaunchPhase::Idle | LaunchPhase::Failed => {
                self.ui_launch_button(ui, sender, "Launch");
            }
            LaunchPhase::Fetching => {
                self.ui_cancel_button(ui, sender);
            }
            LaunchPhase::Launching => {
                ui.add(
                    egui::Button::new(
                        egui::RichText::new("Launching")
                            .text_style(egui::TextStyle::Heading)
                            .color(egui::Color32::WHITE),
                    )
                    .fill(crate::ui::colors::GRAY_A500)
                    .sense(egui::Sense {
                        click: false,
                        drag: false,
                        focusable: false,
                    }),
                );
            }
            LaunchPhase::Running => {
                self.ui_launch_button(ui, sender, "Launch again");
            }
        }
    }

    fn ui_launch_button(&mut self, ui: &mut egui::Ui, sender: &Sender<Event>, text: &str) {
        let button = ui.add(
            egui::Button::new(
                egui::RichText::new(text)
                    .text_style(egui::TextStyle::Heading)
                    .color(egui::Color32::WHITE),
            )
            .fill(crate::ui::colors::BLUE_A400),
        );

        if button.clicked() {
            self.phase = LaunchPhase::Fetching;
            self.set_status("Contacting upstream");
            sender.send(Event::Launch(self.config.clone())).unwrap();
        }
    }

    fn ui_cancel_button(&mut self, ui: &mut egui::Ui, sender: &Sender<Event>) {
        let button = ui.add(
            egui::Button::new(
                egui::RichText::new("Cancel")
                    .text_style(egui::TextStyle::Heading)
                    .color(egui::Color32::WHITE),
            )
            .fill(crate::ui::colors::RED_A500),
        );

        if button.clicked() {
            sender.send(Event::CancelFetch).unwrap();
        }
    }

    fn ui_history(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for line in self.history.iter().rev() {
                    ui.label(egui::RichText::new(line).text_style(egui::TextStyle::Small));
                }
            });
    }

    pub fn ui_settings(&mut self, ctx: &egui::CtxRef) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .drag_bounds(ctx.used_rect())
            .show(ctx, |ui| {
                egui::Grid::new("settings")
                    .spacing(egui::Vec2::new(5.0, 5.0))
                    .show(ui, |ui| {
                        ui.label("Repository");
                        ui.text_edit_singleline(&mut self.config.repo_url);
                        ui.end_row();
                        ui.label("Clone into");
                        ui.text_edit_singleline(&mut self.config.clone_dir);
                        ui.end_row();
                        ui.label("Run from");
                        ui.text_edit_singleline(&mut self.config.run_subdir);
                        ui.end_row();
                        ui.label("Run command");
                        ui.text_edit_singleline(&mut self.config.run_command);
                        ui.end_row();
                    });
            });
        self.show_settings = open;
    }
}
