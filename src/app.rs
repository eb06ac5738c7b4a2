use crate::event::Event;
use crate::interop::spawn_interop_thread;
use crate::ui::launcher::Launcher;
use eframe::{egui, epi};

use std::time::Duration;

pub struct App {
    launcher: Launcher,
    sender: crossbeam::channel::Sender<Event>,
    receiver: crossbeam::channel::Receiver<Event>,
}

impl Default for App {
    fn default() -> Self {
        let (app_worker_send, app_worker_recv) = crossbeam::channel::unbounded();
        let (worker_app_send, worker_app_recv) = crossbeam::channel::unbounded();

        spawn_interop_thread(worker_app_send, app_worker_recv);

        Self {
            launcher: Default::default(),
            sender: app_worker_send,
            receiver: worker_app_recv,
        }
    }
}

impl epi::App for App {
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &epi::Frame) {
        let Self {
            launcher,
            sender,
            receiver,
        } = self;

        crate::interop::match_events(receiver, ctx, launcher);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(), |ui| {
                if ui
                    .add(egui::Button::new(
                        egui::RichText::new("Settings").text_style(egui::TextStyle::Small),
                    ))
                    .clicked()
                {
                    launcher.show_settings = !launcher.show_settings;
                }
            });
            launcher.ui(ui, sender);
        });

        launcher.ui_settings(ctx);
    }

    fn setup(
        &mut self,
        _ctx: &egui::CtxRef,
        frame: &epi::Frame,
        _storage: Option<&dyn epi::Storage>,
    ) {
        frame.set_window_size(egui::Vec2::new(400.0, 400.0));
        let lock = frame.0.lock().unwrap();
        let repaint_signal = lock.repaint_signal.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(Duration::from_millis(100));
            repaint_signal.request_repaint();
        });
    }

    fn save(&mut self, _storage: &mut dyn epi::Storage) {
        self.launcher.save();
    }

    fn name(&self) -> &str {
        "8bit Duels Launcher"
    }
}
