use eframe::egui;

pub const RED_A500: egui::Color32 = egui::Color32::from_rgb(244, 67, 54);

pub const INDIGO_A700: egui::Color32 = egui::Color32::from_rgb(48, 79, 254);

pub const BLUE_A400: egui::Color32 = egui::Color32::from_rgb(41, 121, 255);

pub const GREEN_A400: egui::Color32 = egui::Color32::from_rgb(0, 230, 118);

pub const YELLOW_A800: egui::Color32 = egui::Color32::from_rgb(251, 192, 45);

pub const GRAY_A500: egui::Color32 = egui::Color32::from_rgb(158, 158, 158);
