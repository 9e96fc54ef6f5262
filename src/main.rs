#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use markpad::MarkpadApp;

fn main() -> eframe::Result {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Markpad")
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "markpad",
        native_options,
        Box::new(|cc| Ok(Box::new(MarkpadApp::new(cc)))),
    )
}
