#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 480.0])
            .with_title("ZigZag Map"),
        ..Default::default()
    };

    eframe::run_native(
        "ZigZag Map",
        options,
        Box::new(|cc| Ok(Box::new(app::ZigzagApp::new(cc)))),
    )
}
