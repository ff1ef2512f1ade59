mod app;
mod settings;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "UI Decorators",
        native_options,
        Box::new(|_cc| Ok(Box::new(app::DecoratorApp::new()))),
    )
}
