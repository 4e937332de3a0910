use eframe::egui;
use rusty_spectra::app::RustySpectraApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Spectra – Time-resolved Spectra Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustySpectraApp::default()))),
    )
}
