//! PDF Measure
//!
//! Measure physical distances on PDF pages. Pass a PDF path to open it on
//! startup.

mod app;
mod pointer;
mod surface;

use app::MeasureApp;
use eframe::egui;
use pdf_measure_core::MeasureConfig;
use std::path::PathBuf;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = MeasureConfig::default_path();
    let config = MeasureConfig::load_or_default(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = config.save_to_file(&settings_path) {
            log::warn!("Could not write default settings: {}", e);
        }
    }

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("PDF Measure"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Measure",
        options,
        Box::new(|cc| Ok(Box::new(MeasureApp::new(cc, config, initial_file)))),
    )
}
