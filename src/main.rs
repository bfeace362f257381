mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::FacsViewerApp;
use eframe::egui;
use facs_smooth::logging::{init_default_logging, init_logging};
use facs_smooth::AppConfig;

/// Optional config file looked up in the working directory.
const CONFIG_FILE: &str = "facs-smooth.json";

fn main() -> eframe::Result {
    let path = Path::new(CONFIG_FILE);
    let loaded = if path.exists() {
        AppConfig::load(path)
    } else {
        Ok(AppConfig::default())
    };
    let config = match loaded {
        Ok(config) => {
            init_logging(&config.logging);
            config
        }
        Err(e) => {
            init_default_logging();
            log::warn!("{e:#}; using defaults");
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FACS Smooth – Channel Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(FacsViewerApp::new(&config)))),
    )
}
