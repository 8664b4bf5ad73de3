//! Inkstone - volume/chapter based long-form writing editor
//!
//! Desktop entry point; the project core lives in the `inkstone` library.

use eframe::egui;
use inkstone::app::InkstoneApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Inkstone...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Inkstone"),
        ..Default::default()
    };

    eframe::run_native(
        "Inkstone",
        native_options,
        Box::new(|cc| Ok(Box::new(InkstoneApp::new(cc)))),
    )
}
