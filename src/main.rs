mod analysis;
mod app;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod worker;

use analysis::client::AnalysisClient;
use app::EpiAlertApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::info!("Analysis service at {}", config.service_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "EpiAlertR",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can fetch and render result plots.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let client = AnalysisClient::new(&config)?;
            Ok(Box::new(EpiAlertApp::new(&cc.egui_ctx, &config, client)))
        }),
    )
}
