mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::LaunchDashApp;
use eframe::egui;
use launch_dash::config::Config;
use launch_dash::data::loader;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let path = resolve_data_path(&config)?;

    // The dataset is loaded exactly once; a bad source stops the process here.
    let dataset = loader::load_file(&path).inspect_err(|e| log::error!("{e:#}"))?;
    log::info!(
        "Loaded {} launches from {} (sites {:?}, payload bounds {:?})",
        dataset.len(),
        path.display(),
        dataset.sites(),
        dataset.payload_bounds()
    );
    if dataset.is_empty() {
        log::warn!("{} contains no launch records", path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("{e}"))
}

/// Use the configured file if it exists, otherwise ask for one.
fn resolve_data_path(config: &Config) -> Result<PathBuf> {
    if config.data_path.exists() {
        return Ok(config.data_path.clone());
    }

    log::warn!(
        "{} not found, asking for a launch records file",
        config.data_path.display()
    );
    rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
        .with_context(|| {
            format!(
                "no launch records file: {} does not exist and none was selected",
                config.data_path.display()
            )
        })
}
