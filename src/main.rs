// src/main.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod analysis;
mod app;
mod config;
mod file;
mod state;
mod ui;
mod view;
mod workflow;

use crate::analysis::HttpAnalysisService;
use crate::app::DashboardApp;
use crate::config::Settings;
use crate::file::SettingsFileHandler;

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

fn main() -> Result<()> {
    let settings_path = Settings::default_path();
    let settings = Settings::load(settings_path.as_deref())?;
    init_logging(&settings.log_filter);

    if let Some(path) = &settings_path {
        match SettingsFileHandler::new().ensure_default(path) {
            Ok(true) => info!(path = %path.display(), "wrote default settings"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not write default settings"),
        }
    }

    info!(base_url = %settings.base_url, locale = %settings.default_locale, "starting dashboard");
    let service = HttpAnalysisService::new(&settings)
        .context("Failed to set up the analysis service client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_title("Financial Health Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Financial Health Dashboard",
        options,
        Box::new(move |cc| {
            Box::new(DashboardApp::new(cc, settings, Arc::new(service)))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
