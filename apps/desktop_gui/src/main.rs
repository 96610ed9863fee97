use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings, load_settings_from, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{CustomerDeskApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "customer-desk", about = "Desktop form for the customer list")]
struct Args {
    /// Settings file; defaults to ./customers.toml
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    site: Option<String>,
    #[arg(long)]
    list: Option<String>,
    /// Bearer token for the list service; ACCESS_TOKEN is read otherwise
    #[arg(long)]
    access_token: Option<String>,
}

impl Args {
    fn settings(&self) -> Settings {
        let mut settings = match &self.config {
            Some(path) => load_settings_from(path),
            None => load_settings(),
        };
        if let Some(site) = &self.site {
            settings.site_url = site.clone();
        }
        if let Some(list) = &self.list {
            settings.list_name = list.clone();
        }
        if let Some(token) = &self.access_token {
            settings.access_token = Some(token.clone());
        }
        settings
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Args::parse().settings();
    let startup = StartupConfig {
        caption: settings.description.clone(),
        list_name: settings.list_name.clone(),
        site_url: settings.site_url.clone(),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Customer Desk")
            .with_inner_size([560.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Customer Desk",
        options,
        Box::new(|_cc| Ok(Box::new(CustomerDeskApp::new(cmd_tx, ui_rx, startup)))),
    )
}
