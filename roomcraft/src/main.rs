mod app;
mod cli;
mod hit_test;
mod interaction;
mod render;

use clap::Parser;
use roomcraft_engine::config::Config;
use roomcraft_engine::scene;

fn main() -> anyhow::Result<()> {
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().init();
    }

    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Config::from_json_str(&raw).map_err(|e| anyhow::anyhow!("invalid config: {e}"))?
        }
        None => Config::default(),
    };

    let initial_scene = match &cli.scene {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Some(scene::deserialize(&raw).map_err(|e| anyhow::anyhow!("invalid scene: {e}"))?)
        }
        None => None,
    };

    tracing::info!(fullscreen = cli.fullscreen, "starting roomcraft");

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_maximized(cli.fullscreen)
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "roomcraft",
        native_options,
        Box::new(move |_cc| Box::new(app::App::new(initial_scene, config, cli.fullscreen))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
