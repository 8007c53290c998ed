use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Interactive 2D floor-plan editor", long_about = None)]
pub struct Cli {
    /// Scene JSON document to open on startup.
    pub scene: Option<PathBuf>,

    /// Open the window already maximized/fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Path to an editor config JSON document (defaults baked in if absent).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
