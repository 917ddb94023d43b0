use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidgrab",
    about = "Interactive video downloader, trimmer and compressor",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Config file (defaults to ~/.config/vidgrab/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show config and tool locations on startup
    #[arg(short, long)]
    pub verbose: bool,
}
