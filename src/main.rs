use std::io;
use std::path::PathBuf;
use std::process::Command;

use eyre::Result;
use log::{info, warn};

mod cli;

use cli::Cli;
use vidgrab::config::{self, Config};
use vidgrab::{Session, SystemTools};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("vidgrab.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidgrab")
        .join("logs")
}

fn tool_version(name: &str, flag: &str) -> Option<String> {
    Command::new(name)
        .arg(flag)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn tool_line(label: &str, version: Option<String>, purpose: &str) -> String {
    match version {
        Some(v) => format!("  \x1b[32m✅\x1b[0m {label:<10} {v}"),
        None => format!("  \x1b[31m❌\x1b[0m {label:<10} (not found — needed for {purpose})"),
    }
}

fn build_after_help() -> String {
    let yt_dlp_line = tool_line("yt-dlp", tool_version("yt-dlp", "--version"), "downloads");
    let ffmpeg_line = tool_line("ffmpeg", tool_version("ffmpeg", "-version"), "merging and compression");

    let log_path = log_dir().join("vidgrab.log");

    format!(
        "\nREQUIRED TOOLS:\n{yt_dlp_line}\n{ffmpeg_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);

    // A broken config file is reported but never fatal
    let config = Config::load_from(&config_path).unwrap_or_else(|e| {
        warn!("Ignoring config {}: {e}", config_path.display());
        eprintln!("Ignoring config {}: {e}", config_path.display());
        Config::default()
    });

    if cli.verbose {
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("yt-dlp: {}", config.yt_dlp());
        eprintln!("ffmpeg: {}", config.ffmpeg());
        eprintln!("Logs: {}", log_dir().join("vidgrab.log").display());
    }

    let stdin = io::stdin();
    let mut session = Session::new(SystemTools::new(config), stdin.lock(), io::stdout());
    session.run()?;

    info!("Session ended");
    Ok(())
}
