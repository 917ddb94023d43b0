use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub yt_dlp_path: Option<String>,
    pub ffmpeg_path: Option<String>,
    pub cookies_from_browser: Option<String>,
}

impl Config {
    /// Load config from ~/.config/vidgrab/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn yt_dlp(&self) -> &str {
        self.yt_dlp_path.as_deref().unwrap_or("yt-dlp")
    }

    pub fn ffmpeg(&self) -> &str {
        self.ffmpeg_path.as_deref().unwrap_or("ffmpeg")
    }

    /// Arguments passed to every yt-dlp invocation
    pub fn yt_dlp_common_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref ffmpeg) = self.ffmpeg_path {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.clone());
        }
        if let Some(ref browser) = self.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }
        args
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("vidgrab")
        .join("config.toml")
}
