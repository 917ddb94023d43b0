use std::process::{Command, Stdio};

use eyre::{Result, bail};
use log::{debug, info};
use serde::Deserialize;

use crate::config::Config;
use crate::job::DownloadJob;

/// One downloadable stream variant as reported by `yt-dlp --dump-single-json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatDescriptor {
    pub height: Option<u32>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    /// Average total bitrate in kbps
    pub tbr: Option<f64>,
    /// Average audio bitrate in kbps
    pub abr: Option<f64>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
}

impl FormatDescriptor {
    /// A missing `vcodec` still counts as video; only an explicit "none" does not.
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none") && self.acodec.as_deref() != Some("none")
    }
}

/// Metadata for a single video
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub formats: Vec<FormatDescriptor>,
}

impl VideoInfo {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Video")
    }

    pub fn duration_secs(&self) -> Option<u64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0).map(|d| d as u64)
    }
}

/// Fetch metadata only (no media) for `url`
pub fn fetch_info(config: &Config, url: &str) -> Result<VideoInfo> {
    let program = config.yt_dlp();
    let mut args = vec![
        "--dump-single-json".to_string(),
        "--no-playlist".to_string(),
        "--quiet".to_string(),
        "--no-warnings".to_string(),
    ];
    args.extend(config.yt_dlp_common_args());
    args.push(url.to_string());

    debug!("Fetching metadata: {program} {}", args.join(" "));

    let output = match Command::new(program).args(&args).stdin(Stdio::null()).output() {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => bail!(not_found_hint(program)),
        Err(e) => bail!("failed to run {program}: {e}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{program} exited with status {}: {}", output.status, stderr.trim());
    }

    let info = parse_info(&output.stdout)?;
    info!(
        "Metadata for {url}: title={:?} duration={:?} formats={}",
        info.title,
        info.duration,
        info.formats.len()
    );
    Ok(info)
}

fn parse_info(stdout: &[u8]) -> Result<VideoInfo> {
    serde_json::from_slice(stdout).map_err(|e| eyre::eyre!("could not parse yt-dlp metadata: {e}"))
}

/// Download `url` with the given job configuration, letting yt-dlp draw its own progress
pub fn download(config: &Config, url: &str, job: &DownloadJob) -> Result<()> {
    let program = config.yt_dlp();
    let mut args = job.to_args();
    args.extend(config.yt_dlp_common_args());
    args.push(url.to_string());

    debug!("Downloading: {program} {}", args.join(" "));

    let status = Command::new(program).args(&args).status();
    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => bail!("{program} exited with status {s}"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => bail!(not_found_hint(program)),
        Err(e) => bail!("failed to run {program}: {e}"),
    }
}

fn not_found_hint(program: &str) -> String {
    format!(
        "{program} not found. Install it to fetch videos:\n  \
         pip install yt-dlp\n  \
         or: brew install yt-dlp"
    )
}
