use crate::catalog::QualityOption;
use crate::timecode::seconds_to_clock;
use crate::ytdlp::VideoInfo;

pub const RULE: &str = "------------------------------------------------";

/// Render the top-level menu
pub fn render_main_menu() -> String {
    [
        "",
        "========================================",
        "   🎥  ULTIMATE DOWNLOADER & TRIMMER   ",
        "========================================",
        "1. Download Video (Full or Trim)",
        "2. Compression Tools 📉",
        "3. Exit",
    ]
    .join("\n")
}

pub fn render_compression_menu() -> String {
    [
        "",
        "--- 📉 Compression Menu ---",
        "1. Download from Link & Compress",
        "2. Compress a Local File",
        "3. Back",
    ]
    .join("\n")
}

/// Render title and duration of an analysed video
pub fn render_video_header(info: &VideoInfo) -> String {
    format!(
        "\n🎬 Title: {}\n⏱️ Duration: {}",
        info.title(),
        seconds_to_clock(info.duration_secs())
    )
}

/// Render the numbered quality list (1-based, highest resolution first)
pub fn render_catalog(catalog: &[QualityOption]) -> String {
    let mut lines = vec!["\nAvailable Qualities:".to_string()];
    lines.extend(
        catalog
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {option}", i + 1)),
    );
    lines.join("\n")
}

pub fn render_trim_menu(duration: &str) -> String {
    format!(
        "\n{RULE}\nVideo Length: {duration}\n1. Download Full Video\n2. Trim Video (Cut a specific part)"
    )
}
