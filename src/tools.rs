use std::path::PathBuf;

use eyre::Result;

use crate::config::Config;
use crate::ffmpeg;
use crate::job::{DownloadJob, EncodeJob, VIDEO_EXTENSIONS};
use crate::ytdlp::{self, VideoInfo};

/// External collaborators the session drives: extractor, encoder and file picker
pub trait Toolchain {
    fn fetch_info(&self, url: &str) -> Result<VideoInfo>;
    fn download(&self, url: &str, job: &DownloadJob) -> Result<()>;
    fn encode(&self, job: &EncodeJob) -> Result<()>;
    /// `None` when the user cancels the dialog
    fn pick_video_file(&self) -> Option<PathBuf>;
}

/// The real thing: yt-dlp, ffmpeg and the native file dialog
pub struct SystemTools {
    config: Config,
}

impl SystemTools {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Toolchain for SystemTools {
    fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
        ytdlp::fetch_info(&self.config, url)
    }

    fn download(&self, url: &str, job: &DownloadJob) -> Result<()> {
        ytdlp::download(&self.config, url, job)
    }

    fn encode(&self, job: &EncodeJob) -> Result<()> {
        ffmpeg::encode(&self.config, job)
    }

    fn pick_video_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select a Video to Compress")
            .add_filter("Video Files", &VIDEO_EXTENSIONS)
            .pick_file()
    }
}
