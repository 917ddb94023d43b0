use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const VIDEO_CODEC: &str = "libx264";
pub const CRF: u8 = 28;
pub const PRESET: &str = "fast";
pub const AUDIO_CODEC: &str = "aac";
pub const AUDIO_BITRATE: &str = "128k";

/// Container every download is merged into
pub const MERGE_FORMAT: &str = "mp4";
pub const OUTPUT_TEMPLATE: &str = "%(title)s_%(height)sp.%(ext)s";

/// Extensions offered by the local file picker
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "mov", "avi", "flv", "webm"];

/// Inclusive start / end of a trim, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

impl TimeRange {
    /// Value for yt-dlp `--download-sections`
    pub fn section(&self) -> String {
        format!("*{}-{}", self.start, self.end)
    }
}

/// What the user asked for in one pass through the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Remote {
        url: String,
        height: Option<u32>,
        range: Option<TimeRange>,
        compress: bool,
    },
    Local {
        input: PathBuf,
    },
}

/// A fully assembled job, ready to hand to yt-dlp or ffmpeg
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPlan {
    Download { url: String, job: DownloadJob },
    Encode(EncodeJob),
}

impl From<JobRequest> for JobPlan {
    fn from(request: JobRequest) -> Self {
        match request {
            JobRequest::Remote {
                url,
                height,
                range,
                compress,
            } => JobPlan::Download {
                url,
                job: DownloadJob::new(height, range, compress),
            },
            JobRequest::Local { input } => JobPlan::Encode(EncodeJob::new(input)),
        }
    }
}

/// yt-dlp options for a single download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub format: String,
    pub output_template: String,
    pub merge_output_format: String,
    pub range: Option<TimeRange>,
    pub force_keyframes_at_cuts: bool,
    /// Arguments for the merger post-processor, present only when compressing
    pub merger_args: Option<Vec<String>>,
}

impl DownloadJob {
    pub fn new(height: Option<u32>, range: Option<TimeRange>, compress: bool) -> Self {
        Self {
            format: format_selector(height),
            output_template: OUTPUT_TEMPLATE.to_string(),
            merge_output_format: MERGE_FORMAT.to_string(),
            range,
            force_keyframes_at_cuts: range.is_some(),
            merger_args: compress.then(encoder_args),
        }
    }

    pub fn compress(&self) -> bool {
        self.merger_args.is_some()
    }

    /// Render as yt-dlp command-line arguments (without the URL)
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            self.output_template.clone(),
            "--merge-output-format".to_string(),
            self.merge_output_format.clone(),
            "--no-playlist".to_string(),
        ];

        if let Some(range) = self.range {
            args.push("--download-sections".to_string());
            args.push(range.section());
        }
        if self.force_keyframes_at_cuts {
            args.push("--force-keyframes-at-cuts".to_string());
        }
        if let Some(merger_args) = &self.merger_args {
            args.push("--postprocessor-args".to_string());
            args.push(format!("Merger:{}", merger_args.join(" ")));
        }

        args
    }
}

/// Best video at exactly `height` plus best audio, else the best muxed stream at that height
pub fn format_selector(height: Option<u32>) -> String {
    match height {
        Some(h) => format!("bestvideo[height={h}]+bestaudio/best[height={h}]"),
        None => "bestvideo+bestaudio/best".to_string(),
    }
}

/// Fixed encoder settings shared by download post-processing and local compression
pub fn encoder_args() -> Vec<String> {
    vec![
        "-c:v".to_string(),
        VIDEO_CODEC.to_string(),
        "-crf".to_string(),
        CRF.to_string(),
        "-preset".to_string(),
        PRESET.to_string(),
        "-c:a".to_string(),
        AUDIO_CODEC.to_string(),
        "-b:a".to_string(),
        AUDIO_BITRATE.to_string(),
    ]
}

/// ffmpeg transcode of a local file to its `_compressed` sibling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl EncodeJob {
    pub fn new(input: PathBuf) -> Self {
        let output = compressed_path(&input);
        Self { input, output }
    }

    /// Render as ffmpeg command-line arguments
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), self.input.clone().into()];
        args.extend(encoder_args().into_iter().map(OsString::from));
        args.push(self.output.clone().into());
        args
    }
}

/// `dir/name.ext` becomes `dir/name_compressed.ext`
pub fn compressed_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_compressed.{}", ext.to_string_lossy()),
        None => format!("{stem}_compressed"),
    };
    input.with_file_name(name)
}
