pub mod catalog;
pub mod config;
pub mod estimate;
pub mod ffmpeg;
pub mod job;
pub mod output;
pub mod session;
pub mod timecode;
pub mod tools;
pub mod ytdlp;

pub use catalog::{QualityOption, build_catalog};
pub use job::{DownloadJob, EncodeJob, JobPlan, JobRequest, TimeRange};
pub use session::{Screen, Session};
pub use tools::{SystemTools, Toolchain};
pub use ytdlp::{FormatDescriptor, VideoInfo};
