use std::process::Command;

use eyre::{Result, bail};
use log::debug;

use crate::config::Config;
use crate::job::EncodeJob;

/// Run ffmpeg over a local file, blocking until it exits
pub fn encode(config: &Config, job: &EncodeJob) -> Result<()> {
    let program = config.ffmpeg();
    let args = job.to_args();
    debug!(
        "Encoding: {program} {}",
        args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
    );

    match Command::new(program).args(&args).status() {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => bail!("{program} exited with status {s}"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!(
                "{program} not found. Install it to compress videos:\n  \
                 sudo apt install ffmpeg\n  \
                 or: brew install ffmpeg"
            );
        }
        Err(e) => bail!("failed to run {program}: {e}"),
    }
}
