use std::collections::BTreeMap;
use std::fmt;

use crate::estimate::estimate_size_mb;
use crate::ytdlp::FormatDescriptor;

/// A selectable resolution with its estimated merged (video + best audio) size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityOption {
    pub height: u32,
    pub size_mb: f64,
}

impl fmt::Display for QualityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size_mb > 0.0 {
            write!(f, "{}p (~{:.1} MB)", self.height, self.size_mb)
        } else {
            write!(f, "{}p", self.height)
        }
    }
}

/// Pick the audio-only format with the highest bitrate; the first one wins ties.
pub fn best_audio(formats: &[FormatDescriptor]) -> Option<&FormatDescriptor> {
    let bitrate = |f: &FormatDescriptor| f.abr.or(f.tbr).unwrap_or(0.0);

    formats
        .iter()
        .filter(|f| f.is_audio_only())
        .fold(None, |best: Option<&FormatDescriptor>, f| match best {
            Some(b) if bitrate(f) <= bitrate(b) => Some(b),
            _ => Some(f),
        })
}

/// Build the resolution list shown to the user, highest first.
///
/// Each height appears once, carrying the largest combined size seen for it.
pub fn build_catalog(formats: &[FormatDescriptor], duration_secs: Option<f64>) -> Vec<QualityOption> {
    let best_audio_size = best_audio(formats)
        .map(|a| estimate_size_mb(a, duration_secs))
        .unwrap_or(0.0);

    let mut by_height: BTreeMap<u32, f64> = BTreeMap::new();
    for f in formats.iter().filter(|f| f.has_video()) {
        let Some(height) = f.height.filter(|h| *h > 0) else {
            continue;
        };
        let combined = estimate_size_mb(f, duration_secs) + best_audio_size;
        by_height
            .entry(height)
            .and_modify(|size| {
                if combined > *size {
                    *size = combined;
                }
            })
            .or_insert(combined);
    }

    by_height
        .into_iter()
        .rev()
        .map(|(height, size_mb)| QualityOption { height, size_mb })
        .collect()
}
