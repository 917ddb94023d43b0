use crate::ytdlp::FormatDescriptor;

/// Megabytes are binary throughout (1 MB = 1024 * 1024 bytes)
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Estimate the download size of one format in MB.
///
/// Precedence: declared filesize, then approximate filesize, then
/// `tbr * 1000 / 8 * duration`. Returns 0 when nothing is known.
pub fn estimate_size_mb(format: &FormatDescriptor, duration_secs: Option<f64>) -> f64 {
    let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);

    if let Some(bytes) = positive(format.filesize) {
        return bytes / BYTES_PER_MB;
    }
    if let Some(bytes) = positive(format.filesize_approx) {
        return bytes / BYTES_PER_MB;
    }
    if let (Some(kbps), Some(duration)) = (positive(format.tbr), positive(duration_secs)) {
        return kbps * 1000.0 / 8.0 * duration / BYTES_PER_MB;
    }
    0.0
}
