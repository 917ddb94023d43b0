use eyre::{Result, bail, eyre};

/// Format a duration in whole seconds as `M:SS` or `H:MM:SS`.
///
/// Zero or unknown durations render as "Unknown".
pub fn seconds_to_clock(seconds: Option<u64>) -> String {
    let total = match seconds {
        Some(s) if s > 0 => s,
        _ => return "Unknown".to_string(),
    };

    let (minutes, secs) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS` into whole seconds.
pub fn clock_to_seconds(text: &str) -> Result<u64> {
    let text = text.trim();
    if text.is_empty() {
        bail!("empty timestamp");
    }

    let parts = text
        .split(':')
        .map(|p| {
            p.trim()
                .parse::<u64>()
                .map_err(|e| eyre!("invalid timestamp component {p:?} in {text:?}: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if parts.len() > 3 {
        bail!("too many components in timestamp {text:?} (expected at most HH:MM:SS)");
    }

    // Largest unit first: each step shifts the accumulated value up one unit.
    parts
        .iter()
        .try_fold(0u64, |acc, &part| acc.checked_mul(60).and_then(|v| v.checked_add(part)))
        .ok_or_else(|| eyre!("timestamp {text:?} is out of range"))
}
