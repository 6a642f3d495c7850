use std::path::Path;
use anyhow::{Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::file_utils::FileManager;
use crate::transcript::{format_timecode, parse_timecode};

// @module: Transcript timing rescaler

// @const: Timing line with the separator captured so its rendering survives
static TIMING_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\*\*Timing:\*\*\s*)(\d+:\d+(?::\d+)?)(\s*)([-–—])(\s*)(\d+:\d+(?::\d+)?)")
        .unwrap()
});

/// Rescale every timing window in the transcript text by `factor`.
/// Returns the rewritten content and the number of windows changed.
/// The arithmetic is exact; rounding to whole seconds happens only when
/// the value is formatted back for display.
///
/// A "Total Duration" summary line, if present, is NOT rewritten. The
/// original tooling never updated it and downstream consumers ignore it.
pub fn rescale_content(content: &str, factor: f64) -> Result<(String, usize)> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(anyhow!("Rescale factor must be a positive number, got {}", factor));
    }

    let mut changed = 0usize;
    let rewritten = TIMING_LINE_RE.replace_all(content, |caps: &Captures| {
        let start = parse_timecode(&caps[2]);
        let end = parse_timecode(&caps[6]);
        match (start, end) {
            (Ok(start), Ok(end)) => {
                changed += 1;
                let scaled_start = ((start as f64) * factor).round() as u64;
                let scaled_end = ((end as f64) * factor).round() as u64;
                format!(
                    "{}{}{}{}{}{}",
                    &caps[1],
                    format_timecode(scaled_start),
                    &caps[3],
                    &caps[4],
                    &caps[5],
                    format_timecode(scaled_end)
                )
            }
            _ => {
                warn!("Leaving unparseable timing line untouched: {}", &caps[0]);
                caps[0].to_string()
            }
        }
    });

    if content.contains("Total Duration") {
        debug!("Transcript carries a Total Duration line; it is not rescaled");
    }

    Ok((rewritten.into_owned(), changed))
}

/// Rescale a transcript file in place (or to `output` when given). The
/// whole document is rewritten in one write; the source file is untouched
/// on any parse or IO failure.
pub fn rescale_file(path: &Path, factor: f64, output: Option<&Path>) -> Result<usize> {
    let content = FileManager::read_to_string(path)?;
    let (rewritten, changed) = rescale_content(&content, factor)?;

    if changed == 0 {
        warn!("No timing windows found in {:?}; nothing to rescale", path);
    }

    let target = output.unwrap_or(path);
    FileManager::write_to_file(target, &rewritten)?;
    Ok(changed)
}
