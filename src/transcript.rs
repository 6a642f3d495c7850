use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ScriptError;

// @module: Voiceover transcript parsing

// @const: Segment boundary marker ("## Frame" or "## Segment" headings)
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^##\s+(?:Frame|Segment)").unwrap()
});

// @const: Image label, path optionally wrapped in backticks
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Image(?: to use)?:\*\*\s*`?([^`\n\r]+)`?").unwrap()
});

// @const: Narration label with a double-quoted body
static NARRATION_QUOTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)\*\*(?:Transcript|Voiceover):\*\*\s*"([^"]+)""#).unwrap()
});

// @const: Narration label with free text running to the next bold label,
// separator, or end of block
static NARRATION_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*(?:Transcript|Voiceover):\*\*\s*([\s\S]+?)(?:\n\s*\*\*|---|\z)").unwrap()
});

// @const: Timing window. The separator renders as hyphen, en-dash, or em-dash
static TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Timing:\*\*\s*(\d+:\d+(?::\d+)?)\s*[-–—]\s*(\d+:\d+(?::\d+)?)").unwrap()
});

// @const: Named visual effect, rest of line
static EFFECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Effect:\*\*\s*([^\n\r]+)").unwrap()
});

// @const: Heading remainder after the boundary marker, e.g. " 3: Closing thoughts"
static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+\s*)?[:.\-]?\s*(.+?)\s*$").unwrap()
});

/// Inclusive-start, exclusive-end playback window in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingWindow {
    /// Elapsed seconds at which the segment starts
    pub start_secs: u64,

    /// Elapsed seconds at which the segment ends
    pub end_secs: u64,
}

impl TimingWindow {
    // @creates: Validated window
    // @validates: end strictly after start
    pub fn new_validated(start_secs: u64, end_secs: u64) -> Result<Self, ScriptError> {
        if end_secs <= start_secs {
            return Err(ScriptError::BadWindow { start_secs, end_secs });
        }
        Ok(TimingWindow { start_secs, end_secs })
    }

    /// Window length in seconds
    pub fn duration_secs(&self) -> u64 {
        self.end_secs - self.start_secs
    }

    /// Scale both endpoints by a factor. The arithmetic is exact in f64;
    /// rounding to whole seconds happens only here, at the boundary.
    pub fn scaled(&self, factor: f64) -> Self {
        TimingWindow {
            start_secs: ((self.start_secs as f64) * factor).round() as u64,
            end_secs: ((self.end_secs as f64) * factor).round() as u64,
        }
    }
}

impl fmt::Display for TimingWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_timecode(self.start_secs),
            format_timecode(self.end_secs)
        )
    }
}

/// Parse an "M:SS" or "H:MM:SS" token to elapsed seconds
pub fn parse_timecode(token: &str) -> Result<u64, ScriptError> {
    let parts: Vec<&str> = token.trim().split(':').collect();
    let numeric: Result<Vec<u64>, _> = parts.iter().map(|p| p.parse::<u64>()).collect();
    let numeric = numeric.map_err(|_| ScriptError::BadTimecode(token.to_string()))?;

    match numeric.as_slice() {
        [minutes, seconds] => Ok(minutes * 60 + seconds),
        [hours, minutes, seconds] => Ok(hours * 3600 + minutes * 60 + seconds),
        _ => Err(ScriptError::BadTimecode(token.to_string())),
    }
}

/// Format elapsed seconds back to the transcript's display form:
/// "M:SS" below one hour, "H:MM:SS" at or above it
pub fn format_timecode(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// Strip markdown decoration from narration so the speech engine reads
/// plain prose: code ticks, emphasis markers and quotes are dropped,
/// brackets and newlines become spaces, runs of whitespace collapse.
pub fn clean_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '`' | '*' | '"' | '\'' => {}
            '<' | '>' | '[' | ']' | '(' | ')' | '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One transcript-described unit pairing narration with images and
/// optional timing. Constructed once per parse, immutable thereafter.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Heading remainder, used for slide titles
    pub label: Option<String>,

    /// Image references, possibly empty on narration-only paths
    pub images: Vec<String>,

    /// Markdown-stripped narration text
    pub narration: String,

    /// Explicit playback window, when the transcript carries one
    pub timing: Option<TimingWindow>,

    /// Named visual effect, when the transcript carries one
    pub effect: Option<String>,
}

/// Which fields a block must carry to be admitted as a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Media-builder paths: image and narration are both mandatory
    Media,
    /// Deck/index paths: narration alone is enough
    NarrationOnly,
}

/// A loaded transcript document. Parsing is lazy and restartable:
/// every call to [`Transcript::segments`] walks the blocks afresh.
#[derive(Debug)]
pub struct Transcript {
    /// Where the document came from
    pub source_file: PathBuf,

    /// Raw markdown content
    content: String,
}

impl Transcript {
    /// Wrap already-loaded transcript text
    pub fn new(source_file: PathBuf, content: String) -> Self {
        Transcript { source_file, content }
    }

    /// Read a transcript from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        if content.trim().is_empty() {
            return Err(anyhow!("Transcript is empty: {}", path.display()));
        }
        Ok(Transcript::new(path.to_path_buf(), content))
    }

    /// Iterate segments in document order. Malformed blocks are skipped
    /// with a logged reason and never abort the scan.
    pub fn segments(&self, admission: Admission) -> SegmentIter<'_> {
        let mut blocks = BLOCK_RE.split(&self.content);
        // Everything before the first boundary marker is preamble.
        let _ = blocks.next();
        SegmentIter {
            blocks,
            admission,
            block_no: 0,
        }
    }

    /// Collect the media-path segments (image + narration mandatory)
    pub fn media_segments(&self) -> Vec<Segment> {
        self.segments(Admission::Media).collect()
    }

    /// Collect the narration-only segments (deck/index paths)
    pub fn deck_segments(&self) -> Vec<Segment> {
        self.segments(Admission::NarrationOnly).collect()
    }

    /// Raw document text, for rewrite passes
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Segments: {}", self.segments(Admission::NarrationOnly).count())?;
        Ok(())
    }
}

/// Lazy block-by-block segment iterator, restartable from the owning
/// [`Transcript`]
pub struct SegmentIter<'t> {
    blocks: regex::Split<'static, 't>,
    admission: Admission,
    block_no: usize,
}

impl Iterator for SegmentIter<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        for block in self.blocks.by_ref() {
            self.block_no += 1;
            match parse_block(block, self.admission) {
                Ok(segment) => {
                    debug!(
                        "Parsed block {} ({} image(s), {} narration chars)",
                        self.block_no,
                        segment.images.len(),
                        segment.narration.len()
                    );
                    return Some(segment);
                }
                Err(e) => {
                    warn!("Skipping block {}: {}", self.block_no, e);
                }
            }
        }
        None
    }
}

/// Parse one heading-delimited block. Every label is searched for
/// independently; absence of a mandatory one fails the block.
fn parse_block(block: &str, admission: Admission) -> Result<Segment, ScriptError> {
    let narration_raw = NARRATION_QUOTED_RE
        .captures(block)
        .or_else(|| NARRATION_OPEN_RE.captures(block))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ScriptError::MissingNarration)?;

    let narration = clean_markdown(narration_raw);
    if narration.is_empty() {
        return Err(ScriptError::MissingNarration);
    }

    let images: Vec<String> = IMAGE_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if admission == Admission::Media && images.is_empty() {
        return Err(ScriptError::MissingImage);
    }

    let timing = match TIMING_RE.captures(block) {
        Some(caps) => {
            let start = parse_timecode(&caps[1])?;
            let end = parse_timecode(&caps[2])?;
            Some(TimingWindow::new_validated(start, end)?)
        }
        None => None,
    };

    let effect = EFFECT_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    let label = block
        .lines()
        .next()
        .and_then(|line| LABEL_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty());

    Ok(Segment {
        label,
        images,
        narration,
        timing,
        effect,
    })
}
