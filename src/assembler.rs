/*!
 * Media assembly: timeline planning and ffmpeg rendering.
 *
 * Planning (durations, per-image splits, offsets, totals) is pure
 * arithmetic kept free of subprocess calls so it can be tested directly.
 * Rendering drives ffmpeg/ffprobe through tokio::process with a watchdog
 * timeout; a failed render of one clip is reported to the caller, which
 * decides whether the segment is dropped or the run aborts.
 */

use std::path::{Path, PathBuf};
use log::{debug, warn};
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::errors::RenderError;
use crate::transcript::TimingWindow;

// Watchdog windows for external tools
const FFPROBE_TIMEOUT_SECS: u64 = 60;
const FFMPEG_TIMEOUT_SECS: u64 = 300;

/// One image shown for a span of the output timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedClip {
    /// Resolved image path
    pub image: PathBuf,

    /// How long the image stays on screen
    pub duration_ms: u64,

    /// Where the clip lands on the concatenated timeline
    pub offset_ms: u64,
}

/// Planned overlay timeline for externally-timed assembly
#[derive(Debug, Clone)]
pub struct OverlayPlan {
    /// Clips in document order
    pub clips: Vec<PlannedClip>,

    /// Sum of clip durations (the concatenated video length)
    pub timeline_ms: u64,

    /// Master audio truncation point: the last segment's stated end
    pub master_truncate_ms: u64,
}

/// Resolved per-segment media inputs handed to the planner
#[derive(Debug, Clone)]
pub struct SegmentMedia {
    /// Document-order index, for log messages
    pub index: usize,

    /// Resolved, existing image paths
    pub images: Vec<PathBuf>,

    /// Explicit playback window (overlay mode)
    pub timing: Option<TimingWindow>,
}

/// Split a total duration evenly across `count` images. Integer division
/// leaves a remainder; it lands on the last clip so the sum stays exact.
pub fn split_across_images(total_ms: u64, count: usize) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    let count_u64 = count as u64;
    let per_image = total_ms / count_u64;
    let mut spans = vec![per_image; count];
    if let Some(last) = spans.last_mut() {
        *last += total_ms - per_image * count_u64;
    }
    spans
}

/// Plan one self-timed segment: clip duration is the narration length plus
/// the configured trailing pad, divided across the segment's images.
pub fn plan_self_timed(images: &[PathBuf], audio_ms: u64, pad_ms: u64) -> Vec<PlannedClip> {
    let total_ms = audio_ms + pad_ms;
    let spans = split_across_images(total_ms, images.len());

    let mut clips = Vec::with_capacity(images.len());
    let mut offset_ms = 0;
    for (image, duration_ms) in images.iter().zip(spans) {
        clips.push(PlannedClip {
            image: image.clone(),
            duration_ms,
            offset_ms,
        });
        offset_ms += duration_ms;
    }
    clips
}

/// Plan the externally-timed timeline. Every entry must carry a timing
/// window (the caller filters); the concatenated timeline is gapless, so a
/// stated start that disagrees with the running offset is logged and the
/// stated durations win.
pub fn plan_overlay(segments: &[SegmentMedia]) -> Result<OverlayPlan, RenderError> {
    let mut clips = Vec::new();
    let mut cursor_ms: u64 = 0;
    let mut last_end_ms: u64 = 0;

    for seg in segments {
        let window = match seg.timing {
            Some(w) => w,
            None => {
                warn!("Segment {} has no timing window, dropping from overlay", seg.index + 1);
                continue;
            }
        };

        let start_ms = window.start_secs * 1000;
        if start_ms != cursor_ms {
            warn!(
                "Segment {} states start {}s but the timeline is at {}s; keeping stated durations",
                seg.index + 1,
                window.start_secs,
                cursor_ms / 1000
            );
        }

        let duration_ms = window.duration_secs() * 1000;
        for (image, span_ms) in seg
            .images
            .iter()
            .zip(split_across_images(duration_ms, seg.images.len()))
        {
            clips.push(PlannedClip {
                image: image.clone(),
                duration_ms: span_ms,
                offset_ms: cursor_ms,
            });
            cursor_ms += span_ms;
        }
        last_end_ms = window.end_secs * 1000;
    }

    if clips.is_empty() {
        return Err(RenderError::EmptyTimeline);
    }

    Ok(OverlayPlan {
        clips,
        timeline_ms: cursor_ms,
        master_truncate_ms: last_end_ms,
    })
}

/// ffmpeg-backed renderer
pub struct MediaAssembler {
    /// Rendering parameters
    render: RenderConfig,
}

impl MediaAssembler {
    /// Create an assembler for the given render settings
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Probe a media file's duration in milliseconds
    pub async fn probe_duration_ms<P: AsRef<Path>>(&self, path: P) -> Result<u64, RenderError> {
        let path = path.as_ref();
        let output = run_tool(
            "ffprobe",
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                path.to_str().unwrap_or_default(),
            ],
            FFPROBE_TIMEOUT_SECS,
        )
        .await?;

        let stdout = String::from_utf8_lossy(&output);
        let seconds: f64 = stdout.trim().parse().map_err(|_| RenderError::ToolFailed {
            tool: "ffprobe",
            message: format!("unparseable duration output: {:?}", stdout.trim()),
        })?;

        Ok((seconds * 1000.0).round() as u64)
    }

    /// Render one still image into a video clip with the configured
    /// fade-in, frame size, and frame rate. No audio track.
    pub async fn render_image_clip(
        &self,
        image: &Path,
        duration_ms: u64,
        output: &Path,
    ) -> Result<(), RenderError> {
        let duration = format!("{:.3}", duration_ms as f64 / 1000.0);
        let filter = self.video_filter();
        let fps = self.render.fps.to_string();

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-loop",
                "1",
                "-i",
                image.to_str().unwrap_or_default(),
                "-t",
                &duration,
                "-vf",
                &filter,
                "-r",
                &fps,
                "-an",
                "-c:v",
                "libx264",
                output.to_str().unwrap_or_default(),
            ],
            FFMPEG_TIMEOUT_SECS,
        )
        .await?;

        debug!("Rendered clip {:?} ({}ms)", output, duration_ms);
        Ok(())
    }

    /// Concatenate already-rendered clips in order without re-encoding
    pub async fn concat_clips(
        &self,
        clips: &[PathBuf],
        list_path: &Path,
        output: &Path,
    ) -> Result<(), RenderError> {
        let mut listing = String::new();
        for clip in clips {
            let escaped = clip.to_string_lossy().replace('\'', r"'\''");
            listing.push_str(&format!("file '{}'\n", escaped));
        }
        std::fs::write(list_path, listing).map_err(|e| RenderError::ToolFailed {
            tool: "ffmpeg",
            message: format!("failed to write concat list: {}", e),
        })?;

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                list_path.to_str().unwrap_or_default(),
                "-c",
                "copy",
                output.to_str().unwrap_or_default(),
            ],
            FFMPEG_TIMEOUT_SECS,
        )
        .await
        .map(|_| ())
    }

    /// Attach an audio track to a video. With `truncate_ms` the output is
    /// cut at that point; otherwise the video's own length stands (a
    /// shorter audio track simply ends early).
    pub async fn mux_audio(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
        truncate_ms: Option<u64>,
    ) -> Result<(), RenderError> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-i".into(),
            video.to_string_lossy().into_owned(),
            "-i".into(),
            audio.to_string_lossy().into_owned(),
            "-map".into(),
            "0:v".into(),
            "-map".into(),
            "1:a".into(),
            "-c:v".into(),
            "copy".into(),
            "-c:a".into(),
            "aac".into(),
        ];
        if let Some(ms) = truncate_ms {
            args.push("-t".into());
            args.push(format!("{:.3}", ms as f64 / 1000.0));
        }
        args.push(output.to_string_lossy().into_owned());

        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        run_tool("ffmpeg", &arg_refs, FFMPEG_TIMEOUT_SECS)
            .await
            .map(|_| ())
    }

    /// Extract the master audio track from a pre-rendered asset, truncated
    /// to the planned timeline end
    pub async fn extract_master_audio(
        &self,
        asset: &Path,
        output: &Path,
        truncate_ms: u64,
    ) -> Result<(), RenderError> {
        if !asset.exists() {
            return Err(RenderError::MissingMaster(format!("{:?}", asset)));
        }

        let cut = format!("{:.3}", truncate_ms as f64 / 1000.0);
        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-i",
                asset.to_str().unwrap_or_default(),
                "-vn",
                "-c:a",
                "aac",
                "-t",
                &cut,
                output.to_str().unwrap_or_default(),
            ],
            FFMPEG_TIMEOUT_SECS,
        )
        .await
        .map(|_| ())
    }

    /// Scale to the output frame inside letterbox padding, fade the head
    /// in, and force a codec-friendly pixel format
    fn video_filter(&self) -> String {
        let w = self.render.width;
        let h = self.render.height;
        let fade = self.render.fade_in_ms as f64 / 1000.0;
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,\
             fade=t=in:st=0:d={fade:.2},format=yuv420p"
        )
    }
}

/// Run an external tool with a watchdog timeout, returning stdout.
/// Non-zero exit reports the meaningful stderr lines only.
async fn run_tool(
    tool: &'static str,
    args: &[&str],
    timeout_secs: u64,
) -> Result<Vec<u8>, RenderError> {
    let tool_future = Command::new(tool).args(args).output();

    let timeout = std::time::Duration::from_secs(timeout_secs);
    let result = tokio::select! {
        result = tool_future => {
            result.map_err(|e| RenderError::ToolFailed {
                tool,
                message: format!("failed to launch: {}", e),
            })?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(RenderError::ToolTimeout { tool, secs: timeout_secs });
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RenderError::ToolFailed {
            tool,
            message: filter_tool_stderr(&stderr),
        });
    }

    Ok(result.stdout)
}

/// Filter ffmpeg/ffprobe stderr to only show meaningful error lines,
/// stripping the version banner, build configuration, and stream metadata
/// noise.
fn filter_tool_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
