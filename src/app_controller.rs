use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use crate::app_config::Config;
use crate::assembler::{MediaAssembler, SegmentMedia, plan_overlay, plan_self_timed};
use crate::deck::DeckBuilder;
use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::narration::SynthesisService;
use crate::rescale;
use crate::transcript::{Segment, Transcript};

// @module: Application controller for transcript-driven media builds

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Self-timed build: synthesize narration per segment and derive each
    /// segment's screen time from its own audio length.
    pub async fn run_build(
        &self,
        transcript_path: PathBuf,
        output: Option<PathBuf>,
        force_overwrite: bool,
        parse_only: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let transcript = Transcript::from_file(&transcript_path)?;
        let segments = transcript.media_segments();
        if segments.is_empty() {
            return Err(anyhow!(
                "No usable segments found in transcript: {}",
                transcript_path.display()
            ));
        }
        info!("Found {} segments", segments.len());

        if parse_only {
            report_segments(&segments);
            return Ok(());
        }

        let output = output.unwrap_or_else(|| FileManager::generate_output_path(&transcript_path, "mp4"));
        if output.exists() && !force_overwrite {
            warn!("Skipping, output already exists (use -f to force overwrite): {:?}", output);
            return Ok(());
        }

        let base_dir = transcript_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let service = SynthesisService::new(self.config.narration.clone());
        let assembler = MediaAssembler::new(self.config.render.clone());

        // Run-scoped scratch space; removed on drop, best-effort otherwise
        let scratch = TempDir::with_prefix("slidecast-")
            .context("Failed to create scratch directory")?;

        let progress = segment_progress_bar(segments.len() as u64);
        let mut segment_clips: Vec<PathBuf> = Vec::new();

        for (i, segment) in segments.iter().enumerate() {
            progress.set_message(format!("segment {}", i + 1));

            match self
                .build_segment_clip(segment, i, &base_dir, &service, &assembler, scratch.path())
                .await
            {
                Some(clip) => segment_clips.push(clip),
                None => warn!("Segment {} dropped from the timeline", i + 1),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if segment_clips.is_empty() {
            return Err(RenderError::EmptyTimeline.into());
        }

        // Assemble inside the scratch dir first so a failed concat never
        // leaves a partial file at the destination.
        let staged = scratch.path().join("timeline.mp4");
        let list_path = scratch.path().join("timeline.txt");
        assembler.concat_clips(&segment_clips, &list_path, &staged).await?;
        deliver(&staged, &output)?;

        info!(
            "Video rendered: {:?} ({} of {} segments, {})",
            output,
            segment_clips.len(),
            segments.len(),
            format_duration(start_time.elapsed())
        );
        Ok(())
    }

    /// One segment through the self-timed stages: resolve images,
    /// synthesize narration, probe its length, render and mux. Any stage
    /// failing drops the segment (None); nothing here aborts the run.
    async fn build_segment_clip(
        &self,
        segment: &Segment,
        index: usize,
        base_dir: &Path,
        service: &SynthesisService,
        assembler: &MediaAssembler,
        scratch: &Path,
    ) -> Option<PathBuf> {
        let images = resolve_segment_images(segment, index, base_dir);
        if images.is_empty() {
            return None;
        }

        if let Some(effect) = &segment.effect {
            debug!(
                "Segment {} names effect '{}'; rendering as the standard fade-in",
                index + 1,
                effect
            );
        }

        let audio_path = scratch.join(format!("narration_{:03}.mp3", index));
        if let Err(e) = service.synthesize_to_file(&segment.narration, &audio_path).await {
            warn!("Skipping segment {} due to audio failure: {}", index + 1, e);
            return None;
        }

        let audio_ms = match assembler.probe_duration_ms(&audio_path).await {
            Ok(ms) => ms,
            Err(e) => {
                warn!("Skipping segment {}: cannot probe narration length: {}", index + 1, e);
                return None;
            }
        };

        let plan = plan_self_timed(&images, audio_ms, self.config.render.trailing_pad_ms);

        let mut image_clips = Vec::with_capacity(plan.len());
        for (j, clip) in plan.iter().enumerate() {
            let clip_path = scratch.join(format!("clip_{:03}_{:02}.mp4", index, j));
            if let Err(e) = assembler
                .render_image_clip(&clip.image, clip.duration_ms, &clip_path)
                .await
            {
                warn!("Skipping segment {}: clip render failed: {}", index + 1, e);
                return None;
            }
            image_clips.push(clip_path);
        }

        let video_path = if image_clips.len() == 1 {
            image_clips.into_iter().next()?
        } else {
            let joined = scratch.join(format!("segment_{:03}_video.mp4", index));
            let list = scratch.join(format!("segment_{:03}_list.txt", index));
            if let Err(e) = assembler.concat_clips(&image_clips, &list, &joined).await {
                warn!("Skipping segment {}: concat failed: {}", index + 1, e);
                return None;
            }
            joined
        };

        let final_path = scratch.join(format!("segment_{:03}.mp4", index));
        if let Err(e) = assembler
            .mux_audio(&video_path, &audio_path, &final_path, None)
            .await
        {
            warn!("Skipping segment {}: audio mux failed: {}", index + 1, e);
            return None;
        }

        Some(final_path)
    }

    /// Externally-timed build: segment durations come from explicit timing
    /// windows, narration from a single master audio track.
    pub async fn run_overlay(
        &self,
        transcript_path: PathBuf,
        master_path: PathBuf,
        output: Option<PathBuf>,
        force_overwrite: bool,
        parse_only: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let transcript = Transcript::from_file(&transcript_path)?;
        let segments = transcript.media_segments();
        if segments.is_empty() {
            return Err(anyhow!(
                "No usable segments found in transcript: {}",
                transcript_path.display()
            ));
        }

        if parse_only {
            report_segments(&segments);
            return Ok(());
        }

        let output = output.unwrap_or_else(|| FileManager::generate_output_path(&transcript_path, "mp4"));
        if output.exists() && !force_overwrite {
            warn!("Skipping, output already exists (use -f to force overwrite): {:?}", output);
            return Ok(());
        }

        if !master_path.exists() {
            return Err(RenderError::MissingMaster(format!("{:?}", master_path)).into());
        }
        if !FileManager::is_media_file(&master_path) {
            warn!("Master asset {:?} does not look like a media container", master_path);
        }

        let base_dir = transcript_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        // Resolve images and keep only segments with explicit timing
        let mut media: Vec<SegmentMedia> = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if segment.timing.is_none() {
                warn!("Segment {} has no timing window, dropping from overlay", i + 1);
                continue;
            }
            let images = resolve_segment_images(segment, i, &base_dir);
            if images.is_empty() {
                continue;
            }
            media.push(SegmentMedia {
                index: i,
                images,
                timing: segment.timing,
            });
        }

        let plan = plan_overlay(&media)?;
        info!(
            "Planned {} clips, timeline {}s, master cut at {}s",
            plan.clips.len(),
            plan.timeline_ms / 1000,
            plan.master_truncate_ms / 1000
        );

        let assembler = MediaAssembler::new(self.config.render.clone());
        let scratch = TempDir::with_prefix("slidecast-")
            .context("Failed to create scratch directory")?;

        // The transcript timings are meant to match the master recording;
        // flag a master that cannot cover the planned timeline.
        if let Ok(master_ms) = assembler.probe_duration_ms(&master_path).await {
            if master_ms < plan.master_truncate_ms {
                warn!(
                    "Master audio ({}s) is shorter than the planned timeline ({}s)",
                    master_ms / 1000,
                    plan.master_truncate_ms / 1000
                );
            }
        }

        let master_audio = scratch.path().join("master_audio.m4a");
        assembler
            .extract_master_audio(&master_path, &master_audio, plan.master_truncate_ms)
            .await?;

        let progress = segment_progress_bar(plan.clips.len() as u64);
        let mut rendered: Vec<PathBuf> = Vec::new();
        for (j, clip) in plan.clips.iter().enumerate() {
            let clip_path = scratch.path().join(format!("clip_{:03}.mp4", j));
            match assembler
                .render_image_clip(&clip.image, clip.duration_ms, &clip_path)
                .await
            {
                Ok(()) => rendered.push(clip_path),
                Err(e) => warn!("Dropping clip {} ({:?}): {}", j + 1, clip.image, e),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if rendered.is_empty() {
            return Err(RenderError::EmptyTimeline.into());
        }

        let video = scratch.path().join("timeline_video.mp4");
        let list_path = scratch.path().join("timeline.txt");
        assembler.concat_clips(&rendered, &list_path, &video).await?;

        let staged = scratch.path().join("timeline.mp4");
        assembler
            .mux_audio(&video, &master_audio, &staged, Some(plan.master_truncate_ms))
            .await?;
        deliver(&staged, &output)?;

        info!(
            "Video rendered: {:?} ({} clips, {})",
            output,
            rendered.len(),
            format_duration(start_time.elapsed())
        );
        Ok(())
    }

    /// Deck build: one slide per segment, narration as speaker notes.
    /// Narration-only blocks are kept on this path.
    pub fn run_deck(
        &self,
        transcript_path: PathBuf,
        output: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        let transcript = Transcript::from_file(&transcript_path)?;
        let segments = transcript.deck_segments();

        let output = output.unwrap_or_else(|| {
            FileManager::generate_output_path(&transcript_path, "deck.md")
        });
        if output.exists() && !force_overwrite {
            warn!("Skipping, output already exists (use -f to force overwrite): {:?}", output);
            return Ok(());
        }

        let title = deck_title(&transcript_path);
        let slides = DeckBuilder::new(title).write_deck(&segments, &output)?;
        info!("Deck written: {:?} ({} slides)", output, slides);
        Ok(())
    }

    /// Rescale every timing window in the transcript by `factor`
    pub fn run_rescale(
        &self,
        transcript_path: PathBuf,
        factor: f64,
        output: Option<PathBuf>,
    ) -> Result<()> {
        if !transcript_path.exists() {
            return Err(anyhow!("Transcript does not exist: {:?}", transcript_path));
        }

        let changed = rescale::rescale_file(&transcript_path, factor, output.as_deref())?;
        info!(
            "Rescaled {} timing window(s) by factor {} in {:?}",
            changed,
            factor,
            output.unwrap_or(transcript_path)
        );
        Ok(())
    }

    /// Probe the configured speech endpoint without rendering anything
    pub async fn check_narration(&self) -> Result<()> {
        let service = SynthesisService::new(self.config.narration.clone());
        service.test_connection().await?;
        info!("Speech endpoint reachable: {}", self.config.narration.endpoint);
        Ok(())
    }
}

/// Resolve a segment's image references, logging each miss. An empty
/// result means the segment cannot be rendered.
fn resolve_segment_images(segment: &Segment, index: usize, base_dir: &Path) -> Vec<PathBuf> {
    let mut resolved = Vec::with_capacity(segment.images.len());
    for reference in &segment.images {
        match FileManager::resolve_image_path(reference, base_dir) {
            Some(path) => resolved.push(path),
            None => warn!("Image not found for segment {}: {}", index + 1, reference),
        }
    }
    if resolved.is_empty() {
        warn!("Segment {} has no resolvable images", index + 1);
    }
    resolved
}

/// Log a parse-only summary of the segments
fn report_segments(segments: &[Segment]) {
    for (i, segment) in segments.iter().enumerate() {
        let timing = segment
            .timing
            .map(|w| w.to_string())
            .unwrap_or_else(|| "untimed".to_string());
        info!(
            "Segment {}: {} image(s), {} chars, {}{}",
            i + 1,
            segment.images.len(),
            segment.narration.len(),
            timing,
            segment
                .effect
                .as_deref()
                .map(|e| format!(", effect: {}", e))
                .unwrap_or_default()
        );
    }
}

/// Move the staged output into place. Copy-then-remove rather than rename
/// so the scratch dir may live on another filesystem.
fn deliver(staged: &Path, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        FileManager::ensure_dir(parent)?;
    }
    std::fs::copy(staged, output)
        .with_context(|| format!("Failed to write output file: {:?}", output))?;
    Ok(())
}

/// Deck title derived from the transcript file name
fn deck_title(transcript_path: &Path) -> String {
    transcript_path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| "Slidecast".to_string())
}

/// Progress bar for the sequential segment loop
fn segment_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// Human-readable elapsed time
fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:01}s", secs, elapsed.subsec_millis() / 100)
    }
}
