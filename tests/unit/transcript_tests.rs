/*!
 * Tests for transcript parsing functionality
 */

use std::path::PathBuf;
use slidecast::transcript::{
    Admission, TimingWindow, Transcript, clean_markdown, format_timecode, parse_timecode,
};
use crate::common;

/// Test minute:second timecode parsing
#[test]
fn test_parse_timecode_withMinuteSecond_shouldConvert() {
    assert_eq!(parse_timecode("0:00").unwrap(), 0);
    assert_eq!(parse_timecode("0:07").unwrap(), 7);
    assert_eq!(parse_timecode("1:05").unwrap(), 65);
    assert_eq!(parse_timecode("90:00").unwrap(), 5400);
}

/// Test hour:minute:second timecode parsing
#[test]
fn test_parse_timecode_withHourMinuteSecond_shouldConvert() {
    assert_eq!(parse_timecode("0:00:09").unwrap(), 9);
    assert_eq!(parse_timecode("1:23:45").unwrap(), 5025);
    assert_eq!(parse_timecode("2:00:00").unwrap(), 7200);
}

/// Test that garbage timecodes are rejected
#[test]
fn test_parse_timecode_withGarbage_shouldFail() {
    assert!(parse_timecode("abc").is_err());
    assert!(parse_timecode("12").is_err());
    assert!(parse_timecode("1:2:3:4").is_err());
    assert!(parse_timecode("1:x5").is_err());
}

/// Test that conversion round-trips through the display form
#[test]
fn test_format_timecode_withValidSeconds_shouldRoundTrip() {
    for secs in [0, 7, 59, 60, 65, 3599, 3600, 5025, 7325] {
        let displayed = format_timecode(secs);
        assert_eq!(
            parse_timecode(&displayed).unwrap(),
            secs,
            "round-trip failed for {}s ({})",
            secs,
            displayed
        );
    }
}

/// Test the display forms on both sides of the hour boundary
#[test]
fn test_format_timecode_withHourBoundary_shouldSwitchForms() {
    assert_eq!(format_timecode(65), "1:05");
    assert_eq!(format_timecode(3599), "59:59");
    assert_eq!(format_timecode(3600), "1:00:00");
    assert_eq!(format_timecode(5025), "1:23:45");
}

/// Test markdown stripping for narration text
#[test]
fn test_clean_markdown_shouldStripDecoration() {
    assert_eq!(
        clean_markdown("Use the `ngOnInit` *hook* [here](docs)."),
        "Use the ngOnInit hook here docs ."
    );
    assert_eq!(clean_markdown("line one\nline two"), "line one line two");
    assert_eq!(clean_markdown("\"quoted\" and 'single'"), "quoted and single");
}

/// Test that a malformed block is skipped and order is preserved
#[test]
fn test_parse_transcript_withMalformedBlock_shouldYieldOnlyWellFormed() {
    let transcript = Transcript::new(PathBuf::from("test.md"), common::sample_transcript().to_string());
    let segments = transcript.media_segments();

    // Three blocks, one without narration: exactly two segments survive
    assert_eq!(segments.len(), 2);
    assert!(segments[0].narration.contains("Welcome"));
    assert!(segments[1].narration.contains("emphasis"));
}

/// Test that double-quoted narration loses its quotes
#[test]
fn test_parse_transcript_withQuotedNarration_shouldStripQuotes() {
    let transcript = Transcript::new(PathBuf::from("test.md"), common::sample_transcript().to_string());
    let segments = transcript.media_segments();

    assert_eq!(segments[0].narration, "Welcome to the tutorial series.");
    assert!(!segments[0].narration.starts_with('"'));
    assert!(!segments[0].narration.ends_with('"'));
}

/// Test that hyphen, en-dash, and em-dash timing separators are equivalent
#[test]
fn test_parse_timing_withDashVariants_shouldAllParse() {
    for separator in ["-", "\u{2013}", "\u{2014}"] {
        let content = format!(
            "## Frame 1\n\n**Image:** pic.png\n**Timing:** 0:30 {} 1:10\n**Transcript:** \"Text.\"\n",
            separator
        );
        let transcript = Transcript::new(PathBuf::from("test.md"), content);
        let segments = transcript.media_segments();

        assert_eq!(segments.len(), 1, "separator {:?} failed", separator);
        let timing = segments[0].timing.unwrap();
        assert_eq!(timing.start_secs, 30);
        assert_eq!(timing.end_secs, 70);
    }
}

/// Test that "Frame" and "Segment" headings both open a block
#[test]
fn test_parse_transcript_withFrameHeadings_shouldSplitBlocks() {
    let content = "## Frame 1\n\n**Image:** a.png\n**Transcript:** \"One.\"\n\n## Frame 2\n\n**Image:** b.png\n**Transcript:** \"Two.\"\n";
    let transcript = Transcript::new(PathBuf::from("test.md"), content.to_string());

    assert_eq!(transcript.media_segments().len(), 2);
}

/// Test comma-separated multi-image references
#[test]
fn test_parse_transcript_withMultiImageSegment_shouldSplitReferences() {
    let transcript = Transcript::new(PathBuf::from("test.md"), common::sample_transcript().to_string());
    let segments = transcript.media_segments();

    assert_eq!(segments[1].images, vec!["frames/detail_a.png", "frames/detail_b.png"]);
}

/// Test effect and label extraction
#[test]
fn test_parse_transcript_withEffectAndLabel_shouldCaptureBoth() {
    let transcript = Transcript::new(PathBuf::from("test.md"), common::sample_transcript().to_string());
    let segments = transcript.media_segments();

    assert_eq!(segments[0].label.as_deref(), Some("Opening"));
    assert_eq!(segments[0].effect, None);
    assert_eq!(segments[1].effect.as_deref(), Some("slow zoom"));
}

/// Test that the media path requires an image while the deck path does not
#[test]
fn test_admission_withNarrationOnlyBlock_shouldDependOnPath() {
    let content = "## Segment 1\n\n**Transcript:** \"Only narration here.\"\n";
    let transcript = Transcript::new(PathBuf::from("test.md"), content.to_string());

    assert_eq!(transcript.media_segments().len(), 0);

    let deck = transcript.deck_segments();
    assert_eq!(deck.len(), 1);
    assert!(deck[0].images.is_empty());
}

/// Test that the segment iterator is restartable
#[test]
fn test_segments_calledTwice_shouldRestartFromTheTop() {
    let transcript = Transcript::new(PathBuf::from("test.md"), common::sample_transcript().to_string());

    let first: Vec<_> = transcript.segments(Admission::Media).collect();
    let second: Vec<_> = transcript.segments(Admission::Media).collect();

    assert_eq!(first.len(), second.len());
    assert_eq!(first[0].narration, second[0].narration);
}

/// Test timing window validation
#[test]
fn test_timing_window_withInvertedRange_shouldFail() {
    assert!(TimingWindow::new_validated(5, 5).is_err());
    assert!(TimingWindow::new_validated(5, 4).is_err());
    assert!(TimingWindow::new_validated(5, 6).is_ok());
}

/// Test timing window scaling (display rounding only at the boundary)
#[test]
fn test_timing_window_scaled_shouldBeExact() {
    let window = TimingWindow::new_validated(60, 90).unwrap();
    let scaled = window.scaled(0.5);

    assert_eq!(scaled.start_secs, 30);
    assert_eq!(scaled.end_secs, 45);
    assert_eq!(scaled.duration_secs(), 15);
}

/// Test that a block with an unparseable timing token is skipped entirely
#[test]
fn test_parse_transcript_withBadTiming_shouldSkipBlock() {
    let content = "## Segment 1\n\n**Image:** a.png\n**Timing:** 0:10 - 0:05\n**Transcript:** \"Inverted.\"\n\n## Segment 2\n\n**Image:** b.png\n**Transcript:** \"Fine.\"\n";
    let transcript = Transcript::new(PathBuf::from("test.md"), content.to_string());
    let segments = transcript.media_segments();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].narration, "Fine.");
}
