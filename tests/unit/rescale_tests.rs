/*!
 * Tests for the transcript timing rescaler
 */

use slidecast::rescale::{rescale_content, rescale_file};
use crate::common;

/// Test halving a timing window: 60s/90s become 30s/45s exactly
#[test]
fn test_rescale_withHalfFactor_shouldHalveWindows() {
    let content = "**Timing:** 1:00 \u{2013} 1:30\n";
    let (rewritten, changed) = rescale_content(content, 0.5).unwrap();

    assert_eq!(changed, 1);
    assert_eq!(rewritten, "**Timing:** 0:30 \u{2013} 0:45\n");
}

/// Test doubling a timing window
#[test]
fn test_rescale_withDoubleFactor_shouldDoubleWindows() {
    let content = "**Timing:** 0:05 - 0:10\n";
    let (rewritten, _) = rescale_content(content, 2.0).unwrap();

    assert_eq!(rewritten, "**Timing:** 0:10 - 0:20\n");
}

/// Test that the separator glyph survives the rewrite
#[test]
fn test_rescale_withDashVariants_shouldPreserveSeparator() {
    for separator in ["-", "\u{2013}", "\u{2014}"] {
        let content = format!("**Timing:** 0:10 {} 0:20\n", separator);
        let (rewritten, _) = rescale_content(&content, 0.5).unwrap();
        assert!(
            rewritten.contains(separator),
            "separator {:?} lost in {:?}",
            separator,
            rewritten
        );
        assert!(rewritten.contains("0:05"));
        assert!(rewritten.contains("0:10"));
    }
}

/// Test that every timing line in a multi-segment document is rewritten
#[test]
fn test_rescale_withMultipleWindows_shouldRewriteAll() {
    let content = "## Frame 1\n**Timing:** 0:00 - 0:30\n\n## Frame 2\n**Timing:** 0:30 - 1:00\n";
    let (rewritten, changed) = rescale_content(content, 0.5).unwrap();

    assert_eq!(changed, 2);
    assert!(rewritten.contains("0:00 - 0:15"));
    assert!(rewritten.contains("0:15 - 0:30"));
}

/// Test that the Total Duration summary line is left untouched
#[test]
fn test_rescale_withTotalDurationLine_shouldLeaveItAlone() {
    let content = "**Timing:** 1:00 - 2:00\n\n**Total Duration:** 2:00\n";
    let (rewritten, changed) = rescale_content(content, 0.5).unwrap();

    assert_eq!(changed, 1);
    assert!(rewritten.contains("**Timing:** 0:30 - 1:00"));
    assert!(rewritten.contains("**Total Duration:** 2:00"));
}

/// Test that hour-scale results switch to the H:MM:SS display form
#[test]
fn test_rescale_withHourScaleResult_shouldUseLongForm() {
    let content = "**Timing:** 40:00 - 50:00\n";
    let (rewritten, _) = rescale_content(content, 2.0).unwrap();

    assert_eq!(rewritten, "**Timing:** 1:20:00 - 1:40:00\n");
}

/// Test that non-positive and non-finite factors are rejected
#[test]
fn test_rescale_withBadFactor_shouldFail() {
    let content = "**Timing:** 0:10 - 0:20\n";
    assert!(rescale_content(content, 0.0).is_err());
    assert!(rescale_content(content, -1.0).is_err());
    assert!(rescale_content(content, f64::NAN).is_err());
}

/// Test the file path: writing to a separate output leaves the source intact
#[test]
fn test_rescale_file_withOutputPath_shouldNotTouchSource() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_file(dir.path(), "script.md", "**Timing:** 1:00 - 1:30\n").unwrap();
    let target = dir.path().join("script_scaled.md");

    let changed = rescale_file(&source, 0.5, Some(&target)).unwrap();

    assert_eq!(changed, 1);
    assert_eq!(
        std::fs::read_to_string(&source).unwrap(),
        "**Timing:** 1:00 - 1:30\n"
    );
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "**Timing:** 0:30 - 0:45\n"
    );
}

/// Test in-place rescaling
#[test]
fn test_rescale_file_inPlace_shouldRewriteSource() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_file(dir.path(), "script.md", "**Timing:** 0:20 - 0:40\n").unwrap();

    let changed = rescale_file(&source, 1.5, None).unwrap();

    assert_eq!(changed, 1);
    assert_eq!(
        std::fs::read_to_string(&source).unwrap(),
        "**Timing:** 0:30 - 1:00\n"
    );
}
