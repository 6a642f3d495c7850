/*!
 * Tests for timeline planning (the pure arithmetic behind assembly)
 */

use std::path::PathBuf;
use slidecast::assembler::{SegmentMedia, plan_overlay, plan_self_timed, split_across_images};
use slidecast::errors::RenderError;
use slidecast::transcript::TimingWindow;

/// Test even duration splits across images
#[test]
fn test_split_across_images_withEvenTotal_shouldSplitEqually() {
    assert_eq!(split_across_images(7500, 3), vec![2500, 2500, 2500]);
    assert_eq!(split_across_images(5000, 1), vec![5000]);
}

/// Test that integer remainders land on the last clip, keeping the sum exact
#[test]
fn test_split_across_images_withRemainder_shouldKeepSumExact() {
    let spans = split_across_images(1000, 3);
    assert_eq!(spans, vec![333, 333, 334]);
    assert_eq!(spans.iter().sum::<u64>(), 1000);
}

/// Test the degenerate zero-image split
#[test]
fn test_split_across_images_withNoImages_shouldBeEmpty() {
    assert!(split_across_images(1000, 0).is_empty());
}

/// Test self-timed planning: audio length plus trailing pad, split across images
#[test]
fn test_plan_self_timed_withTwoImages_shouldPadAndSplit() {
    let images = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
    let clips = plan_self_timed(&images, 4500, 500);

    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].duration_ms, 2500);
    assert_eq!(clips[0].offset_ms, 0);
    assert_eq!(clips[1].duration_ms, 2500);
    assert_eq!(clips[1].offset_ms, 2500);
}

/// Test the externally-timed example: frames 0:00-0:07 and 0:07-0:15 place
/// image A at offset 0 for 7s and image B at 7s for 8s, with the master
/// audio truncated to 15s
#[test]
fn test_plan_overlay_withContiguousWindows_shouldMatchStatedTimings() {
    let segments = vec![
        SegmentMedia {
            index: 0,
            images: vec![PathBuf::from("a.png")],
            timing: Some(TimingWindow::new_validated(0, 7).unwrap()),
        },
        SegmentMedia {
            index: 1,
            images: vec![PathBuf::from("b.png")],
            timing: Some(TimingWindow::new_validated(7, 15).unwrap()),
        },
    ];

    let plan = plan_overlay(&segments).unwrap();

    assert_eq!(plan.clips.len(), 2);
    assert_eq!(plan.clips[0].offset_ms, 0);
    assert_eq!(plan.clips[0].duration_ms, 7000);
    assert_eq!(plan.clips[1].offset_ms, 7000);
    assert_eq!(plan.clips[1].duration_ms, 8000);
    assert_eq!(plan.timeline_ms, 15_000);
    assert_eq!(plan.master_truncate_ms, 15_000);
}

/// Test that a gap between stated windows keeps stated durations while the
/// master cut still honors the last stated end
#[test]
fn test_plan_overlay_withGap_shouldKeepDurationsAndLastEnd() {
    let segments = vec![
        SegmentMedia {
            index: 0,
            images: vec![PathBuf::from("a.png")],
            timing: Some(TimingWindow::new_validated(0, 5).unwrap()),
        },
        SegmentMedia {
            index: 1,
            images: vec![PathBuf::from("b.png")],
            timing: Some(TimingWindow::new_validated(10, 15).unwrap()),
        },
    ];

    let plan = plan_overlay(&segments).unwrap();

    assert_eq!(plan.timeline_ms, 10_000);
    assert_eq!(plan.master_truncate_ms, 15_000);
}

/// Test that segments without timing are dropped, not planned
#[test]
fn test_plan_overlay_withUntimedSegment_shouldDropIt() {
    let segments = vec![
        SegmentMedia {
            index: 0,
            images: vec![PathBuf::from("a.png")],
            timing: None,
        },
        SegmentMedia {
            index: 1,
            images: vec![PathBuf::from("b.png")],
            timing: Some(TimingWindow::new_validated(0, 4).unwrap()),
        },
    ];

    let plan = plan_overlay(&segments).unwrap();
    assert_eq!(plan.clips.len(), 1);
    assert_eq!(plan.clips[0].image, PathBuf::from("b.png"));
}

/// Test that an empty plan is a typed failure, not an empty success
#[test]
fn test_plan_overlay_withNothingUsable_shouldFail() {
    let result = plan_overlay(&[]);
    assert!(matches!(result, Err(RenderError::EmptyTimeline)));
}

/// Test multi-image overlay segments split their window across images
#[test]
fn test_plan_overlay_withMultiImageSegment_shouldSplitWindow() {
    let segments = vec![SegmentMedia {
        index: 0,
        images: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
        timing: Some(TimingWindow::new_validated(0, 10).unwrap()),
    }];

    let plan = plan_overlay(&segments).unwrap();

    assert_eq!(plan.clips.len(), 2);
    assert_eq!(plan.clips[0].duration_ms, 5000);
    assert_eq!(plan.clips[1].duration_ms, 5000);
    assert_eq!(plan.clips[1].offset_ms, 5000);
    assert_eq!(plan.timeline_ms, 10_000);
}
