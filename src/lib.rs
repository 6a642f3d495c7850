/*!
 * # slidecast
 *
 * A Rust library for turning markdown voiceover transcripts into narrated
 * videos and slide decks.
 *
 * ## Features
 *
 * - Parse heading-delimited transcript blocks (image, narration, timing, effect)
 * - Synthesize narration through a neural text-to-speech REST endpoint with
 *   voice fallback and retry
 * - Assemble images and audio into a single video timeline via ffmpeg:
 *   - Self-timed mode: each segment's screen time follows its own narration
 *   - Externally-timed mode: explicit timing windows over a master recording
 * - Emit Marp slide decks with narration as per-slide speaker notes
 * - Rescale transcript timing windows after a master recording is re-cut
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Transcript parsing and the Segment data model
 * - `narration`: Voice-fallback synthesis service
 * - `assembler`: Timeline planning and ffmpeg rendering
 * - `deck`: Slide deck output
 * - `rescale`: Timing window rescaling
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `voice_utils`: Voice identifier utilities
 * - `providers`: Speech synthesis backends:
 *   - `providers::azure`: Azure Cognitive Services speech client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assembler;
pub mod deck;
pub mod errors;
pub mod file_utils;
pub mod narration;
pub mod providers;
pub mod rescale;
pub mod transcript;
pub mod voice_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, RenderError, ScriptError, SynthesisError};
pub use narration::SynthesisService;
pub use transcript::{Segment, TimingWindow, Transcript};
