/*!
 * Error types for the slidecast application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the speech synthesis API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when decoding an API response fails
    #[error("Failed to decode API response: {0}")]
    DecodeError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request can plausibly succeed.
    /// Transport failures, throttling, and server errors are worth another
    /// attempt; bad requests and bad keys are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::DecodeError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors that can occur while parsing a transcript block
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Block has no image reference where one is required
    #[error("block has no image reference")]
    MissingImage,

    /// Block has no narration text
    #[error("block has no narration text")]
    MissingNarration,

    /// Timing token could not be parsed
    #[error("invalid timecode: {0}")]
    BadTimecode(String),

    /// Timing window is inverted or empty
    #[error("invalid timing window: end {end_secs}s <= start {start_secs}s")]
    BadWindow {
        /// Window start in seconds
        start_secs: u64,
        /// Window end in seconds
        end_secs: u64,
    },
}

/// Errors that can occur during narration synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Every configured voice exhausted its retries
    #[error("all {voices} configured voices failed after {attempts} attempts each")]
    AllVoicesExhausted {
        /// Number of voices tried
        voices: usize,
        /// Attempts made per voice
        attempts: u32,
    },

    /// Error writing the audio asset to disk
    #[error("Failed to write audio asset: {0}")]
    Write(String),
}

/// Errors that can occur during media assembly
#[derive(Error, Debug)]
pub enum RenderError {
    /// ffmpeg/ffprobe invocation failed
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// Which external tool failed
        tool: &'static str,
        /// Filtered stderr or launch error
        message: String,
    },

    /// External tool did not finish within the watchdog window
    #[error("{tool} timed out after {secs}s")]
    ToolTimeout {
        /// Which external tool timed out
        tool: &'static str,
        /// Watchdog window in seconds
        secs: u64,
    },

    /// No segment survived to assembly
    #[error("no usable segments survived to assembly")]
    EmptyTimeline,

    /// Master audio source missing or unreadable
    #[error("master audio source unavailable: {0}")]
    MissingMaster(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from transcript parsing
    #[error("Transcript error: {0}")]
    Script(#[from] ScriptError),

    /// Error from narration synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from media assembly
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
