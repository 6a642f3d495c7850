use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Narration synthesis settings
    #[serde(default)]
    pub narration: NarrationConfig,

    /// Video rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Narration synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NarrationConfig {
    /// Speech service endpoint URL
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,

    /// API key for the speech service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Ordered voice list: primary first, then fallbacks
    #[serde(default = "default_voices")]
    pub voices: Vec<String>,

    /// Audio output format identifier passed to the service
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count per voice for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff time in milliseconds, doubled on each retry
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_speech_endpoint(),
            api_key: String::new(),
            voices: default_voices(),
            output_format: default_output_format(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl NarrationConfig {
    /// Primary voice (first entry of the configured list)
    pub fn primary_voice(&self) -> Option<&str> {
        self.voices.first().map(|s| s.as_str())
    }
}

/// Video rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Output frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Output frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Silent tail appended after each segment's narration, in milliseconds
    #[serde(default = "default_trailing_pad_ms")]
    pub trailing_pad_ms: u64,

    /// Fade-in applied at the head of every image clip, in milliseconds
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            trailing_pad_ms: default_trailing_pad_ms(),
            fade_in_ms: default_fade_in_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_speech_endpoint() -> String {
    "https://eastus.tts.speech.microsoft.com".to_string()
}

fn default_voices() -> Vec<String> {
    vec![
        "en-US-ChristopherNeural".to_string(),
        "en-US-AriaNeural".to_string(),
        "en-US-GuyNeural".to_string(),
    ]
}

fn default_output_format() -> String {
    "audio-24khz-48kbitrate-mono-mp3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3 // Default to 3 attempts per voice
}

fn default_backoff_base_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_fps() -> u32 {
    24
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_trailing_pad_ms() -> u64 {
    500
}

fn default_fade_in_ms() -> u64 {
    200
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Every configured voice must be well-formed, in order
        crate::voice_utils::validate_voice_list(&self.narration.voices)?;

        if self.narration.endpoint.is_empty() {
            return Err(anyhow!("Speech endpoint must not be empty"));
        }
        url::Url::parse(&self.narration.endpoint).map_err(|e| {
            anyhow!("Invalid speech endpoint '{}': {}", self.narration.endpoint, e)
        })?;

        if self.render.fps == 0 || self.render.fps > 120 {
            return Err(anyhow!("Frame rate out of range: {}", self.render.fps));
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(anyhow!(
                "Frame size out of range: {}x{}",
                self.render.width, self.render.height
            ));
        }

        if self.narration.retry_count == 0 {
            return Err(anyhow!("Retry count must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            narration: NarrationConfig::default(),
            render: RenderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
