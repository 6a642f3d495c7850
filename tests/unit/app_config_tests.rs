/*!
 * Tests for app configuration
 */

use slidecast::app_config::{Config, LogLevel, NarrationConfig, RenderConfig};

/// Test that the default configuration is valid and carries the expected
/// voice fallback order
#[test]
fn test_default_config_shouldValidateAndOrderVoices() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.narration.primary_voice(), Some("en-US-ChristopherNeural"));
    assert_eq!(config.narration.voices.len(), 3);
    assert_eq!(config.narration.retry_count, 3);
    assert_eq!(config.narration.backoff_base_ms, 1000);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test the default render parameters
#[test]
fn test_default_render_shouldBe720pAt24Fps() {
    let render = RenderConfig::default();
    assert_eq!(render.fps, 24);
    assert_eq!(render.width, 1280);
    assert_eq!(render.height, 720);
    assert_eq!(render.trailing_pad_ms, 500);
    assert_eq!(render.fade_in_ms, 200);
}

/// Test JSON round-trip through serde
#[test]
fn test_config_serde_shouldRoundTrip() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.narration.voices, config.narration.voices);
    assert_eq!(parsed.render.fps, config.render.fps);
    assert_eq!(parsed.log_level, config.log_level);
}

/// Test that missing fields fall back to defaults on deserialization
#[test]
fn test_config_deserialize_withEmptyObject_shouldUseDefaults() {
    let parsed: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(parsed.narration.voices, NarrationConfig::default().voices);
    assert_eq!(parsed.render.fps, 24);
}

/// Test that an empty voice list fails validation
#[test]
fn test_validate_withEmptyVoiceList_shouldFail() {
    let mut config = Config::default();
    config.narration.voices.clear();
    assert!(config.validate().is_err());
}

/// Test that a malformed voice identifier fails validation
#[test]
fn test_validate_withBadVoiceId_shouldFail() {
    let mut config = Config::default();
    config.narration.voices = vec!["NotAVoice".to_string()];
    assert!(config.validate().is_err());
}

/// Test the render bounds checks
#[test]
fn test_validate_withBadRenderValues_shouldFail() {
    let mut config = Config::default();
    config.render.fps = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.render.width = 0;
    assert!(config.validate().is_err());
}

/// Test that zero retries is rejected (at least one attempt per voice)
#[test]
fn test_validate_withZeroRetries_shouldFail() {
    let mut config = Config::default();
    config.narration.retry_count = 0;
    assert!(config.validate().is_err());
}
