/*!
 * Tests for error types and their retry classification
 */

use slidecast::errors::{AppError, ProviderError, RenderError, ScriptError, SynthesisError};

/// Test the retryability matrix for provider errors
#[test]
fn test_provider_error_isRetryable_shouldMatchClass() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::RequestFailed("timeout".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("429".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: "busy".into() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: "bad ssml".into() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("bad key".into()).is_retryable());
    assert!(!ProviderError::DecodeError("empty body".into()).is_retryable());
}

/// Test display formatting of the main error variants
#[test]
fn test_error_display_shouldNameTheFailure() {
    let e = ProviderError::ApiError { status_code: 503, message: "busy".into() };
    assert_eq!(e.to_string(), "API responded with error: 503 - busy");

    let e = ScriptError::BadWindow { start_secs: 10, end_secs: 5 };
    assert!(e.to_string().contains("end 5s <= start 10s"));

    let e = SynthesisError::AllVoicesExhausted { voices: 3, attempts: 2 };
    assert!(e.to_string().contains("3 configured voices"));

    let e = RenderError::ToolTimeout { tool: "ffmpeg", secs: 300 };
    assert!(e.to_string().contains("ffmpeg timed out"));
}

/// Test the error conversion chain up to AppError
#[test]
fn test_app_error_fromChain_shouldWrapSources() {
    let app: AppError = ProviderError::AuthenticationError("bad key".into()).into();
    assert!(matches!(app, AppError::Provider(_)));

    let app: AppError = SynthesisError::AllVoicesExhausted { voices: 1, attempts: 1 }.into();
    assert!(matches!(app, AppError::Synthesis(_)));

    let app: AppError = RenderError::EmptyTimeline.into();
    assert!(matches!(app, AppError::Render(_)));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let app: AppError = io.into();
    assert!(matches!(app, AppError::File(_)));
}
