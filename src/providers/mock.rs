/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockSpeech::working()` - Always succeeds with a fake audio body
 * - `MockSpeech::failing()` - Always fails with a server error
 * - `MockSpeech::flaky(n)` - Fails the first n requests, then succeeds
 * - `MockSpeech::dead_voices(...)` - Fails for the named voices only
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{SpeechAudio, SpeechProvider, SpeechRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a fake audio body
    Working,
    /// Always fails with a retryable server error
    Failing,
    /// Fails the first N requests, then succeeds
    Flaky {
        /// Number of leading requests to fail
        fail_first: usize,
    },
    /// Fails any request using one of the named voices
    DeadVoices {
        /// Voice identifiers that always fail
        voices: Vec<String>,
    },
    /// Always fails with a non-retryable authentication error
    Unauthorized,
    /// Simulates a slow response (for timeout testing)
    Slow {
        /// Delay before responding, in milliseconds
        delay_ms: u64,
    },
}

/// Mock speech provider for testing synthesis behavior
#[derive(Debug)]
pub struct MockSpeech {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Voices seen, in request order, shared across clones
    requested_voices: Arc<Mutex<Vec<String>>>,
}

impl MockSpeech {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requested_voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails the first `fail_first` requests
    pub fn flaky(fail_first: usize) -> Self {
        Self::new(MockBehavior::Flaky { fail_first })
    }

    /// Create a mock that always fails with a non-retryable auth error
    pub fn unauthorized() -> Self {
        Self::new(MockBehavior::Unauthorized)
    }

    /// Create a mock where the named voices always fail
    pub fn dead_voices<I, S>(voices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::DeadVoices {
            voices: voices.into_iter().map(|v| v.into()).collect(),
        })
    }

    /// Number of synthesize calls received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Voices requested so far, in order
    pub fn requested_voices(&self) -> Vec<String> {
        self.requested_voices.lock().unwrap().clone()
    }

    /// A recognizably fake MP3 body
    fn fake_audio(request: &SpeechRequest) -> SpeechAudio {
        let mut bytes = b"ID3MOCK".to_vec();
        bytes.extend_from_slice(request.voice.as_bytes());
        SpeechAudio { bytes }
    }
}

impl Clone for MockSpeech {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            requested_voices: Arc::clone(&self.requested_voices),
        }
    }
}

#[async_trait]
impl SpeechProvider for MockSpeech {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requested_voices
            .lock()
            .unwrap()
            .push(request.voice.clone());

        match &self.behavior {
            MockBehavior::Working => Ok(Self::fake_audio(&request)),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Flaky { fail_first } => {
                if count < *fail_first {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated transient failure (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(Self::fake_audio(&request))
                }
            }

            MockBehavior::DeadVoices { voices } => {
                if voices.iter().any(|v| v == &request.voice) {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated dead voice: {}", request.voice),
                    })
                } else {
                    Ok(Self::fake_audio(&request))
                }
            }

            MockBehavior::Unauthorized => Err(ProviderError::AuthenticationError(
                "Simulated invalid subscription key".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(Self::fake_audio(&request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
