/*!
 * Narration synthesis service.
 *
 * This module turns narration text into audio assets on disk. It owns the
 * only retry logic in the pipeline: each configured voice is attempted up
 * to `retry_count` times with exponential backoff, and when a voice's
 * retries are exhausted the service advances to the next voice in the
 * configured order. Only when every voice has failed does a segment's
 * synthesis fail — and that failure is a skip signal for the caller, not
 * an abort.
 */

use std::path::Path;
use std::time::Duration;
use log::{debug, warn};
use rand::Rng;

use crate::app_config::NarrationConfig;
use crate::errors::SynthesisError;
use crate::providers::azure::AzureSpeech;
use crate::providers::{SpeechProvider, SpeechRequest};

/// Main synthesis service for narration audio
pub struct SynthesisService {
    /// Provider backend
    provider: Box<dyn SpeechProvider>,

    /// Configuration for the synthesis service
    pub config: NarrationConfig,
}

impl SynthesisService {
    /// Create a new synthesis service backed by the configured speech endpoint
    pub fn new(config: NarrationConfig) -> Self {
        let provider = AzureSpeech::new_with_config(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.timeout_secs,
        );
        Self {
            provider: Box::new(provider),
            config,
        }
    }

    /// Create a synthesis service over an explicit provider (used by tests)
    pub fn with_provider(provider: Box<dyn SpeechProvider>, config: NarrationConfig) -> Self {
        Self { provider, config }
    }

    /// Test the connection to the speech provider
    pub async fn test_connection(&self) -> Result<(), SynthesisError> {
        self.provider.test_connection().await.map_err(Into::into)
    }

    /// Synthesize narration text into an audio file at `output`.
    ///
    /// Walks the configured voice list in order. A voice is retried with
    /// exponential backoff until `retry_count` attempts are spent or a
    /// non-retryable error says more attempts cannot help; then the next
    /// voice takes over. Exhausting every voice yields
    /// [`SynthesisError::AllVoicesExhausted`].
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        output: &Path,
    ) -> Result<(), SynthesisError> {
        for voice in &self.config.voices {
            match self.try_voice(text, voice).await {
                Some(bytes) => {
                    std::fs::write(output, bytes)
                        .map_err(|e| SynthesisError::Write(e.to_string()))?;
                    debug!("Narration written to {:?} using voice {}", output, voice);
                    return Ok(());
                }
                None => {
                    warn!("Voice {} failed completely, trying next voice", voice);
                }
            }
        }

        Err(SynthesisError::AllVoicesExhausted {
            voices: self.config.voices.len(),
            attempts: self.config.retry_count,
        })
    }

    /// Attempt one voice with the full retry budget. Returns the audio
    /// bytes on success, None once the voice is written off.
    async fn try_voice(&self, text: &str, voice: &str) -> Option<Vec<u8>> {
        let max_attempts = self.config.retry_count.max(1);

        for attempt in 1..=max_attempts {
            debug!("Attempting voice {} (try {}/{})", voice, attempt, max_attempts);

            let request =
                SpeechRequest::new(text, voice, self.config.output_format.as_str());

            match self.provider.synthesize(request).await {
                Ok(audio) => return Some(audio.bytes),
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Synthesis with voice {} failed (attempt {}/{}): {}",
                        voice, attempt, max_attempts, e
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                    }
                }
                Err(e) => {
                    // Retrying the same request cannot help here.
                    warn!("Synthesis with voice {} failed terminally: {}", voice, e);
                    return None;
                }
            }
        }

        None
    }

    /// Exponential backoff with a little jitter so repeated failures do not
    /// hammer the endpoint in lockstep.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.config.backoff_base_ms * (1u64 << (attempt - 1));
        let jitter = rand::rng().random_range(0..250);
        Duration::from_millis(base + jitter)
    }
}
