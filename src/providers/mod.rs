/*!
 * Provider implementations for speech synthesis services.
 *
 * This module contains client implementations for text-to-speech backends:
 * - Azure: Azure Cognitive Services speech REST API
 * - Mock: scripted in-memory provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single synthesis request: one narration text, one voice
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Plain narration text (markdown already stripped)
    pub text: String,

    /// Voice identifier, e.g. "en-US-ChristopherNeural"
    pub voice: String,

    /// Audio output format identifier
    pub output_format: String,
}

impl SpeechRequest {
    /// Create a new synthesis request
    pub fn new(
        text: impl Into<String>,
        voice: impl Into<String>,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            output_format: output_format.into(),
        }
    }
}

/// Synthesized audio returned by a provider
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// Encoded audio bytes (MP3 unless the format says otherwise)
    pub bytes: Vec<u8>,
}

/// Common trait for all speech providers
///
/// The trait is object safe so the synthesis service can hold any backend
/// behind a `Box<dyn SpeechProvider>`, which is how tests slot in the mock.
#[async_trait]
pub trait SpeechProvider: Send + Sync + Debug {
    /// Synthesize one request into audio, or a provider error
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod azure;
pub mod mock;
