use std::time::Duration;
use async_trait::async_trait;
use log::error;
use reqwest::Client;

use crate::errors::ProviderError;
use crate::providers::{SpeechAudio, SpeechProvider, SpeechRequest};
use crate::voice_utils;

/// Azure client for the Cognitive Services speech REST API
#[derive(Debug)]
pub struct AzureSpeech {
    /// HTTP client for API requests
    client: Client,
    /// Subscription key for authentication
    api_key: String,
    /// Regional endpoint URL, e.g. https://eastus.tts.speech.microsoft.com
    endpoint: String,
}

impl AzureSpeech {
    /// Create a new Azure speech client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, endpoint, 30)
    }

    /// Create a new Azure speech client with an explicit request timeout
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "{}/cognitiveservices/v1",
            self.endpoint.trim_end_matches('/')
        )
    }

    fn voices_url(&self) -> String {
        format!(
            "{}/cognitiveservices/voices/list",
            self.endpoint.trim_end_matches('/')
        )
    }

    /// Build the SSML document the endpoint expects. The speak element's
    /// language attribute comes from the voice identifier's locale.
    pub fn build_ssml(text: &str, voice: &str) -> String {
        let locale = voice_utils::parse_voice_id(voice)
            .map(|id| id.locale())
            .unwrap_or_else(|_| "en-US".to_string());

        format!(
            "<speak version='1.0' xml:lang='{}'><voice name='{}'>{}</voice></speak>",
            locale,
            voice,
            escape_xml(text)
        )
    }

    /// Map an HTTP failure status to the right provider error class
    fn classify_status(status: u16, message: String) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthenticationError(message),
            429 => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status,
                message,
            },
        }
    }
}

#[async_trait]
impl SpeechProvider for AzureSpeech {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, ProviderError> {
        let ssml = Self::build_ssml(&request.text, &request.voice);

        let response = self
            .client
            .post(self.synthesis_url())
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &request.output_format)
            .header("User-Agent", "slidecast")
            .body(ssml)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Speech API error ({}): {}", status, error_text);
            return Err(Self::classify_status(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::DecodeError(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ProviderError::DecodeError(
                "speech API returned an empty audio body".to_string(),
            ));
        }

        Ok(SpeechAudio {
            bytes: bytes.to_vec(),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.voices_url())
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::classify_status(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// Escape the five XML-reserved characters for the SSML body
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
