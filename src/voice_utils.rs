use anyhow::{Result, anyhow};

/// Voice identifier utilities
///
/// Neural voice names follow the `<lang>-<REGION>-<Name>` convention,
/// e.g. `en-US-ChristopherNeural`. This module validates and splits them
/// so configuration mistakes surface before the first network call.
/// Parsed parts of a voice identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceId {
    /// Lowercase language subtag, e.g. "en"
    pub language: String,
    /// Uppercase region subtag, e.g. "US"
    pub region: String,
    /// Voice display name, e.g. "ChristopherNeural"
    pub name: String,
}

impl VoiceId {
    /// Locale prefix, e.g. "en-US"
    pub fn locale(&self) -> String {
        format!("{}-{}", self.language, self.region)
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.language, self.region, self.name)
    }
}

/// Parse and validate a `<lang>-<REGION>-<Name>` voice identifier
pub fn parse_voice_id(identifier: &str) -> Result<VoiceId> {
    let trimmed = identifier.trim();
    let parts: Vec<&str> = trimmed.splitn(3, '-').collect();

    if parts.len() != 3 {
        return Err(anyhow!(
            "Invalid voice identifier '{}': expected <lang>-<REGION>-<Name>",
            identifier
        ));
    }

    let language = parts[0];
    let region = parts[1];
    let name = parts[2];

    if language.len() < 2
        || language.len() > 3
        || !language.chars().all(|c| c.is_ascii_lowercase())
    {
        return Err(anyhow!(
            "Invalid language subtag '{}' in voice identifier '{}'",
            language, identifier
        ));
    }

    if region.len() != 2 || !region.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(anyhow!(
            "Invalid region subtag '{}' in voice identifier '{}'",
            region, identifier
        ));
    }

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(anyhow!(
            "Invalid voice name '{}' in voice identifier '{}'",
            name, identifier
        ));
    }

    Ok(VoiceId {
        language: language.to_string(),
        region: region.to_string(),
        name: name.to_string(),
    })
}

/// Validate every identifier in a configured voice list, keeping order
pub fn validate_voice_list(voices: &[String]) -> Result<Vec<VoiceId>> {
    if voices.is_empty() {
        return Err(anyhow!("Voice list is empty: at least one voice is required"));
    }
    voices.iter().map(|v| parse_voice_id(v)).collect()
}

/// Whether two identifiers name the same voice (case-insensitive compare)
pub fn voice_ids_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
