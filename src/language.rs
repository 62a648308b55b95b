//! Language name to short code mapping used by the string translation service.

use crate::error::{PrepaceError, Result};

/// Lower-cased language name to code. Read-only, process-wide.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("yoruba", "yo"),
    ("hausa", "ha"),
    ("igbo", "ig"),
    ("spanish", "es"),
    ("portuguese", "pt"),
    ("german", "de"),
    ("arabic", "ar"),
    ("swahili", "sw"),
    ("chinese", "zh"),
    ("japanese", "ja"),
];

/// Languages offered in the practice language picker, English first.
pub const PRACTICE_LANGUAGES: &[&str] = &["English", "French", "Yoruba", "Hausa", "Igbo"];

/// Resolve a human-readable language name to its code.
///
/// Lookup is case-insensitive. Unmapped names fall back to their first two
/// characters, lower-cased. An empty name has no code.
pub fn language_code(name: &str) -> Result<String> {
    let lowercase = name.trim().to_lowercase();

    if lowercase.is_empty() {
        return Err(PrepaceError::FallbackOrchestrationFailed(
            "target language is empty".to_string(),
        ));
    }

    if let Some((_, code)) = LANGUAGE_CODES.iter().find(|(n, _)| *n == lowercase) {
        return Ok((*code).to_string());
    }

    Ok(lowercase.chars().take(2).collect())
}

/// English needs no translation; the question bank is authored in it.
pub fn is_source_language(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case("english")
}
