use crate::config::Config;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::translate::{
    CloudTranslateClient, FieldwiseTranslator, GeminiStructuredTranslator, StringTranslator,
    StructuredTranslator, TranslationRequest, TranslationResult,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Advisory note attached when no tier could translate.
pub const UNAVAILABLE_MESSAGE: &str =
    "Translation service is temporarily unavailable. Showing original text.";

/// How a request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The structured attempt produced a valid translation.
    StructuredOk(TranslationResult),
    /// The field-wise fallback completed, possibly with some fields untranslated.
    FieldwiseOk(TranslationResult),
    /// Both tiers failed; the input is echoed with an error note.
    Degraded(TranslationResult),
}

impl Resolution {
    pub fn result(&self) -> &TranslationResult {
        match self {
            Resolution::StructuredOk(r) | Resolution::FieldwiseOk(r) | Resolution::Degraded(r) => r,
        }
    }

    pub fn into_result(self) -> TranslationResult {
        match self {
            Resolution::StructuredOk(r) | Resolution::FieldwiseOk(r) | Resolution::Degraded(r) => r,
        }
    }

    pub fn tier(&self) -> &'static str {
        match self {
            Resolution::StructuredOk(_) => "structured",
            Resolution::FieldwiseOk(_) => "fieldwise",
            Resolution::Degraded(_) => "degraded",
        }
    }
}

/// Runs the translation ladder. Holds no per-request state.
pub struct TranslationResolver {
    structured: Arc<dyn StructuredTranslator>,
    fieldwise: FieldwiseTranslator,
}

impl TranslationResolver {
    pub fn new(
        structured: Box<dyn StructuredTranslator>,
        strings: Box<dyn StringTranslator>,
    ) -> Self {
        Self {
            structured: Arc::from(structured),
            fieldwise: FieldwiseTranslator::new(strings),
        }
    }

    /// Wire the Gemini structured translator and the cloud string translator.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = GeminiClient::from_config(config)?;
        let cloud = CloudTranslateClient::from_config(config)?;

        Ok(Self::new(
            Box::new(GeminiStructuredTranslator::new(gemini)),
            Box::new(cloud),
        ))
    }

    /// Translate `request`, never failing.
    pub async fn resolve(&self, request: &TranslationRequest) -> TranslationResult {
        self.resolve_outcome(request).await.into_result()
    }

    /// Translate `request` and report which tier produced the result.
    pub async fn resolve_outcome(&self, request: &TranslationRequest) -> Resolution {
        debug!(
            "Resolving translation to {} ({} options)",
            request.target_language,
            request.options.len()
        );

        match self.structured.attempt_structured(request).await {
            Ok(result) if result.is_valid_for(request) => {
                debug!("Structured translation via {} succeeded", self.structured.name());
                return Resolution::StructuredOk(TranslationResult {
                    error: None,
                    ..result
                });
            }
            Ok(_) => warn!("Structured translation returned an unusable result, falling back"),
            Err(e) => warn!("{}, falling back to field-wise translation", e),
        }

        match self.fieldwise.attempt_fieldwise(request).await {
            Ok(result) => {
                info!("Translated to {} field by field", request.target_language);
                Resolution::FieldwiseOk(result)
            }
            Err(e) => {
                warn!("{}; showing original text", e);
                Resolution::Degraded(TranslationResult::echo(request, UNAVAILABLE_MESSAGE))
            }
        }
    }
}
