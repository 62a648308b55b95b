//! Best-effort translation of quiz content.
//!
//! Translation runs as a ladder: a structured whole-record attempt, then a
//! field-by-field fallback through a string translation service, then the
//! untranslated input with an advisory error. Callers always get a result.

pub mod cloud;
pub mod fieldwise;
pub mod resolver;
pub mod structured;

pub use cloud::CloudTranslateClient;
pub use fieldwise::FieldwiseTranslator;
pub use resolver::{Resolution, TranslationResolver, UNAVAILABLE_MESSAGE};
pub use structured::GeminiStructuredTranslator;

use crate::bank::Question;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Quiz content to translate. `answer` is expected to be one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    /// Human-readable language name, e.g. "French".
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: answer.into(),
            target_language: target_language.into(),
        }
    }

    pub fn for_question(question: &Question, target_language: impl Into<String>) -> Self {
        Self::new(
            question.question.clone(),
            question.options.clone(),
            question.answer.clone(),
            target_language,
        )
    }
}

/// Translated quiz content. Options keep the input's length and order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_question: String,
    pub translated_options: Vec<String>,
    pub translated_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    /// The untranslated input carrying `error`.
    pub fn echo(request: &TranslationRequest, error: impl Into<String>) -> Self {
        Self {
            translated_question: request.question.clone(),
            translated_options: request.options.clone(),
            translated_answer: request.answer.clone(),
            error: Some(error.into()),
        }
    }

    /// Usable as a translation of `request`: a non-empty question and one
    /// option per input option.
    pub fn is_valid_for(&self, request: &TranslationRequest) -> bool {
        !self.translated_question.trim().is_empty()
            && self.translated_options.len() == request.options.len()
    }
}

/// Translates a single string into a language identified by its short code.
#[async_trait]
pub trait StringTranslator: Send + Sync {
    async fn translate_string(&self, text: &str, language_code: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Translates a whole request in one call.
#[async_trait]
pub trait StructuredTranslator: Send + Sync {
    async fn attempt_structured(&self, request: &TranslationRequest) -> Result<TranslationResult>;
    fn name(&self) -> &'static str;
}
