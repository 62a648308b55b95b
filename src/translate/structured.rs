//! Whole-record translation through a schema-constrained Gemini prompt.

use crate::error::{PrepaceError, Result};
use crate::gemini::GeminiClient;
use crate::translate::{StructuredTranslator, TranslationRequest, TranslationResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub struct GeminiStructuredTranslator {
    client: GeminiClient,
}

/// Model output. Every field is optional so a partial answer reaches the
/// validity gate instead of failing to decode.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct StructuredOutput {
    translated_question: Option<String>,
    translated_options: Option<Vec<String>>,
    translated_answer: Option<String>,
}

impl GeminiStructuredTranslator {
    /// The attempt is a single request: the client's retry budget is
    /// overridden so a failing tier hands over to the fallback at once.
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client: client.with_max_retries(1),
        }
    }

    fn build_prompt(request: &TranslationRequest) -> String {
        let options: String = request
            .options
            .iter()
            .map(|o| format!("- {}", o))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a professional translator. Translate the following educational content into {language}.

Original Question: {question}
Options:
{options}
Answer: {answer}

Provide the translations for the question, each option, and the answer. Keep the options in the same order. Ensure the translations are accurate and maintain the educational context."#,
            language = request.target_language,
            question = request.question,
            answer = request.answer,
        )
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "translatedQuestion": {
                    "type": "STRING",
                    "description": "The translated question text."
                },
                "translatedOptions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "The translated multiple-choice options, in the original order."
                },
                "translatedAnswer": {
                    "type": "STRING",
                    "description": "The translated correct answer text."
                }
            },
            "required": ["translatedQuestion", "translatedOptions", "translatedAnswer"]
        })
    }

    fn into_result(
        output: StructuredOutput,
        request: &TranslationRequest,
    ) -> Result<TranslationResult> {
        let result = TranslationResult {
            translated_question: output.translated_question.unwrap_or_default(),
            translated_options: output.translated_options.unwrap_or_default(),
            translated_answer: output.translated_answer.unwrap_or_default(),
            error: None,
        };

        if result.translated_question.trim().is_empty() {
            return Err(PrepaceError::StructuredAttemptFailed(
                "model returned an empty translated question".to_string(),
            ));
        }

        if !result.is_valid_for(request) {
            return Err(PrepaceError::StructuredAttemptFailed(format!(
                "model returned {} options for {}",
                result.translated_options.len(),
                request.options.len()
            )));
        }

        Ok(result)
    }
}

#[async_trait]
impl StructuredTranslator for GeminiStructuredTranslator {
    async fn attempt_structured(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        debug!(
            "Structured translation to {} via {}",
            request.target_language,
            self.client.model()
        );

        let prompt = Self::build_prompt(request);
        let output: StructuredOutput = self
            .client
            .generate_json(&prompt, Self::response_schema())
            .await
            .map_err(|e| PrepaceError::StructuredAttemptFailed(e.to_string()))?;

        Self::into_result(output, request)
    }

    fn name(&self) -> &'static str {
        "gemini-structured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> TranslationRequest {
        TranslationRequest::new(
            "What is H2O?",
            vec!["Water".into(), "Salt".into(), "Sugar".into(), "Acid".into()],
            "Water",
            "French",
        )
    }

    #[test]
    fn test_build_prompt() {
        let prompt = GeminiStructuredTranslator::build_prompt(&sample_request());
        assert!(prompt.contains("into French"));
        assert!(prompt.contains("Original Question: What is H2O?"));
        assert!(prompt.contains("- Water\n- Salt\n- Sugar\n- Acid"));
        assert!(prompt.contains("Answer: Water"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = GeminiStructuredTranslator::response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert_eq!(schema["properties"]["translatedOptions"]["type"], "ARRAY");
    }

    #[test]
    fn test_into_result_success() {
        let output = StructuredOutput {
            translated_question: Some("Qu'est-ce que H2O ?".into()),
            translated_options: Some(vec![
                "Eau".into(),
                "Sel".into(),
                "Sucre".into(),
                "Acide".into(),
            ]),
            translated_answer: Some("Eau".into()),
        };
        let result = GeminiStructuredTranslator::into_result(output, &sample_request()).unwrap();
        assert_eq!(result.translated_answer, "Eau");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_into_result_empty_question_fails() {
        let output: StructuredOutput = serde_json::from_str("{}").unwrap();
        let err = GeminiStructuredTranslator::into_result(output, &sample_request()).unwrap_err();
        assert!(matches!(err, PrepaceError::StructuredAttemptFailed(_)));
    }

    #[test]
    fn test_into_result_option_count_mismatch_fails() {
        let output = StructuredOutput {
            translated_question: Some("Q".into()),
            translated_options: Some(vec!["Eau".into()]),
            translated_answer: Some("Eau".into()),
        };
        assert!(GeminiStructuredTranslator::into_result(output, &sample_request()).is_err());
    }
}
