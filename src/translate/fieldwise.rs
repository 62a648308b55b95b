//! Field-by-field fallback translation.
//!
//! Every string in the request is translated by its own call. Calls run
//! concurrently and fail independently: a field whose call fails keeps its
//! original text.

use crate::error::{PrepaceError, Result};
use crate::language::language_code;
use crate::translate::{StringTranslator, TranslationRequest, TranslationResult};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotOutcome {
    Translated,
    /// The call failed and the original text was kept.
    Degraded,
    /// Blank input, no call made.
    Skipped,
}

/// Output of one field's translation call.
#[derive(Debug)]
struct SlotResult {
    slot: usize,
    text: String,
    outcome: SlotOutcome,
}

/// Fixed slot layout: question, answer, then options in order.
const QUESTION_SLOT: usize = 0;
const ANSWER_SLOT: usize = 1;
const FIRST_OPTION_SLOT: usize = 2;

pub struct FieldwiseTranslator {
    translator: Arc<dyn StringTranslator>,
}

impl FieldwiseTranslator {
    pub fn new(translator: Box<dyn StringTranslator>) -> Self {
        Self {
            translator: Arc::from(translator),
        }
    }

    pub fn from_arc(translator: Arc<dyn StringTranslator>) -> Self {
        Self { translator }
    }

    pub async fn attempt_fieldwise(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let code = language_code(&request.target_language)?;

        let fields: Vec<&str> = [request.question.as_str(), request.answer.as_str()]
            .into_iter()
            .chain(request.options.iter().map(String::as_str))
            .collect();
        let total = fields.len();

        debug!(
            "Field-wise translation of {} fields to {} via {}",
            total,
            code,
            self.translator.name()
        );

        let mut calls = FuturesUnordered::new();

        for (slot, text) in fields.into_iter().enumerate() {
            let translator = self.translator.clone();
            let code = code.as_str();

            calls.push(async move {
                if text.trim().is_empty() {
                    return SlotResult {
                        slot,
                        text: text.to_string(),
                        outcome: SlotOutcome::Skipped,
                    };
                }

                match translator.translate_string(text, code).await {
                    Ok(translated) => SlotResult {
                        slot,
                        text: translated,
                        outcome: SlotOutcome::Translated,
                    },
                    Err(e) => {
                        warn!("Field {} kept original text: {}", slot, e);
                        SlotResult {
                            slot,
                            text: text.to_string(),
                            outcome: SlotOutcome::Degraded,
                        }
                    }
                }
            });
        }

        let mut results: Vec<SlotResult> = Vec::with_capacity(total);
        while let Some(result) = calls.next().await {
            results.push(result);
        }

        results.sort_by_key(|r| r.slot);

        let count = |outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let degraded = count(SlotOutcome::Degraded);
        let translated = count(SlotOutcome::Translated);

        // Every call failing means the service is down, not that a field was rejected
        if degraded > 0 && translated == 0 {
            return Err(PrepaceError::FallbackOrchestrationFailed(format!(
                "all {} translation calls via {} failed",
                degraded,
                self.translator.name()
            )));
        }
        if degraded > 0 {
            debug!("{}/{} fields degraded to original text", degraded, total);
        }

        Self::assemble(results, request.options.len())
    }

    fn assemble(results: Vec<SlotResult>, option_count: usize) -> Result<TranslationResult> {
        if results.len() != FIRST_OPTION_SLOT + option_count
            || results.iter().enumerate().any(|(i, r)| r.slot != i)
        {
            return Err(PrepaceError::FallbackOrchestrationFailed(format!(
                "expected {} translated fields, got {}",
                FIRST_OPTION_SLOT + option_count,
                results.len()
            )));
        }

        let mut texts = results.into_iter().map(|r| r.text);
        let mut take = |slot: usize| {
            texts.next().ok_or_else(|| {
                PrepaceError::FallbackOrchestrationFailed(format!("missing field {}", slot))
            })
        };

        let translated_question = take(QUESTION_SLOT)?;
        let translated_answer = take(ANSWER_SLOT)?;
        let translated_options = (0..option_count)
            .map(|i| take(FIRST_OPTION_SLOT + i))
            .collect::<Result<Vec<_>>>()?;

        Ok(TranslationResult {
            translated_question,
            translated_options,
            translated_answer,
            error: None,
        })
    }
}
