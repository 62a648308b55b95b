//! Integration tests for prepace
//!
//! These tests exercise the question bank, progress tracking, grading and the
//! translation ladder together without requiring external API keys.

use async_trait::async_trait;
use prepace::bank::{NewQuestion, QuestionBank};
use prepace::config::Config;
use prepace::progress::ProgressStore;
use prepace::quiz::{correct_option, displayed, grade, PracticeSession};
use prepace::translate::{
    Resolution, StringTranslator, StructuredTranslator, TranslationRequest, TranslationResolver,
    TranslationResult, UNAVAILABLE_MESSAGE,
};
use prepace::{PrepaceError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Structured translator that is always down.
struct DownStructured;

#[async_trait]
impl StructuredTranslator for DownStructured {
    async fn attempt_structured(&self, _request: &TranslationRequest) -> Result<TranslationResult> {
        Err(PrepaceError::StructuredAttemptFailed("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

/// Uppercases text, failing on a chosen input or a chosen call number.
struct Shouting {
    fail_on: Option<&'static str>,
    fail_call: Option<usize>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl StringTranslator for Shouting {
    async fn translate_string(&self, text: &str, _language_code: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(text) || self.fail_call == Some(call) {
            return Err(PrepaceError::RemoteUnavailable("offline".to_string()));
        }
        Ok(text.to_uppercase())
    }

    fn name(&self) -> &'static str {
        "shouting"
    }
}

fn shouting_resolver(fail_on: Option<&'static str>) -> (TranslationResolver, Arc<AtomicUsize>) {
    build_shouting_resolver(fail_on, None)
}

/// Field calls start in slot order: question, answer, then options.
fn shouting_resolver_failing_call(call: usize) -> TranslationResolver {
    build_shouting_resolver(None, Some(call)).0
}

fn build_shouting_resolver(
    fail_on: Option<&'static str>,
    fail_call: Option<usize>,
) -> (TranslationResolver, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = TranslationResolver::new(
        Box::new(DownStructured),
        Box::new(Shouting {
            fail_on,
            fail_call,
            calls: calls.clone(),
        }),
    );
    (resolver, calls)
}

// ============================================================================
// Config Integration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.gemini_api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }
}

// ============================================================================
// Practice Flow Tests
// ============================================================================

mod practice_tests {
    use super::*;

    #[tokio::test]
    async fn test_translated_practice_session() {
        let dir = TempDir::new().unwrap();
        let bank = QuestionBank::builtin().unwrap();
        let mut progress = ProgressStore::open(dir.path().join("progress.json"));
        let (resolver, _calls) = shouting_resolver(None);

        let questions = bank.require("Chemistry", "2023").unwrap();
        let mut session = PracticeSession::new("Chemistry", "2023", questions);

        while let Some(question) = session.current() {
            let translation = resolver
                .resolve(&TranslationRequest::for_question(question, "French"))
                .await;
            let pick = translation
                .translated_options
                .iter()
                .position(|o| *o == translation.translated_answer)
                .unwrap();

            let answered = session.answer(pick).unwrap();
            assert!(answered.correct);
            progress.mark_completed("Chemistry", "2023", question.id);
            session.next();
        }

        assert_eq!(session.score(), 2);
        assert_eq!(progress.subject_progress(&bank, "Chemistry"), 2);

        let reopened = ProgressStore::open(dir.path().join("progress.json"));
        assert!(reopened.is_completed("Chemistry", "2023", 1));
        assert!(reopened.is_completed("Chemistry", "2023", 2));
        assert!(!reopened.is_completed("Chemistry", "2022", 1));
    }

    #[test]
    fn test_translated_view_shows_translated_correct_option() {
        let bank = QuestionBank::builtin().unwrap();
        let question = bank.find("Physics", "2023", 1).unwrap();
        let (resolver, _calls) = shouting_resolver(None);

        let translation = tokio_test::block_on(
            resolver.resolve(&TranslationRequest::for_question(question, "Yoruba")),
        );
        let (_, options) = displayed(question, Some(&translation));

        let index = question.answer_index().unwrap();
        assert!(grade(question, index));
        assert!(!grade(question, (index + 1) % options.len()));
        assert_eq!(correct_option(question, options), "AMPERE");
    }

    #[tokio::test]
    async fn test_answer_left_untranslated_still_grades_correct_option() {
        let bank = QuestionBank::builtin().unwrap();
        let questions = bank.require("Chemistry", "2023").unwrap();
        let question = &questions[0];
        let resolver = shouting_resolver_failing_call(1);

        let translation = resolver
            .resolve(&TranslationRequest::for_question(question, "French"))
            .await;
        assert_eq!(translation.translated_answer, question.answer);
        assert!(translation.error.is_none());
        for (translated, original) in translation.translated_options.iter().zip(&question.options) {
            assert_eq!(translated, &original.to_uppercase());
        }

        let (_, options) = displayed(question, Some(&translation));
        let index = question.answer_index().unwrap();
        assert_eq!(correct_option(question, options), question.answer.to_uppercase());

        let mut session = PracticeSession::new("Chemistry", "2023", questions);
        assert!(session.answer(index).unwrap().correct);
    }
}

// ============================================================================
// Translation Ladder Tests
// ============================================================================

mod ladder_tests {
    use super::*;

    #[tokio::test]
    async fn test_every_builtin_question_keeps_option_order() {
        let bank = QuestionBank::builtin().unwrap();
        let (resolver, _calls) = shouting_resolver(None);

        for subject in bank.subjects() {
            for year in bank.years(subject) {
                for question in bank.questions(subject, year) {
                    let request = TranslationRequest::for_question(question, "Igbo");
                    let result = resolver.resolve(&request).await;

                    assert_eq!(result.translated_options.len(), question.options.len());
                    for (translated, original) in
                        result.translated_options.iter().zip(&question.options)
                    {
                        assert_eq!(translated, &original.to_uppercase());
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_field_isolation() {
        let (resolver, calls) = shouting_resolver(Some("Salt"));
        let request = TranslationRequest::new(
            "What is H2O?",
            vec!["Water".into(), "Salt".into(), "Sugar".into(), "Acid".into()],
            "Water",
            "French",
        );

        let outcome = resolver.resolve_outcome(&request).await;
        assert!(matches!(outcome, Resolution::FieldwiseOk(_)));

        let result = outcome.into_result();
        assert_eq!(result.translated_options, vec!["WATER", "Salt", "SUGAR", "ACID"]);
        assert_eq!(result.translated_question, "WHAT IS H2O?");
        assert!(result.error.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_total_failure_is_advisory_only() {
        let (resolver, _calls) = shouting_resolver(None);
        let request = TranslationRequest::new("Pick one", vec!["A".into(), "B".into()], "A", " ");

        let result = resolver.resolve(&request).await;
        assert_eq!(result.translated_question, "Pick one");
        assert_eq!(result.translated_options, vec!["A", "B"]);
        assert_eq!(result.error.as_deref(), Some(UNAVAILABLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let (resolver, calls) = shouting_resolver(None);
        let resolver = Arc::new(resolver);

        let handles: Vec<_> = ["Chemistry", "Biology"]
            .into_iter()
            .map(|subject| {
                let resolver = resolver.clone();
                tokio::spawn(async move {
                    let bank = QuestionBank::builtin().unwrap();
                    let question = bank.questions(subject, "2023")[0].clone();
                    let result = resolver
                        .resolve(&TranslationRequest::for_question(&question, "Hausa"))
                        .await;
                    (question, result)
                })
            })
            .collect();

        for handle in handles {
            let (question, result) = handle.await.unwrap();
            assert_eq!(result.translated_question, question.question.to_uppercase());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 12);
    }
}

// ============================================================================
// Question Bank Tests
// ============================================================================

mod bank_tests {
    use super::*;

    #[test]
    fn test_added_question_is_practisable() {
        let dir = TempDir::new().unwrap();
        let bank_path = dir.path().join("questions.json");

        let mut bank = QuestionBank::load(Some(bank_path.as_path())).unwrap();
        bank.add_question(NewQuestion {
            subject: "Physics".to_string(),
            year: "2024".to_string(),
            question: "What is the SI unit of force?".to_string(),
            options: vec!["Newton".to_string(), "Joule".to_string(), "Pascal".to_string()],
            answer: "Newton".to_string(),
        })
        .unwrap();
        bank.save().unwrap();

        let bank = QuestionBank::load(Some(bank_path.as_path())).unwrap();
        assert_eq!(bank.years("Physics"), vec!["2024", "2023"]);
        assert_eq!(bank.total_questions("Physics"), 2);

        let questions = bank.require("Physics", "2024").unwrap();
        let mut session = PracticeSession::new("Physics", "2024", questions);
        assert!(session.answer(0).unwrap().correct);
    }

    #[test]
    fn test_invalid_question_is_rejected() {
        let mut bank = QuestionBank::builtin().unwrap();
        let result = bank.add_question(NewQuestion {
            subject: "Physics".to_string(),
            year: "24".to_string(),
            question: "What is the SI unit of force?".to_string(),
            options: vec!["Newton".to_string(), "Joule".to_string()],
            answer: "Newton".to_string(),
        });
        assert!(matches!(result, Err(PrepaceError::InvalidQuestion(_))));
        assert_eq!(bank.total(), 8);
    }
}
