//! AI tutor prompts: answer explanations and follow-up questions.

use crate::error::Result;
use crate::gemini::GeminiClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Shown when an explanation cannot be fetched.
pub const EXPLANATION_UNAVAILABLE: &str = "Sorry, I couldn't fetch an explanation right now.";

#[async_trait]
pub trait Tutor: Send + Sync {
    /// Explain whether `answer` is right for `question`, briefly.
    async fn explain(&self, question: &str, answer: &str, is_correct: bool) -> Result<String>;

    /// Answer a student's follow-up question about `subject`.
    async fn answer_follow_up(&self, subject: &str, question: &str) -> Result<String>;
}

pub struct GeminiTutor {
    client: GeminiClient,
}

#[derive(Deserialize)]
struct ExplanationOutput {
    explanation: String,
}

#[derive(Deserialize)]
struct FollowUpOutput {
    answer: String,
}

impl GeminiTutor {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn explanation_prompt(question: &str, answer: &str, is_correct: bool) -> String {
        format!(
            "You are an AI tutor. A student selected this answer to a WAEC question. Is it right or wrong? Explain why, in under 50 words, using simple terms.\n\nQuestion: {}\nAnswer: {}\nCorrect: {}",
            question, answer, is_correct
        )
    }

    fn follow_up_prompt(subject: &str, question: &str) -> String {
        format!(
            "You are an AI tutor specializing in {}. A student has asked the following follow-up question:\n\n{}\n\nProvide a clear, concise, and easy-to-understand answer.",
            subject, question
        )
    }

    fn single_field_schema(field: &str, description: &str) -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                field: { "type": "STRING", "description": description }
            },
            "required": [field]
        })
    }
}

#[async_trait]
impl Tutor for GeminiTutor {
    async fn explain(&self, question: &str, answer: &str, is_correct: bool) -> Result<String> {
        debug!("Requesting explanation (correct: {})", is_correct);

        let output: ExplanationOutput = self
            .client
            .generate_json(
                &Self::explanation_prompt(question, answer, is_correct),
                Self::single_field_schema(
                    "explanation",
                    "The AI-generated explanation of the answer.",
                ),
            )
            .await?;
        Ok(output.explanation.trim().to_string())
    }

    async fn answer_follow_up(&self, subject: &str, question: &str) -> Result<String> {
        debug!("Requesting follow-up answer for {}", subject);

        let output: FollowUpOutput = self
            .client
            .generate_json(
                &Self::follow_up_prompt(subject, question),
                Self::single_field_schema(
                    "answer",
                    "The AI-generated answer to the follow-up question.",
                ),
            )
            .await?;
        Ok(output.answer.trim().to_string())
    }
}
