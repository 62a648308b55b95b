//! Answer grading and practice-session state.

use crate::bank::Question;
use crate::translate::TranslationResult;

/// Whether the option at `selected` is correct for `question`.
///
/// Grading is by position. Translated options keep their order, but the
/// translated answer may not match its option text (a field can keep its
/// original wording while the option beside it is translated).
pub fn grade(question: &Question, selected: usize) -> bool {
    question.answer_index() == Some(selected)
}

/// Text of the correct option as it is displayed.
pub fn correct_option<'a>(question: &'a Question, options: &'a [String]) -> &'a str {
    question
        .answer_index()
        .and_then(|i| options.get(i))
        .map(String::as_str)
        .unwrap_or(question.answer.as_str())
}

/// Question text and options as they should be shown.
pub fn displayed<'a>(
    question: &'a Question,
    translation: Option<&'a TranslationResult>,
) -> (&'a str, &'a [String]) {
    match translation {
        Some(t) if !t.translated_question.is_empty() => {
            (t.translated_question.as_str(), t.translated_options.as_slice())
        }
        _ => (question.question.as_str(), question.options.as_slice()),
    }
}

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub question_id: u32,
    /// Index of the chosen option.
    pub selected: usize,
    pub correct: bool,
}

/// Walks a student through the questions of one subject and year.
pub struct PracticeSession<'a> {
    pub subject: String,
    pub year: String,
    questions: &'a [Question],
    index: usize,
    answers: Vec<Answered>,
}

impl<'a> PracticeSession<'a> {
    pub fn new(subject: impl Into<String>, year: impl Into<String>, questions: &'a [Question]) -> Self {
        Self {
            subject: subject.into(),
            year: year.into(),
            questions,
            index: 0,
            answers: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&'a Question> {
        self.questions.get(self.index)
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Share of questions already passed, 0–100.
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            100.0
        } else {
            self.index.min(self.questions.len()) as f64 * 100.0 / self.questions.len() as f64
        }
    }

    /// Record the option picked for the current question. Returns `None`
    /// once the session is complete or the current question was already
    /// answered.
    pub fn answer(&mut self, selected: usize) -> Option<&Answered> {
        let question = self.current()?;
        if self.answers.iter().any(|a| a.question_id == question.id) {
            return None;
        }

        self.answers.push(Answered {
            question_id: question.id,
            selected,
            correct: grade(question, selected),
        });
        self.answers.last()
    }

    pub fn next(&mut self) {
        if !self.is_complete() {
            self.index += 1;
        }
    }

    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    pub fn answers(&self) -> &[Answered] {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                id: 1,
                question: "What is H2O?".to_string(),
                options: vec!["Water".into(), "Salt".into(), "Sugar".into(), "Acid".into()],
                answer: "Water".to_string(),
            },
            Question {
                id: 2,
                question: "What is NaCl?".to_string(),
                options: vec!["Water".into(), "Salt".into()],
                answer: "Salt".to_string(),
            },
        ]
    }

    fn french() -> TranslationResult {
        TranslationResult {
            translated_question: "Qu'est-ce que H2O ?".into(),
            translated_options: vec!["Eau".into(), "Sel".into(), "Sucre".into(), "Acide".into()],
            translated_answer: "Eau".into(),
            error: None,
        }
    }

    #[test]
    fn test_grade_by_position() {
        let qs = questions();
        assert!(grade(&qs[0], 0));
        assert!(!grade(&qs[0], 1));
        assert!(grade(&qs[1], 1));
        assert!(!grade(&qs[1], 7));
    }

    #[test]
    fn test_answer_kept_in_original_still_grades_translated_option() {
        let qs = questions();
        let t = TranslationResult {
            translated_answer: "Water".into(),
            ..french()
        };
        let (_, options) = displayed(&qs[0], Some(&t));
        assert_eq!(options[0], "Eau");
        assert!(grade(&qs[0], 0));
        assert_eq!(correct_option(&qs[0], options), "Eau");
    }

    #[test]
    fn test_correct_option_follows_display() {
        let qs = questions();
        let t = french();
        assert_eq!(correct_option(&qs[0], &qs[0].options), "Water");
        assert_eq!(correct_option(&qs[0], &t.translated_options), "Eau");

        let request = crate::translate::TranslationRequest::for_question(&qs[0], "French");
        let echoed = TranslationResult::echo(&request, "down");
        assert_eq!(correct_option(&qs[0], &echoed.translated_options), "Water");
    }

    #[test]
    fn test_displayed() {
        let qs = questions();
        let t = french();
        assert_eq!(displayed(&qs[0], None).0, "What is H2O?");
        let (text, options) = displayed(&qs[0], Some(&t));
        assert_eq!(text, "Qu'est-ce que H2O ?");
        assert_eq!(options[0], "Eau");
    }

    #[test]
    fn test_session_flow() {
        let qs = questions();
        let mut session = PracticeSession::new("Chemistry", "2023", &qs);
        assert_eq!(session.len(), 2);
        assert_eq!(session.progress_percent(), 0.0);

        assert!(session.answer(0).unwrap().correct);
        assert!(session.answer(1).is_none());

        session.next();
        assert_eq!(session.position(), 1);
        assert!(!session.answer(0).unwrap().correct);
        assert_eq!(session.answers()[1].selected, 0);

        session.next();
        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert_eq!(session.progress_percent(), 100.0);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 2);

        session.next();
        assert_eq!(session.position(), 2);
    }
}
