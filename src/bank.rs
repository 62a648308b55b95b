//! Past-exam question bank: subject → year → questions.

use crate::error::{PrepaceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

type Subjects = BTreeMap<String, BTreeMap<String, Vec<Question>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    /// Position label of an option: A, B, C, D.
    pub fn option_label(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }

    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.answer)
    }
}

/// A question submitted for addition to the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub subject: String,
    pub year: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl NewQuestion {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(PrepaceError::InvalidQuestion(msg.to_string()));

        if self.subject.trim().is_empty() {
            return invalid("Please select a subject.");
        }
        if self.year.len() != 4 || !self.year.chars().all(|c| c.is_ascii_digit()) {
            return invalid("Please enter a valid year.");
        }
        if self.question.trim().chars().count() < 10 {
            return invalid("Question must be at least 10 characters.");
        }
        if self.options.len() < 2 {
            return invalid("Please provide at least two options.");
        }
        if self.options.len() > 4 {
            return invalid("You can have a maximum of 4 options.");
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return invalid("Option cannot be empty.");
        }
        if !self.options.contains(&self.answer) {
            return invalid("Please select the correct answer.");
        }
        Ok(())
    }
}

pub struct QuestionBank {
    subjects: Subjects,
    /// Questions added locally, persisted separately from the built-in data.
    user: Subjects,
    user_file: Option<PathBuf>,
}

impl QuestionBank {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            subjects: serde_json::from_str(BUILTIN_QUESTIONS)?,
            user: Subjects::new(),
            user_file: None,
        })
    }

    /// Built-in questions merged with the user bank file, if one exists.
    pub fn load(user_file: Option<&Path>) -> Result<Self> {
        let mut bank = Self::builtin()?;

        if let Some(path) = user_file {
            bank.user_file = Some(path.to_path_buf());
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                let user: Subjects = serde_json::from_str(&contents)?;
                bank.merge(&user);
                bank.user = user;
                info!("Loaded user questions from {}", path.display());
            }
        }

        Ok(bank)
    }

    fn merge(&mut self, other: &Subjects) {
        for (subject, years) in other {
            let entry = self.subjects.entry(subject.clone()).or_default();
            for (year, questions) in years {
                entry
                    .entry(year.clone())
                    .or_default()
                    .extend(questions.iter().cloned());
            }
        }
    }

    pub fn subjects(&self) -> Vec<&str> {
        self.subjects.keys().map(String::as_str).collect()
    }

    /// Years for a subject, newest first.
    pub fn years(&self, subject: &str) -> Vec<&str> {
        let mut years: Vec<&str> = self
            .subjects
            .get(subject)
            .map(|y| y.keys().map(String::as_str).collect())
            .unwrap_or_default();
        years.sort_by_key(|y| std::cmp::Reverse(y.parse::<u32>().unwrap_or(0)));
        years
    }

    pub fn questions(&self, subject: &str, year: &str) -> &[Question] {
        self.subjects
            .get(subject)
            .and_then(|y| y.get(year))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Questions for a subject/year, or an error naming what is missing.
    pub fn require(&self, subject: &str, year: &str) -> Result<&[Question]> {
        let years = self
            .subjects
            .get(subject)
            .ok_or_else(|| PrepaceError::UnknownSubject(subject.to_string()))?;
        match years.get(year) {
            Some(questions) if !questions.is_empty() => Ok(questions),
            _ => Err(PrepaceError::UnknownYear {
                subject: subject.to_string(),
                year: year.to_string(),
            }),
        }
    }

    pub fn find(&self, subject: &str, year: &str, id: u32) -> Option<&Question> {
        self.questions(subject, year).iter().find(|q| q.id == id)
    }

    pub fn total_questions(&self, subject: &str) -> usize {
        self.subjects
            .get(subject)
            .map(|y| y.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.subjects.keys().map(|s| self.total_questions(s)).sum()
    }

    /// Validate and append a question, assigning the next id for its subject and year.
    pub fn add_question(&mut self, new: NewQuestion) -> Result<&Question> {
        new.validate()?;

        let next_id = self
            .questions(&new.subject, &new.year)
            .iter()
            .map(|q| q.id)
            .max()
            .unwrap_or(0)
            + 1;

        let question = Question {
            id: next_id,
            question: new.question,
            options: new.options,
            answer: new.answer,
        };
        debug!("Adding {} {} question {}", new.subject, new.year, next_id);

        self.user
            .entry(new.subject.clone())
            .or_default()
            .entry(new.year.clone())
            .or_default()
            .push(question.clone());

        let questions = self
            .subjects
            .entry(new.subject)
            .or_default()
            .entry(new.year)
            .or_default();
        questions.push(question);

        questions
            .last()
            .ok_or_else(|| PrepaceError::InvalidQuestion("question was not stored".to_string()))
    }

    /// Write locally added questions to the user bank file.
    pub fn save(&self) -> Result<()> {
        let path = self
            .user_file
            .as_ref()
            .ok_or_else(|| PrepaceError::Config("No question bank file configured".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.user)?)?;
        Ok(())
    }
}
