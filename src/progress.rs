//! Per-question completion tracking persisted as a small JSON file.

use crate::bank::QuestionBank;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key for one question: `{subject}-{year}-{id}`.
pub fn question_key(subject: &str, year: &str, id: u32) -> String {
    format!("{}-{}-{}", subject, year, id)
}

/// Completion progress for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectProgress {
    pub subject: String,
    pub completed: usize,
    pub total: usize,
}

impl SubjectProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}

pub struct ProgressStore {
    path: PathBuf,
    completed: BTreeMap<String, bool>,
}

impl ProgressStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let completed = Self::read(&path).unwrap_or_else(|e| {
            warn!("Failed to load progress from {}: {}", path.display(), e);
            BTreeMap::new()
        });
        debug!("Loaded {} progress entries", completed.len());

        Self { path, completed }
    }

    fn read(path: &Path) -> crate::Result<BTreeMap<String, bool>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&self.completed)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mark a question completed and persist. A failed write is logged and
    /// the in-memory state is kept.
    pub fn mark_completed(&mut self, subject: &str, year: &str, id: u32) {
        self.completed.insert(question_key(subject, year, id), true);
        if let Err(e) = self.write() {
            warn!("Failed to save progress to {}: {}", self.path.display(), e);
        }
    }

    pub fn is_completed(&self, subject: &str, year: &str, id: u32) -> bool {
        self.completed
            .get(&question_key(subject, year, id))
            .copied()
            .unwrap_or(false)
    }

    /// Number of completed questions in `subject` across all years.
    pub fn subject_progress(&self, bank: &QuestionBank, subject: &str) -> usize {
        bank.years(subject)
            .into_iter()
            .flat_map(|year| {
                bank.questions(subject, year)
                    .iter()
                    .map(move |q| (year, q.id))
            })
            .filter(|(year, id)| self.is_completed(subject, year, *id))
            .count()
    }

    pub fn summary(&self, bank: &QuestionBank) -> Vec<SubjectProgress> {
        bank.subjects()
            .into_iter()
            .map(|subject| SubjectProgress {
                subject: subject.to_string(),
                completed: self.subject_progress(bank, subject),
                total: bank.total_questions(subject),
            })
            .collect()
    }
}
