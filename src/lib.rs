pub mod bank;
pub mod config;
pub mod error;
pub mod gemini;
pub mod interactive;
pub mod language;
pub mod progress;
pub mod quiz;
pub mod translate;
pub mod tutor;

pub use bank::{NewQuestion, Question, QuestionBank};
pub use config::Config;
pub use error::{PrepaceError, Result};
pub use progress::ProgressStore;
pub use translate::{
    Resolution, TranslationRequest, TranslationResolver, TranslationResult, UNAVAILABLE_MESSAGE,
};
