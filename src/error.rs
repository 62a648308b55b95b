use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepaceError {
    #[error("Translation service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Structured translation failed: {0}")]
    StructuredAttemptFailed(String),

    #[error("Fallback translation could not complete: {0}")]
    FallbackOrchestrationFailed(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("No questions for {subject} {year}")]
    UnknownYear { subject: String, year: String },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PrepaceError>;
