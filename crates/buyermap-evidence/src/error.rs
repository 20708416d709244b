use evidence_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid scoring pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("unknown selection policy: {0}")]
    UnknownPolicy(String),
}
