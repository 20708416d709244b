/// Error types shared across BuyerMap evidence crates.
///
/// These errors represent failures in infrastructure components (LLM host,
/// keyword table files) that are common to the evidence servers.
/// Application-specific errors should be defined in each server crate and
/// wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("llm error: {0}")]
    Llm(#[from] crate::llm::LlmClientError),

    #[error("keyword table error: {0}")]
    KeywordTable(String),
}
