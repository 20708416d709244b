use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Assumption, DiversityMetrics, Quote, QuoteScore, SelectionAudit, SpeakerRole};
use crate::normalize::RawQuote;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScoreQuotesParams {
    /// The ICP assumption being validated, e.g. "Attorneys are the primary
    /// decision-makers".
    pub assumption: String,
    /// Candidate quotes in any accepted external shape.
    pub quotes: Vec<RawQuote>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectEvidenceParams {
    /// The ICP assumption being validated.
    pub assumption: String,
    /// Candidate quotes in any accepted external shape.
    pub quotes: Vec<RawQuote>,
    /// Maximum quotes to select (default from server config, normally 5).
    pub max_quotes: Option<u32>,
    /// Selection policy: "one-per-speaker" (default) or "bounded-per-speaker".
    pub policy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiversityMetricsParams {
    /// Quotes to summarize, in any accepted external shape.
    pub quotes: Vec<RawQuote>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractAssumptionsParams {
    /// Plain text of the sales deck to extract ICP assumptions from.
    pub deck_text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractQuotesParams {
    /// Plain text of the interview transcript to extract quotes from.
    pub transcript_text: String,
    /// Interview identifier to stamp on every extracted quote.
    pub source: String,
}

/// One scored quote as returned over MCP. The summary is the quote text,
/// truncated for display.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScoredQuoteView {
    pub id: String,
    pub speaker: String,
    pub speaker_role: SpeakerRole,
    pub source: String,
    pub summary: String,
    pub score: QuoteScore,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScoreQuotesResponse {
    pub assumption: String,
    /// Keyword table set the scores were computed with.
    pub table_version: String,
    /// Scored quotes, ranked by overall score descending.
    pub results: Vec<ScoredQuoteView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectEvidenceResponse {
    pub assumption: String,
    /// The policy that produced the selection.
    pub policy: String,
    pub selection: Vec<ScoredQuoteView>,
    pub metrics: DiversityMetrics,
    pub audit: SelectionAudit,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractAssumptionsResponse {
    /// Model that produced the extraction.
    pub model: String,
    pub assumptions: Vec<Assumption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractQuotesResponse {
    pub model: String,
    pub source: String,
    /// Extracted quotes, already normalized to the canonical shape.
    pub quotes: Vec<Quote>,
}
