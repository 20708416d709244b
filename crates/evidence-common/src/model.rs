use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One attributable excerpt from a customer interview transcript.
///
/// Immutable once ingested. Scoring and selection annotate and rank quotes
/// for a given assumption; they never mutate them, and derived scores are
/// recomputed per request rather than persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    /// Stable quote identifier.
    pub id: String,
    /// The excerpt text.
    pub text: String,
    /// Speaker name, when the transcript attributes one.
    pub speaker: Option<String>,
    /// Speaker title/role text, e.g. "Managing Partner" or "Paralegal".
    pub role: Option<String>,
    /// Interview identifier the quote belongs to. Exactly one per quote.
    pub source: String,
    /// Upstream classification label (e.g. "ALIGNED", "NEW_INSIGHT").
    pub classification: Option<String>,
    /// Short company context captured alongside the interview, if any.
    pub company_snapshot: Option<String>,
    /// Soft-delete flag set by downstream review. Rejected quotes are
    /// excluded before scoring.
    pub rejected: bool,
    /// Relevance hint reported by the upstream extraction, if any. The
    /// scorer recomputes relevance and does not read this.
    pub relevance_score: Option<u8>,
}

impl Quote {
    /// Speaker name with the "Unknown" placeholder for unattributed quotes.
    pub fn speaker_name(&self) -> &str {
        self.speaker.as_deref().unwrap_or("Unknown")
    }

    /// Composite identity used for per-speaker caps and diversity counting.
    /// Two interviews can share a speaker name; the source disambiguates.
    pub fn speaker_key(&self) -> String {
        format!("{}|{}", self.speaker_name(), self.source)
    }
}

/// Heuristic classification of a quote's speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SpeakerRole {
    DecisionMaker,
    Influencer,
    EndUser,
    Unknown,
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpeakerRole::DecisionMaker => "decision-maker",
            SpeakerRole::Influencer => "influencer",
            SpeakerRole::EndUser => "end-user",
            SpeakerRole::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Per-(quote, assumption) score along three 0-100 axes plus the weighted
/// overall. Ephemeral; computed fresh for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteScore {
    pub relevance: u8,
    pub specificity: u8,
    pub authority: u8,
    pub overall: u8,
}

/// A quote paired with its score for one assumption. The unit the selector
/// operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredQuote {
    pub quote: Quote,
    pub score: QuoteScore,
}

/// Bucketed spread of quote text lengths within a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuoteVariety {
    High,
    Medium,
    Low,
}

/// Summary statistics over a final selection. Display/debugging only; never
/// drives selection itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiversityMetrics {
    /// Distinct speaker+source identities in the selection.
    pub unique_speakers: usize,
    /// Deduplicated classified roles, in order of first appearance.
    pub speaker_roles: Vec<SpeakerRole>,
    pub quote_variety: QuoteVariety,
    /// 0-100 composite of speaker spread, role spread, and text variety.
    pub diversity_score: u8,
}

/// Advisory result of checking a selection against its candidate pool.
/// Logged and returned for display; never blocks a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionAudit {
    /// Selected scores reached at least 80% of an unconstrained top-N pick.
    pub quality_maintained: bool,
    /// Diversity score reached the 70-point bar.
    pub diversity_achieved: bool,
    pub recommendations: Vec<String>,
}

/// One ICP assumption extracted from a sales deck, e.g.
/// `{attribute: "buyer_titles", statement: "Attorneys are the primary
/// decision-makers"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assumption {
    /// ICP attribute the statement belongs to (buyer_titles, company_size,
    /// pain_points, desired_outcomes, triggers, barriers,
    /// messaging_emphasis).
    pub attribute: String,
    /// The natural-language claim about the buyer being validated.
    pub statement: String,
}
