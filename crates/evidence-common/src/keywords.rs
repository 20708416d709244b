/// Versioned keyword tables driving speaker classification and scoring.
///
/// The vocabularies are data, not code: the built-in `buyer-icp-v1` set ships
/// with the binary, and a JSON file with the same shape can be loaded at
/// startup to swap or extend the tables without touching scoring logic.
/// Detail patterns are plain regex source strings here; they are compiled
/// (and validated) when the scorer is constructed.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// Speaker-role vocabularies, checked in priority order: decision-maker
/// first, then influencer, then end-user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleKeywordTable {
    pub decision_maker: Vec<String>,
    pub influencer: Vec<String>,
    pub end_user: Vec<String>,
}

/// Topic vocabulary used by relevance scoring. A topic counts only when it
/// appears in both the assumption and the quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicKeywordTable {
    pub topics: Vec<String>,
}

/// Concrete-detail patterns and action verbs used by specificity scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailLexicon {
    /// Regex source strings matched against the lowercased quote text.
    pub patterns: Vec<String>,
    /// Verbs awarded when present as substrings of the quote.
    pub action_verbs: Vec<String>,
}

/// The full table set the scorer is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTableSet {
    /// Table set identifier, e.g. "buyer-icp-v1". Logged at startup.
    pub version: String,
    pub roles: RoleKeywordTable,
    pub topics: TopicKeywordTable,
    pub detail: DetailLexicon,
}

impl KeywordTableSet {
    /// Built-in vocabulary tuned for legal-services ICP interviews.
    pub fn buyer_icp_v1() -> Self {
        Self {
            version: "buyer-icp-v1".to_string(),
            roles: RoleKeywordTable {
                decision_maker: strings(&[
                    "attorney", "lawyer", "partner", "owner", "founder", "ceo", "president",
                    "principal", "director", "chief",
                ]),
                influencer: strings(&[
                    "manager",
                    "administrator",
                    "admin",
                    "operations",
                    "supervisor",
                    "lead",
                    "consultant",
                    "advisor",
                ]),
                end_user: strings(&[
                    "paralegal",
                    "assistant",
                    "secretary",
                    "clerk",
                    "receptionist",
                    "staff",
                    "transcriber",
                    "court reporter",
                ]),
            },
            topics: TopicKeywordTable {
                topics: strings(&[
                    "buyer",
                    "pain",
                    "goal",
                    "timing",
                    "budget",
                    "process",
                    "decision",
                    "tool",
                    "workflow",
                    "team",
                    "price",
                    "deadline",
                    "transcript",
                    "client",
                ]),
            },
            detail: DetailLexicon {
                patterns: strings(&[
                    r"\d+%",
                    r"\$[0-9][0-9,]*",
                    r"\d+\s*(?:hours?|hrs|minutes?|days?|weeks?)",
                    r"\d+\s*(?:people|employees|attorneys|staff|clients|users)",
                    r"\b(?:specifically|exactly|precisely|in particular)\b",
                ]),
                action_verbs: strings(&[
                    "decide",
                    "implement",
                    "approve",
                    "purchase",
                    "evaluate",
                    "switch",
                    "adopt",
                    "sign",
                    "negotiate",
                    "buy",
                ]),
            },
        }
    }
}

/// Load a table set from a JSON file.
///
/// Validates that the version is set and no vocabulary list is empty, so a
/// half-written override file fails startup instead of silently zeroing
/// scores. Regex validity is checked later, when the scorer compiles the
/// patterns.
pub fn load_tables(path: &Path) -> Result<KeywordTableSet, CommonError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CommonError::KeywordTable(format!("failed to read {}: {e}", path.display()))
    })?;
    let tables: KeywordTableSet = serde_json::from_str(&content).map_err(|e| {
        CommonError::KeywordTable(format!("invalid table file {}: {e}", path.display()))
    })?;

    if tables.version.trim().is_empty() {
        return Err(CommonError::KeywordTable(format!(
            "{}: version must not be empty",
            path.display()
        )));
    }
    for (name, list) in [
        ("roles.decision_maker", &tables.roles.decision_maker),
        ("roles.influencer", &tables.roles.influencer),
        ("roles.end_user", &tables.roles.end_user),
        ("topics.topics", &tables.topics.topics),
        ("detail.patterns", &tables.detail.patterns),
        ("detail.action_verbs", &tables.detail.action_verbs),
    ] {
        if list.is_empty() {
            return Err(CommonError::KeywordTable(format!(
                "{}: {name} must not be empty",
                path.display()
            )));
        }
    }

    Ok(tables)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
