/// Quote ingestion and normalization.
///
/// Upstream extraction payloads arrive in several shapes (`quote` vs `text`,
/// `name` vs `speaker`, `interview` vs `source`, camelCase leftovers).
/// `RawQuote` accepts all of them via serde aliases, and `normalize_quotes`
/// maps each record into exactly one canonical [`Quote`] so that scoring and
/// selection never deal with optional-field ambiguity.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Quote;

/// Fallback interview identifier for records that arrive without one.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A quote as supplied by a caller or an upstream extraction, before
/// normalization. Every field is optional; aliases cover the shapes the
/// legacy payloads used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RawQuote {
    pub id: Option<String>,
    /// Excerpt text. `quote` and `excerpt` are accepted as aliases.
    #[serde(alias = "quote", alias = "excerpt")]
    pub text: Option<String>,
    #[serde(alias = "name")]
    pub speaker: Option<String>,
    #[serde(alias = "title")]
    pub role: Option<String>,
    /// Interview identifier. `interview`, `interview_id` and `interviewId`
    /// are accepted as aliases.
    #[serde(alias = "interview", alias = "interview_id", alias = "interviewId")]
    pub source: Option<String>,
    pub classification: Option<String>,
    #[serde(alias = "companySnapshot")]
    pub company_snapshot: Option<String>,
    pub rejected: bool,
    #[serde(alias = "relevanceScore")]
    pub relevance_score: Option<u8>,
}

/// Map raw records into canonical quotes.
///
/// Records with empty text are dropped with a warning rather than failing
/// the whole batch. Missing ids are synthesized positionally (`q1`, `q2`, …)
/// so repeated calls over the same payload stay deterministic. The
/// `rejected` flag is preserved; filtering rejected quotes is the caller's
/// decision.
pub fn normalize_quotes(raw: Vec<RawQuote>) -> Vec<Quote> {
    let mut quotes = Vec::with_capacity(raw.len());

    for (index, record) in raw.into_iter().enumerate() {
        let text = record
            .text
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if text.is_empty() {
            warn!(index, "dropping quote with empty text");
            continue;
        }

        let id = match record.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("q{}", index + 1),
        };

        quotes.push(Quote {
            id,
            text,
            speaker: non_empty(record.speaker),
            role: non_empty(record.role),
            source: non_empty(record.source).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            classification: non_empty(record.classification),
            company_snapshot: non_empty(record.company_snapshot),
            rejected: record.rejected,
            relevance_score: record.relevance_score,
        });
    }

    quotes
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_fields() {
        let json = r#"[
            {"quote": "We bill 40 hours a week.", "name": "Betty", "title": "Paralegal", "interview": "int-7"},
            {"text": "I approve the budget.", "speaker": "John", "role": "Partner", "source": "int-8", "companySnapshot": "12-attorney firm"}
        ]"#;
        let raw: Vec<RawQuote> = serde_json::from_str(json).unwrap();
        let quotes = normalize_quotes(raw);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, "We bill 40 hours a week.");
        assert_eq!(quotes[0].speaker.as_deref(), Some("Betty"));
        assert_eq!(quotes[0].role.as_deref(), Some("Paralegal"));
        assert_eq!(quotes[0].source, "int-7");
        assert_eq!(quotes[1].company_snapshot.as_deref(), Some("12-attorney firm"));
    }

    #[test]
    fn empty_text_records_are_dropped() {
        let raw = vec![
            RawQuote {
                text: Some("   ".to_string()),
                ..RawQuote::default()
            },
            RawQuote {
                text: Some("Real content.".to_string()),
                ..RawQuote::default()
            },
            RawQuote::default(),
        ];
        let quotes = normalize_quotes(raw);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Real content.");
    }

    #[test]
    fn missing_ids_are_synthesized_positionally() {
        let raw = vec![
            RawQuote {
                text: Some("first".to_string()),
                ..RawQuote::default()
            },
            RawQuote {
                id: Some("keep-me".to_string()),
                text: Some("second".to_string()),
                ..RawQuote::default()
            },
        ];
        let quotes = normalize_quotes(raw);
        assert_eq!(quotes[0].id, "q1");
        assert_eq!(quotes[1].id, "keep-me");
    }

    #[test]
    fn blank_optionals_become_none_and_source_defaults() {
        let raw = vec![RawQuote {
            text: Some("content".to_string()),
            speaker: Some("  ".to_string()),
            role: Some(String::new()),
            ..RawQuote::default()
        }];
        let quotes = normalize_quotes(raw);
        assert_eq!(quotes[0].speaker, None);
        assert_eq!(quotes[0].role, None);
        assert_eq!(quotes[0].source, UNKNOWN_SOURCE);
    }
}
