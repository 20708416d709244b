/// Deck and transcript extraction via the configured LLM.
///
/// The model is instructed to return strict JSON; replies are fence-stripped
/// and parsed with serde, and anything that is not the requested JSON shape
/// is an extraction error. Extracted quotes run through the same
/// normalization as caller-supplied ones.
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use evidence_common::error::CommonError;
use evidence_common::llm::LlmClient;
use evidence_common::model::{Assumption, Quote};
use evidence_common::normalize::{normalize_quotes, RawQuote};

use crate::error::AppError;

/// Extraction wants stable, parseable output, not creativity.
const EXTRACTION_TEMPERATURE: f32 = 0.1;

pub struct ExtractionService {
    llm: Arc<LlmClient>,
    model: String,
}

impl ExtractionService {
    pub fn new(llm: Arc<LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extract ICP assumptions from sales deck text.
    pub async fn extract_assumptions(&self, deck_text: &str) -> Result<Vec<Assumption>, AppError> {
        let prompt = assumption_prompt(deck_text);
        let reply = self
            .llm
            .complete(&self.model, &prompt, Some(EXTRACTION_TEMPERATURE))
            .await
            .map_err(CommonError::from)?;

        let records: Vec<ExtractedAssumption> = parse_json_payload(&reply)?;
        let assumptions = assumptions_from_extracted(records);
        if assumptions.is_empty() {
            return Err(AppError::Extraction(
                "model returned no usable assumptions".to_string(),
            ));
        }

        info!(
            model = %self.model,
            count = assumptions.len(),
            "extracted assumptions from deck"
        );
        Ok(assumptions)
    }

    /// Extract attributed quotes from interview transcript text; every quote
    /// is stamped with the given interview source.
    pub async fn extract_quotes(
        &self,
        transcript_text: &str,
        source: &str,
    ) -> Result<Vec<Quote>, AppError> {
        let prompt = quote_prompt(transcript_text);
        let reply = self
            .llm
            .complete(&self.model, &prompt, Some(EXTRACTION_TEMPERATURE))
            .await
            .map_err(CommonError::from)?;

        let records: Vec<ExtractedQuote> = parse_json_payload(&reply)?;
        let quotes = quotes_from_extracted(records, source);

        info!(
            model = %self.model,
            source,
            count = quotes.len(),
            "extracted quotes from transcript"
        );
        Ok(quotes)
    }
}

fn assumption_prompt(deck_text: &str) -> String {
    format!(
        "You analyze sales decks for ideal-customer-profile assumptions. Extract every claim \
the deck makes about who the buyer is. Return ONLY a JSON array, no prose, where each element \
is {{\"attribute\": <one of buyer_titles|company_size|pain_points|desired_outcomes|triggers|\
barriers|messaging_emphasis>, \"statement\": <the claim in one sentence>}}.\n\nDECK:\n{deck_text}"
    )
}

fn quote_prompt(transcript_text: &str) -> String {
    format!(
        "You extract attributable quotes from customer interview transcripts. Pick verbatim \
excerpts that reveal who buys, why, and how decisions are made. Return ONLY a JSON array, no \
prose, where each element is {{\"text\": <verbatim excerpt>, \"speaker\": <name or null>, \
\"role\": <title or null>, \"classification\": <RELEVANT|ALIGNED|MISALIGNED|NEW_INSIGHT or \
null>}}.\n\nTRANSCRIPT:\n{transcript_text}"
    )
}

/// Parse a model reply as JSON, tolerating a markdown code fence around it.
fn parse_json_payload<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T, AppError> {
    let body = strip_code_fences(reply);
    serde_json::from_str(body)
        .map_err(|e| AppError::Extraction(format!("model returned invalid JSON: {e}")))
}

fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let Some((_, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Debug, Deserialize)]
struct ExtractedAssumption {
    #[serde(default)]
    attribute: String,
    #[serde(default)]
    statement: String,
}

#[derive(Debug, Deserialize)]
struct ExtractedQuote {
    #[serde(default)]
    text: String,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    classification: Option<String>,
}

fn assumptions_from_extracted(records: Vec<ExtractedAssumption>) -> Vec<Assumption> {
    records
        .into_iter()
        .filter_map(|r| {
            let attribute = r.attribute.trim().to_string();
            let statement = r.statement.trim().to_string();
            if attribute.is_empty() || statement.is_empty() {
                return None;
            }
            Some(Assumption {
                attribute,
                statement,
            })
        })
        .collect()
}

fn quotes_from_extracted(records: Vec<ExtractedQuote>, source: &str) -> Vec<Quote> {
    let raw: Vec<RawQuote> = records
        .into_iter()
        .map(|r| RawQuote {
            text: Some(r.text),
            speaker: r.speaker,
            role: r.role,
            source: Some(source.to_string()),
            classification: r.classification,
            ..RawQuote::default()
        })
        .collect();
    normalize_quotes(raw)
}
