/// MCP server for BuyerMap evidence validation.
///
/// Exposes five tools:
/// - `score_quotes`: Score a quote pool against an ICP assumption
/// - `select_evidence`: Pick a speaker-diverse evidence set with metrics
/// - `diversity_metrics`: Summarize a quote set's diversity as-is
/// - `extract_assumptions`: Pull ICP assumptions from sales deck text
/// - `extract_quotes`: Pull attributed quotes from a transcript
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use evidence_common::api::{
    DiversityMetricsParams, ExtractAssumptionsParams, ExtractAssumptionsResponse,
    ExtractQuotesParams, ExtractQuotesResponse, ScoreQuotesParams, ScoreQuotesResponse,
    ScoredQuoteView, SelectEvidenceParams, SelectEvidenceResponse,
};
use evidence_common::model::{DiversityMetrics, Quote, ScoredQuote};
use evidence_common::normalize::{normalize_quotes, RawQuote};

use crate::audit;
use crate::config::Config;
use crate::extract::ExtractionService;
use crate::metrics;
use crate::scoring::{classify_speaker_role, QuoteScorer};
use crate::selection::{self, SelectionPolicy};

const MAX_SUMMARY_LEN: usize = 300;

/// Hard ceiling on requested selection sizes, mirroring the limit caps the
/// other tool surfaces apply.
const MAX_QUOTES_CEILING: usize = 50;

#[derive(Clone)]
pub struct EvidenceServer {
    scorer: Arc<QuoteScorer>,
    extraction: Option<Arc<ExtractionService>>,
    config: Config,
    tool_router: ToolRouter<EvidenceServer>,
}

impl EvidenceServer {
    pub fn new(
        scorer: QuoteScorer,
        extraction: Option<Arc<ExtractionService>>,
        config: Config,
    ) -> Self {
        Self {
            scorer: Arc::new(scorer),
            extraction,
            config,
            tool_router: Self::tool_router(),
        }
    }

    /// Normalize raw payloads and drop soft-deleted quotes before scoring.
    fn prepare_pool(&self, raw: Vec<RawQuote>) -> Vec<Quote> {
        normalize_quotes(raw)
            .into_iter()
            .filter(|q| !q.rejected)
            .collect()
    }

    fn to_view(&self, scored: &ScoredQuote) -> ScoredQuoteView {
        let text = &scored.quote.text;
        let summary = if text.chars().count() > MAX_SUMMARY_LEN {
            format!("{}...", text.chars().take(MAX_SUMMARY_LEN).collect::<String>())
        } else {
            text.clone()
        };

        ScoredQuoteView {
            id: scored.quote.id.clone(),
            speaker: scored.quote.speaker_name().to_string(),
            speaker_role: classify_speaker_role(&scored.quote, self.scorer.roles()),
            source: scored.quote.source.clone(),
            summary,
            score: scored.score,
        }
    }

    fn resolve_policy(&self, requested: Option<&str>) -> Result<SelectionPolicy, String> {
        match requested {
            Some(value) => SelectionPolicy::parse(value.trim()).map_err(|e| e.to_string()),
            None => Ok(self.config.default_policy),
        }
    }
}

#[tool_router]
impl EvidenceServer {
    #[tool(description = "Score interview quotes against an ICP assumption. Returns per-quote relevance/specificity/authority scores, ranked by overall score.")]
    async fn score_quotes(
        &self,
        Parameters(params): Parameters<ScoreQuotesParams>,
    ) -> Result<Json<ScoreQuotesResponse>, String> {
        let assumption = params.assumption.trim().to_string();
        if assumption.is_empty() {
            return Err("assumption must not be empty".to_string());
        }

        let pool = self.prepare_pool(params.quotes);
        let mut scored = self.scorer.score_all(&pool, &assumption);
        scored.sort_by(|a, b| b.score.overall.cmp(&a.score.overall));

        let results: Vec<ScoredQuoteView> = scored.iter().map(|s| self.to_view(s)).collect();

        Ok(Json(ScoreQuotesResponse {
            assumption,
            table_version: self.scorer.table_version().to_string(),
            results,
        }))
    }

    #[tool(description = "Select a speaker-diverse evidence set for an ICP assumption. Returns the selection plus diversity metrics and an advisory audit.")]
    async fn select_evidence(
        &self,
        Parameters(params): Parameters<SelectEvidenceParams>,
    ) -> Result<Json<SelectEvidenceResponse>, String> {
        let assumption = params.assumption.trim().to_string();
        if assumption.is_empty() {
            return Err("assumption must not be empty".to_string());
        }

        let max_quotes = params
            .max_quotes
            .map(|n| n as usize)
            .unwrap_or(self.config.max_quotes)
            .min(MAX_QUOTES_CEILING);
        let policy = self.resolve_policy(params.policy.as_deref())?;

        let pool = self.prepare_pool(params.quotes);
        let scored = self.scorer.score_all(&pool, &assumption);
        let selection = selection::select_evidence(&scored, max_quotes, policy);
        let selection_metrics = metrics::diversity_metrics(&selection, self.scorer.roles());
        let selection_audit = audit::audit_selection(&selection, &scored, &selection_metrics);

        if !selection_audit.recommendations.is_empty() {
            info!(
                selected = selection.len(),
                pool = scored.len(),
                recommendations = selection_audit.recommendations.len(),
                "selection audit produced recommendations"
            );
        }

        Ok(Json(SelectEvidenceResponse {
            assumption,
            policy: policy.as_str().to_string(),
            selection: selection.iter().map(|s| self.to_view(s)).collect(),
            metrics: selection_metrics,
            audit: selection_audit,
        }))
    }

    #[tool(description = "Compute diversity metrics (unique speakers, roles, quote variety) over a quote set without selecting from it.")]
    async fn diversity_metrics(
        &self,
        Parameters(params): Parameters<DiversityMetricsParams>,
    ) -> Result<Json<DiversityMetrics>, String> {
        let pool = self.prepare_pool(params.quotes);
        // Metrics read quotes and roles only; scores are irrelevant here, so
        // score against an empty assumption.
        let scored = self.scorer.score_all(&pool, "");
        Ok(Json(metrics::diversity_metrics(
            &scored,
            self.scorer.roles(),
        )))
    }

    #[tool(description = "Extract ICP assumptions from sales deck text using the configured model. Requires EXTRACT_MODEL to be set.")]
    async fn extract_assumptions(
        &self,
        Parameters(params): Parameters<ExtractAssumptionsParams>,
    ) -> Result<Json<ExtractAssumptionsResponse>, String> {
        let Some(extraction) = &self.extraction else {
            return Err("extraction disabled: set EXTRACT_MODEL to enable".to_string());
        };

        let deck_text = params.deck_text.trim().to_string();
        if deck_text.is_empty() {
            return Err("deck_text must not be empty".to_string());
        }

        let assumptions = extraction
            .extract_assumptions(&deck_text)
            .await
            .map_err(|e| format!("extraction failed: {e}"))?;

        Ok(Json(ExtractAssumptionsResponse {
            model: extraction.model().to_string(),
            assumptions,
        }))
    }

    #[tool(description = "Extract attributed quotes from interview transcript text using the configured model. Requires EXTRACT_MODEL to be set.")]
    async fn extract_quotes(
        &self,
        Parameters(params): Parameters<ExtractQuotesParams>,
    ) -> Result<Json<ExtractQuotesResponse>, String> {
        let Some(extraction) = &self.extraction else {
            return Err("extraction disabled: set EXTRACT_MODEL to enable".to_string());
        };

        let transcript_text = params.transcript_text.trim().to_string();
        if transcript_text.is_empty() {
            return Err("transcript_text must not be empty".to_string());
        }
        let source = params.source.trim().to_string();
        if source.is_empty() {
            return Err("source must not be empty".to_string());
        }

        let quotes = extraction
            .extract_quotes(&transcript_text, &source)
            .await
            .map_err(|e| format!("extraction failed: {e}"))?;

        Ok(Json(ExtractQuotesResponse {
            model: extraction.model().to_string(),
            source,
            quotes,
        }))
    }
}

#[tool_handler]
impl ServerHandler for EvidenceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "buyermap-evidence".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "BuyerMap evidence MCP server. Validates ICP assumptions against customer \
                 interview quotes: score_quotes ranks a quote pool against an assumption, \
                 select_evidence picks a speaker-diverse evidence set with diversity metrics \
                 and an advisory audit, diversity_metrics summarizes any quote set, and \
                 extract_assumptions/extract_quotes pull structured data from deck and \
                 transcript text via the configured model."
                    .to_string(),
            ),
        }
    }
}
