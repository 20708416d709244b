mod audit;
mod config;
mod error;
mod extract;
mod metrics;
mod scoring;
mod selection;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use evidence_common::keywords::{self, KeywordTableSet};
use evidence_common::llm::{LlmClient, LlmClientConfig};

use config::Config;
use extract::ExtractionService;
use scoring::QuoteScorer;
use server::EvidenceServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting buyermap-evidence MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        keyword_tables = ?config.keyword_tables_path,
        extract_model = config.extract_model.as_deref().unwrap_or("<disabled>"),
        max_quotes = config.max_quotes,
        policy = config.default_policy.as_str(),
        "configuration loaded"
    );

    // 2. Load keyword tables (built-in unless overridden)
    let tables = match &config.keyword_tables_path {
        Some(path) => keywords::load_tables(path)?,
        None => KeywordTableSet::buyer_icp_v1(),
    };
    info!(version = %tables.version, "keyword tables ready");

    // 3. Build the scorer (compiles and validates the detail patterns)
    let scorer = QuoteScorer::new(tables)?;

    // 4. Extraction service (optional — graceful degradation without a model)
    let extraction = match &config.extract_model {
        Some(model) => {
            let llm_config = LlmClientConfig::from_env();
            info!(
                base_url = %llm_config.base_url,
                model = %model,
                timeout_ms = llm_config.default_timeout.as_millis(),
                max_retries = llm_config.max_retries,
                "extraction enabled"
            );
            let llm = Arc::new(LlmClient::new(llm_config)?);
            Some(Arc::new(ExtractionService::new(llm, model.clone())))
        }
        None => {
            info!("extraction disabled (EXTRACT_MODEL not set)");
            None
        }
    };

    // 5. Build MCP server and serve on stdio
    let server = EvidenceServer::new(scorer, extraction, config);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
