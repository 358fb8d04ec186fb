//! Web server command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use lore_core::Settings;
use lore_graph::{GraphClient, GraphQueryEngine, Neo4jStore};
use lore_llm::{GraphPipeline, HttpDocumentSource, OpenAiClient, PipelineConfig};
use lore_web::state::AppState;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3040")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let settings = Settings::from_env().context("Failed to load configuration")?;

    let client = GraphClient::connect(&settings.neo4j)
        .await
        .context("Failed to connect to Neo4j")?;

    let llm = Arc::new(
        OpenAiClient::new(settings.llm.clone()).context("Failed to build LLM client")?,
    );
    let source = Arc::new(HttpDocumentSource::new().context("Failed to build HTTP client")?);
    let pipeline = Arc::new(GraphPipeline::new(
        source,
        llm.clone(),
        llm.clone(),
        PipelineConfig {
            stage_timeout: settings.llm.stage_timeout,
            ..PipelineConfig::default()
        },
    ));
    let store = Arc::new(Neo4jStore::new(client.clone()));
    let responder = Arc::new(GraphQueryEngine::new(client, llm));

    let state = AppState::new(pipeline, store, responder);

    println!();
    println!("  {} {}", "Lore".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}    http://{}:{}", "API".green(), args.host, args.port);
    println!(
        "  {}  {} @ {}",
        "Neo4j".green(),
        settings.neo4j.user,
        settings.neo4j.uri
    );
    println!(
        "  {} {} / {}",
        "Models".green(),
        settings.llm.summary_model,
        settings.llm.script_model
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    lore_web::run_server(state, &args.host, args.port).await
}
