//! Connectivity check command.

use anyhow::{Context, Result};
use colored::Colorize;
use lore_core::Settings;
use lore_graph::GraphClient;

pub async fn execute() -> Result<()> {
    let settings = Settings::from_env().context("Failed to load configuration")?;

    println!();
    println!("  {}", "Lore Status".cyan().bold());
    println!();

    match GraphClient::connect(&settings.neo4j).await {
        Ok(client) => {
            let counts = client.counts().await?;
            println!(
                "  {}  {} ({} nodes, {} relationships)",
                "Neo4j".green(),
                settings.neo4j.uri,
                counts.nodes,
                counts.relationships
            );
        }
        Err(e) => {
            println!("  {}  {}", "Neo4j".red(), e);
        }
    }

    match check_llm(&settings).await {
        Ok(()) => println!(
            "  {}    {} ({} / {})",
            "LLM".green(),
            settings.llm.base_url,
            settings.llm.summary_model,
            settings.llm.script_model
        ),
        Err(e) => println!("  {}    {}", "LLM".red(), e),
    }

    println!();
    Ok(())
}

async fn check_llm(settings: &Settings) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let response = client
        .get(format!(
            "{}/models",
            settings.llm.base_url.trim_end_matches('/')
        ))
        .bearer_auth(&settings.llm.api_key)
        .send()
        .await
        .context("provider unreachable")?;

    if !response.status().is_success() {
        anyhow::bail!("provider returned {}", response.status());
    }
    Ok(())
}
