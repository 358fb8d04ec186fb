//! CLI command definitions.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod serve;
pub mod status;

#[derive(Parser)]
#[command(name = "lore", version, about = "Turn documents into a queryable knowledge graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
    /// Check Neo4j and LLM provider connectivity
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Status => status::execute().await,
        }
    }
}
