//! Graph store adapter: materialize scripts into Neo4j.
//!
//! `replace` runs the delete-all and every script statement inside one
//! transaction, so a failing script rolls back instead of leaving the
//! store empty. `apply` runs a script transactionally without clearing.

use async_trait::async_trait;
use lore_core::{GraphScript, LoreError, LoreResult};
use neo4rs::Query;
use tracing::info;

use crate::client::{GraphClient, GraphCounts};

/// Cypher statement that removes every node and relationship.
pub const CLEAR_GRAPH: &str = "MATCH (n) DETACH DELETE n";

/// Write access to the knowledge graph store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Atomically clear the store and execute `script`.
    async fn replace(&self, script: &GraphScript) -> LoreResult<()>;

    /// Execute `script` without clearing.
    async fn apply(&self, script: &GraphScript) -> LoreResult<()>;

    /// Current node and relationship counts.
    async fn counts(&self) -> LoreResult<GraphCounts>;
}

/// The statements `replace` executes, in order: delete-all first, then
/// every script statement.
pub fn replace_statements(script: &GraphScript) -> Vec<String> {
    std::iter::once(CLEAR_GRAPH.to_string())
        .chain(script.statements().iter().cloned())
        .collect()
}

/// Neo4j-backed graph store.
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    async fn run_transactional(&self, statements: Vec<String>) -> LoreResult<()> {
        let queries: Vec<Query> = statements.into_iter().map(Query::new).collect();

        let mut txn = self
            .client
            .inner()
            .start_txn()
            .await
            .map_err(|e| LoreError::graph(format!("failed to open transaction: {e}")))?;

        if let Err(e) = txn.run_queries(queries).await {
            let _ = txn.rollback().await;
            return Err(LoreError::graph(format!("script execution failed: {e}")));
        }

        txn.commit()
            .await
            .map_err(|e| LoreError::graph(format!("commit failed: {e}")))
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn replace(&self, script: &GraphScript) -> LoreResult<()> {
        let statements = replace_statements(script);
        let count = statements.len() - 1;
        self.run_transactional(statements).await?;
        info!(statements = count, "Replaced graph");
        Ok(())
    }

    async fn apply(&self, script: &GraphScript) -> LoreResult<()> {
        self.run_transactional(script.statements().to_vec()).await?;
        info!(statements = script.statements().len(), "Applied update to graph");
        Ok(())
    }

    async fn counts(&self) -> LoreResult<GraphCounts> {
        self.client.counts().await
    }
}
