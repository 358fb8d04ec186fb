//! Neo4j connection client.

use lore_core::config::Neo4jSettings;
use lore_core::{LoreError, LoreResult};
use neo4rs::{ConfigBuilder, Graph, Query};

/// Client for Neo4j operations, shared across requests.
///
/// neo4rs uses a lazy pool: `Graph::connect` only builds the pool and
/// does not open a bolt connection. `connect` runs a `RETURN 1` ping so
/// startup fails fast when Neo4j is unreachable instead of deferring
/// the failure to the first request.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect and verify the database is reachable.
    pub async fn connect(settings: &Neo4jSettings) -> LoreResult<Self> {
        let config = ConfigBuilder::default()
            .uri(&settings.uri)
            .user(&settings.user)
            .password(&settings.password)
            .db("neo4j")
            .max_connections(8)
            .fetch_size(50)
            .build()
            .map_err(|e| LoreError::graph(format!("invalid Neo4j config: {e}")))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| LoreError::graph(format!("failed to create connection pool: {e}")))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| LoreError::graph(format!("Neo4j is not responding: {e}")))?;

        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> LoreResult<()> {
        self.graph
            .run(query)
            .await
            .map_err(|e| LoreError::graph(format!("query execution failed: {e}")))?;
        Ok(())
    }

    /// Execute a Cypher query and collect the result rows.
    pub async fn query(&self, query: Query) -> LoreResult<Vec<neo4rs::Row>> {
        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| LoreError::graph(format!("query failed: {e}")))?;

        let mut rows = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and return one scalar column from each row.
    pub async fn query_column<T: serde::de::DeserializeOwned>(
        &self,
        query: Query,
        field: &str,
    ) -> LoreResult<Vec<T>> {
        let rows = self.query(query).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value: T = row
                .get(field)
                .map_err(|e| LoreError::graph(format!("missing field '{field}': {e:?}")))?;
            values.push(value);
        }
        Ok(values)
    }

    /// Node and relationship counts.
    pub async fn counts(&self) -> LoreResult<GraphCounts> {
        let nodes: i64 = self
            .query_column(
                Query::new("MATCH (n) RETURN count(n) as count".to_string()),
                "count",
            )
            .await?
            .into_iter()
            .next()
            .unwrap_or(0);
        let relationships: i64 = self
            .query_column(
                Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string()),
                "count",
            )
            .await?
            .into_iter()
            .next()
            .unwrap_or(0);

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }

    /// The underlying neo4rs Graph, for transaction control.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
