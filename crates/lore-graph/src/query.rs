//! Natural-language querying of the knowledge graph.
//!
//! Translate the question into a read-only Cypher query with the
//! script-tier model, execute it, then phrase the result rows as a
//! natural-language answer with the summary-tier model.

use std::sync::Arc;

use async_trait::async_trait;
use lore_core::script::{is_read_only, split_statements, strip_code_fences};
use lore_core::{LoreError, LoreResult};
use lore_llm::{ChatClient, ModelTier};
use neo4rs::Query;
use tracing::debug;

use crate::client::GraphClient;

const TRANSLATE_SYSTEM: &str = "You translate natural-language questions about a Neo4j \
knowledge graph into a single read-only Cypher query. Return ONLY the Cypher query, \
nothing else. Never generate a query that creates, merges, sets, removes, or deletes \
anything.";

const ANSWER_SYSTEM: &str = "You answer questions about a knowledge graph. Use only the \
provided query results; if they are empty, say the graph holds no answer. Respond with \
the answer text only.";

/// Answers natural-language questions about the graph.
#[async_trait]
pub trait QueryResponder: Send + Sync {
    async fn answer(&self, question: &str) -> LoreResult<String>;
}

/// LLM-backed query engine bound to the graph store.
pub struct GraphQueryEngine {
    client: GraphClient,
    chat: Arc<dyn ChatClient>,
}

impl GraphQueryEngine {
    pub fn new(client: GraphClient, chat: Arc<dyn ChatClient>) -> Self {
        Self { client, chat }
    }

    /// Labels and relationship types currently in the store, as prompt
    /// context for query translation.
    async fn schema_summary(&self) -> LoreResult<String> {
        let labels: Vec<String> = self
            .client
            .query_column(
                Query::new("CALL db.labels() YIELD label RETURN label".to_string()),
                "label",
            )
            .await?;
        let rel_types: Vec<String> = self
            .client
            .query_column(
                Query::new(
                    "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType"
                        .to_string(),
                ),
                "relationshipType",
            )
            .await?;

        Ok(format!(
            "Node labels: {}\nRelationship types: {}",
            join_or_none(&labels),
            join_or_none(&rel_types)
        ))
    }

    async fn execute(&self, cypher: &str) -> LoreResult<String> {
        let rows = self.client.query(Query::new(cypher.to_string())).await?;

        let values: Vec<serde_json::Value> = rows
            .iter()
            .filter_map(|row| row.to::<serde_json::Value>().ok())
            .collect();

        if values.is_empty() {
            Ok("(no results)".to_string())
        } else {
            Ok(serde_json::to_string_pretty(&values)?)
        }
    }
}

#[async_trait]
impl QueryResponder for GraphQueryEngine {
    async fn answer(&self, question: &str) -> LoreResult<String> {
        let schema = self.schema_summary().await?;

        let raw = self
            .chat
            .complete(
                ModelTier::Script,
                TRANSLATE_SYSTEM,
                &translate_prompt(&schema, question),
            )
            .await?;
        let cypher = extract_read_query(&raw)?;
        debug!(%cypher, "Translated question");

        let results = self.execute(&cypher).await?;

        self.chat
            .complete(
                ModelTier::Summary,
                ANSWER_SYSTEM,
                &answer_prompt(question, &results),
            )
            .await
    }
}

fn translate_prompt(schema: &str, question: &str) -> String {
    format!("Graph schema:\n{schema}\n\nQuestion: {question}\n\nCypher query:")
}

fn answer_prompt(question: &str, results: &str) -> String {
    format!("Question: {question}\n\nQuery results:\n{results}\n\nAnswer:")
}

/// Pull a single read-only Cypher query out of model output.
pub fn extract_read_query(raw: &str) -> LoreResult<String> {
    let text = strip_code_fences(raw);
    let statement = split_statements(&text)
        .into_iter()
        .next()
        .ok_or_else(|| LoreError::InvalidScript("model returned no query".to_string()))?;

    if !is_read_only(&statement) {
        return Err(LoreError::InvalidScript(format!(
            "generated query is not read-only: {statement}"
        )));
    }
    Ok(statement)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_read_query_strips_fences() {
        let raw = "```cypher\nMATCH (n:Concept) RETURN n.name;\n```";
        assert_eq!(
            extract_read_query(raw).unwrap(),
            "MATCH (n:Concept) RETURN n.name"
        );
    }

    #[test]
    fn test_extract_read_query_takes_first_statement() {
        let raw = "MATCH (n) RETURN n LIMIT 5;\nMATCH (m) RETURN m";
        assert_eq!(extract_read_query(raw).unwrap(), "MATCH (n) RETURN n LIMIT 5");
    }

    #[test]
    fn test_extract_read_query_allows_keyword_in_node_name() {
        let raw = "MATCH (n:Concept {name: 'Set Theory'}) RETURN n.name";
        assert_eq!(extract_read_query(raw).unwrap(), raw);
    }

    #[test]
    fn test_extract_read_query_rejects_writes() {
        assert!(extract_read_query("MATCH (n) DETACH DELETE n").is_err());
        assert!(extract_read_query("CREATE (n:Concept {name: 'x'})").is_err());
        assert!(extract_read_query("MATCH (n) SET n.name = 'x' RETURN n").is_err());
    }

    #[test]
    fn test_extract_read_query_rejects_empty() {
        assert!(extract_read_query("").is_err());
        assert!(extract_read_query("```\n```").is_err());
    }

    #[test]
    fn test_prompts_carry_inputs() {
        let prompt = translate_prompt("Node labels: Concept", "what relates to entropy?");
        assert!(prompt.contains("Node labels: Concept"));
        assert!(prompt.contains("what relates to entropy?"));

        let prompt = answer_prompt("who?", "(no results)");
        assert!(prompt.contains("who?"));
        assert!(prompt.contains("(no results)"));
    }
}
