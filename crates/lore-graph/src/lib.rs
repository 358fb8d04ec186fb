//! # Lore Graph
//!
//! Neo4j integration: the shared connection client, the graph store
//! adapter that materializes LLM-generated scripts, and the LLM-backed
//! natural-language query engine.

pub mod client;
pub mod query;
pub mod store;

pub use client::{GraphClient, GraphCounts};
pub use query::{GraphQueryEngine, QueryResponder};
pub use store::{GraphStore, Neo4jStore};
