//! Lore Core Library
//!
//! Shared types for the Lore document-to-knowledge-graph backend:
//! error taxonomy, environment configuration, and the validated
//! Cypher graph-script wrapper.

pub mod config;
pub mod error;
pub mod script;

pub use config::Settings;
pub use error::{LoreError, LoreResult};
pub use script::GraphScript;
