//! Environment-based configuration.
//!
//! All settings come from environment variables (a `.env` file is loaded
//! by the CLI before this runs). Required variables fail at startup, not
//! at request time.

use std::time::Duration;

use crate::error::{LoreError, LoreResult};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for summarization and answer phrasing.
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";

/// Default higher-tier model for Cypher generation and merging.
pub const DEFAULT_SCRIPT_MODEL: &str = "gpt-4o";

/// Default embedding model for the per-request vector index.
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";

/// Default per-stage timeout in seconds.
pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 120;

/// Connection settings for Neo4j.
#[derive(Debug, Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
}

/// Settings for the OpenAI-compatible LLM provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub summary_model: String,
    pub script_model: String,
    pub embed_model: String,
    pub stage_timeout: Duration,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub neo4j: Neo4jSettings,
    pub llm: LlmSettings,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> LoreResult<Self> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> LoreResult<Self> {
        let required = |key: &str| -> LoreResult<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| LoreError::config(format!("{key} is not set")))
        };
        let or_default = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let timeout_secs = match lookup("LORE_STAGE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                LoreError::config(format!("LORE_STAGE_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_STAGE_TIMEOUT_SECS,
        };

        Ok(Self {
            neo4j: Neo4jSettings {
                uri: required("NEO4J_URI")?,
                user: required("NEO4J_USERNAME")?,
                password: required("NEO4J_PASSWORD")?,
            },
            llm: LlmSettings {
                api_key: required("OPENAI_API_KEY")?,
                base_url: or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                summary_model: or_default("LORE_SUMMARY_MODEL", DEFAULT_SUMMARY_MODEL),
                script_model: or_default("LORE_SCRIPT_MODEL", DEFAULT_SCRIPT_MODEL),
                embed_model: or_default("LORE_EMBED_MODEL", DEFAULT_EMBED_MODEL),
                stage_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| v.to_string())
    }

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("NEO4J_URI", "bolt://localhost:7687"),
            ("NEO4J_USERNAME", "neo4j"),
            ("NEO4J_PASSWORD", "secret"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let env = base_env();
        let settings = Settings::from_lookup(&lookup_from(&env)).unwrap();
        assert_eq!(settings.llm.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.llm.summary_model, DEFAULT_SUMMARY_MODEL);
        assert_eq!(settings.llm.script_model, DEFAULT_SCRIPT_MODEL);
        assert_eq!(
            settings.llm.stage_timeout,
            Duration::from_secs(DEFAULT_STAGE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_missing_required_var() {
        let mut env = base_env();
        env.remove("NEO4J_PASSWORD");
        let err = Settings::from_lookup(&lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains("NEO4J_PASSWORD"));
    }

    #[test]
    fn test_overrides() {
        let mut env = base_env();
        env.insert("LORE_SCRIPT_MODEL", "gpt-4-turbo");
        env.insert("LORE_STAGE_TIMEOUT_SECS", "30");
        let settings = Settings::from_lookup(&lookup_from(&env)).unwrap();
        assert_eq!(settings.llm.script_model, "gpt-4-turbo");
        assert_eq!(settings.llm.stage_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let mut env = base_env();
        env.insert("LORE_STAGE_TIMEOUT_SECS", "soon");
        assert!(Settings::from_lookup(&lookup_from(&env)).is_err());
    }
}
