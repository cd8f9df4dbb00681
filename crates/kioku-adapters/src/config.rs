//! Adapter configuration
//!
//! Credentials and endpoints come from the environment (with `.env` support);
//! engine tuning comes from an optional TOML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kioku::EngineConfig;

const DEFAULT_COLLECTION: &str = "kioku_memories";

/// Settings read from the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterSettings {
    pub openai_api_key: Option<String>,
    pub openai_embedding_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_fast_model: Option<String>,
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub qdrant_collection: String,
    pub notes_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

impl AdapterSettings {
    /// Load `.env` (if any), then read the process environment
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_embedding_model: get("OPENAI_EMBEDDING_MODEL"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL"),
            gemini_fast_model: get("GEMINI_FAST_MODEL"),
            qdrant_url: get("QDRANT_URL"),
            qdrant_api_key: get("QDRANT_API_KEY"),
            qdrant_collection: get("QDRANT_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            notes_dir: get("KIOKU_NOTES_DIR").map(PathBuf::from),
            config_path: get("KIOKU_CONFIG").map(PathBuf::from),
        }
    }
}

/// Load engine tuning from a TOML file. A missing file yields the defaults.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No engine config file, using defaults");
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read engine config from {:?}", path))?;
    let config: EngineConfig =
        toml::from_str(&content).with_context(|| "Failed to parse engine config")?;
    config
        .validate()
        .with_context(|| format!("Invalid engine config in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_settings_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("GEMINI_API_KEY", "  "),
            ("QDRANT_URL", "http://localhost:6334"),
            ("KIOKU_NOTES_DIR", "/tmp/notes"),
        ]
        .into_iter()
        .collect();

        let settings = AdapterSettings::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.gemini_api_key, None);
        assert_eq!(settings.qdrant_url.as_deref(), Some("http://localhost:6334"));
        assert_eq!(settings.qdrant_collection, "kioku_memories");
        assert_eq!(settings.notes_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(settings.config_path, None);
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_engine_config(&dir.path().join("kioku.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kioku.toml");
        std::fs::write(
            &path,
            "[ranking]\ntag_boost = 0.25\n\n[compression]\nrecent_buffer = 4\n",
        )
        .unwrap();

        let config = load_engine_config(&path).unwrap();
        assert_eq!(config.ranking.tag_boost, 0.25);
        assert_eq!(config.ranking.half_life_days, 42.0);
        assert_eq!(config.compression.recent_buffer, 4);
        assert_eq!(config.retrieval.history_window, 3);
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kioku.toml");
        std::fs::write(&path, "[compression]\ntopic_group_size = 0\n").unwrap();

        assert!(load_engine_config(&path).is_err());
    }
}
