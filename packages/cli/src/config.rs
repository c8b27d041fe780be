use anyhow::Context;
use serde::{Deserialize, Serialize};
use sitecraft_editor::{Registry, DEFAULT_MAX_LEVELS};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "sitecraft.config.json";

/// Sitecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory holding `<siteId>.json`
    pub site_dir: String,

    /// Site edited by the CLI
    pub site_id: String,

    /// Undo levels kept per session
    pub history_depth: usize,

    /// Optional block library JSON replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("invalid {}", config_path.display()))?;
            debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            debug!(cwd = %cwd, "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Get absolute path to the site directory
    pub fn get_site_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.site_dir)
    }

    /// The configured block library, or the built-in one
    pub fn load_registry(&self, cwd: &str) -> anyhow::Result<Registry> {
        let Some(path) = &self.registry else {
            return Ok(Registry::builtin());
        };
        let path = PathBuf::from(cwd).join(path);
        debug!(path = %path.display(), "loading block library");
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read registry {}", path.display()))?;
        Ok(Registry::from_json(&json)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: "site".to_string(),
            site_id: "site".to_string(),
            history_depth: DEFAULT_MAX_LEVELS,
            registry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "siteDir": "content",
            "siteId": "portfolio",
            "historyDepth": 10,
            "registry": "blocks.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.site_dir, "content");
        assert_eq!(config.site_id, "portfolio");
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.registry, Some("blocks.json".to_string()));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "siteId": "blog" }"#).unwrap();
        assert_eq!(config.site_id, "blog");
        assert_eq!(config.site_dir, "site");
        assert_eq!(config.history_depth, DEFAULT_MAX_LEVELS);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_registry_override() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        std::fs::write(dir.path().join("blocks.json"), r#"{ "templates": [], "combinations": [] }"#).unwrap();

        let config = Config {
            registry: Some("blocks.json".to_string()),
            ..Config::default()
        };
        let registry = config.load_registry(&cwd).unwrap();
        assert!(registry.templates.is_empty());
        assert!(Config::default().load_registry(&cwd).unwrap().template("text-basic").is_some());
    }
}
