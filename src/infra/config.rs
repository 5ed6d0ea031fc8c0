// src/infra/config.rs - Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::DishHubError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Root of the REST API; endpoint paths are appended to it.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP transport. 0 disables it.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    /// Parse and sanity-check `base_url`.
    pub fn parsed_base_url(&self) -> Result<url::Url, DishHubError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| DishHubError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(DishHubError::Config(format!(
                "base_url must be http or https, got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub page_size: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, DishHubError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, DishHubError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DishHubError::Config(format!("{}: {e}", path.display())))?;
        config.backend.parsed_base_url()?;
        Ok(config)
    }

    /// Apply a `--base-url` override from the command line.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self, DishHubError> {
        if let Some(url) = base_url {
            self.backend.base_url = url;
            self.backend.parsed_base_url()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.backend.base_url, "http://localhost:8000/api");
        assert_eq!(c.backend.timeout_seconds, 30);
        assert_eq!(c.history.page_size, 10);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.history.page_size, 10);
        assert_eq!(config.backend.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[backend]
base_url = "https://kitchen.example.com/v1"
timeout_seconds = 0

[history]
page_size = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://kitchen.example.com/v1");
        assert!(config.backend.timeout().is_none());
        assert_eq!(config.history.page_size, 2);
    }

    #[test]
    fn test_backend_timeout_defaults_when_omitted() {
        let toml_str = r#"
[backend]
base_url = "http://127.0.0.1:9000"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.timeout_seconds, 30);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let backend = BackendConfig {
            base_url: "ftp://kitchen".into(),
            ..Default::default()
        };
        assert!(matches!(
            backend.parsed_base_url(),
            Err(DishHubError::Config(_))
        ));
    }

    #[test]
    fn test_with_base_url_override() {
        let config = Config::default()
            .with_base_url(Some("http://10.0.0.5:3000".into()))
            .unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:3000");

        assert!(Config::default()
            .with_base_url(Some("not a url".into()))
            .is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\npage_size = 25\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.history.page_size, 25);
        assert_eq!(config.backend.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(DishHubError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\npage_size = \"ten\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(DishHubError::Config(_))
        ));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.backend.base_url, config.backend.base_url);
        assert_eq!(deserialized.history.page_size, config.history.page_size);
    }
}
