//! Server configuration, loaded from an optional TOML file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use faqbot_service::EmbeddingConfig;
use serde::{Deserialize, Serialize};

/// Default body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqbotConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Embedding provider settings.
    pub embedding: EmbeddingConfig,
}

impl FaqbotConfig {
    /// Load the configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Configuration for the HTTP listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: SocketAddr,

    /// Origins allowed by CORS; `"*"` allows any.
    pub allowed_origins: Vec<String>,

    /// Maximum accepted request body size for uploads.
    pub max_upload_bytes: usize,

    /// FAQ file loaded at startup, if any.
    pub seed_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            allowed_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_path: Some(PathBuf::from("faqs.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqbot_service::EmbeddingProviderType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_file() {
        let config = FaqbotConfig::load(None).unwrap();
        assert_eq!(config, FaqbotConfig::default());
        assert_eq!(config.server.bind.port(), 8000);
        assert_eq!(config.server.seed_path, Some(PathBuf::from("faqs.json")));
    }

    #[test]
    fn test_partial_file() {
        let config = FaqbotConfig::from_toml(
            r#"
            [server]
            bind = "127.0.0.1:9000"
            allowed_origins = ["https://example.com"]

            [embedding]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.server.allowed_origins, vec!["https://example.com"]);
        assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.embedding.provider, EmbeddingProviderType::OpenAI);
    }

    #[test]
    fn test_missing_file() {
        let err = FaqbotConfig::load(Some(Path::new("/nonexistent/faqbot.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_invalid_file() {
        assert!(FaqbotConfig::from_toml("[server]\nbind = 12").is_err());
    }
}
