//! Configuration for the embedding provider behind the FAQ service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use faqbot_embeddings::{DEFAULT_MODEL, EmbeddingProvider, OpenAIProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use for embeddings (provider default when unset).
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    pub base_url: Option<String>,

    /// API key; falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,

    /// Texts per inference batch for the local model.
    pub batch_size: usize,

    /// Request timeout for remote providers.
    pub timeout_secs: u64,

    /// Where local model files are downloaded.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::Local,
            model: None,
            base_url: None,
            api_key: None,
            batch_size: 256,
            timeout_secs: 30,
            cache_dir: None,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// In-process sentence-transformer model.
    Local,
    /// OpenAI-compatible embeddings API.
    #[serde(rename = "openai")]
    OpenAI,
}

impl EmbeddingConfig {
    /// Build the configured provider.
    ///
    /// Loading the local model may download it and is blocking; call this
    /// from a blocking context.
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        let provider: Arc<dyn EmbeddingProvider> = match self.provider {
            EmbeddingProviderType::Local => self.build_local()?,
            EmbeddingProviderType::OpenAI => {
                let mut provider = OpenAIProvider::new()
                    .with_timeout(Duration::from_secs(self.timeout_secs))?;
                if let Some(model) = &self.model {
                    provider = provider.with_model(model);
                }
                if let Some(url) = &self.base_url {
                    provider = provider.with_base_url(url);
                }
                if let Some(key) = &self.api_key {
                    provider = provider.with_api_key(key);
                }
                if !provider.is_available() {
                    return Err(ServiceError::Config(
                        "openai provider selected but no API key configured".to_string(),
                    ));
                }
                Arc::new(provider)
            }
        };

        info!(
            "Using {} embedding provider with model {}",
            provider.name(),
            provider.model()
        );
        Ok(provider)
    }

    #[cfg(feature = "local")]
    fn build_local(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        use faqbot_embeddings::provider::{FastEmbedProvider, LocalModelOptions};

        let options = LocalModelOptions {
            model: self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            cache_dir: self.cache_dir.clone(),
            batch_size: self.batch_size,
        };
        Ok(Arc::new(FastEmbedProvider::new(options)?))
    }

    #[cfg(not(feature = "local"))]
    fn build_local(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        Err(ServiceError::Config(format!(
            "local model {} requested but faqbot was built without the `local` feature",
            self.model.as_deref().unwrap_or(DEFAULT_MODEL)
        )))
    }
}
