//! Embedding providers.
//!
//! Supports an in-process sentence-transformer model (fastembed) and any
//! OpenAI-compatible embeddings API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the model this provider embeds with.
    fn model(&self) -> &str;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        // Default implementation: process sequentially
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// OpenAI-compatible embedding provider.
pub struct OpenAIProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model to request.
    model: String,

    /// Requested output dimensions, if the model supports shortening.
    dimensions: Option<usize>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            model: "text-embedding-3-small".to_string(),
            dimensions: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request shortened output vectors.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Check if an API key is available.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(&self, input: serde_json::Value) -> Result<Vec<Embedding>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            EmbeddingError::ProviderNotConfigured("OPENAI_API_KEY is not set".to_string())
        })?;

        let mut body = serde_json::json!({
            "input": input,
            "model": self.model
        });
        if let Some(dims) = self.dimensions {
            body["dimensions"] = serde_json::json!(dims);
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            warn!("Embedding API rate limited, retry after {retry_after}s");
            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let payload = response.text().await?;
        let mut result: OpenAIEmbeddingResponse = serde_json::from_str(&payload)?;
        result.data.sort_by_key(|item| item.index);

        Ok(result.data.into_iter().map(|item| item.embedding).collect())
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        if let Some(dims) = self.dimensions {
            return dims;
        }
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        debug!("Generating embedding with model: {}", self.model);

        self.request(serde_json::json!(text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Generating batch embeddings for {} texts with model: {}",
            texts.len(),
            self.model
        );

        let embeddings = self.request(serde_json::json!(texts)).await?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        info!("Generated {} batch embeddings", embeddings.len());
        Ok(embeddings)
    }
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(feature = "local")]
pub use local::{FastEmbedProvider, LocalModelOptions};

#[cfg(feature = "local")]
mod local {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use tracing::{debug, info};

    use super::EmbeddingProvider;
    use crate::error::{EmbeddingError, Result};
    use crate::{DEFAULT_MODEL, Embedding, MINILM_DIMENSION};

    const DEFAULT_BATCH_SIZE: usize = 256;

    /// Options for loading a local model.
    #[derive(Debug, Clone)]
    pub struct LocalModelOptions {
        pub model: String,
        pub cache_dir: Option<PathBuf>,
        pub batch_size: usize,
    }

    impl Default for LocalModelOptions {
        fn default() -> Self {
            Self {
                model: DEFAULT_MODEL.to_string(),
                cache_dir: None,
                batch_size: DEFAULT_BATCH_SIZE,
            }
        }
    }

    /// In-process sentence-transformer provider backed by fastembed.
    ///
    /// Inference is CPU-bound, so every call runs on the blocking pool.
    pub struct FastEmbedProvider {
        embedder: Arc<Mutex<TextEmbedding>>,
        model_id: String,
        dimension: usize,
        batch_size: usize,
    }

    impl FastEmbedProvider {
        /// Load the model, downloading it into the cache directory on first use.
        pub fn new(options: LocalModelOptions) -> Result<Self> {
            let (model, dimension) = resolve_model(&options.model)?;

            let mut init = InitOptions::new(model).with_show_download_progress(false);
            if let Some(dir) = options.cache_dir {
                init = init.with_cache_dir(dir);
            }

            let embedder = TextEmbedding::try_new(init)
                .map_err(|e| EmbeddingError::Model(format!("failed to load {}: {e}", options.model)))?;

            info!("Loaded local embedding model {} ({dimension} dimensions)", options.model);

            Ok(Self {
                embedder: Arc::new(Mutex::new(embedder)),
                model_id: options.model,
                dimension,
                batch_size: options.batch_size.max(1),
            })
        }
    }

    fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize)> {
        match name.trim().to_lowercase().as_str() {
            "" | "minilm" | "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                Ok((EmbeddingModel::AllMiniLML6V2, MINILM_DIMENSION))
            }
            "all-minilm-l12-v2" | "sentence-transformers/all-minilm-l12-v2" => {
                Ok((EmbeddingModel::AllMiniLML12V2, MINILM_DIMENSION))
            }
            "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => {
                Ok((EmbeddingModel::BGESmallENV15, 384))
            }
            other => Err(EmbeddingError::ProviderNotConfigured(format!(
                "unsupported local model '{other}'"
            ))),
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FastEmbedProvider {
        fn name(&self) -> &str {
            "local"
        }

        fn model(&self) -> &str {
            &self.model_id
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        async fn embed(&self, text: &str) -> Result<Embedding> {
            self.embed_batch(&[text.to_string()])
                .await?
                .pop()
                .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding returned".to_string()))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }

            let embedder = Arc::clone(&self.embedder);
            let batch: Vec<String> = texts.to_vec();
            let batch_size = self.batch_size;

            debug!("Embedding {} texts locally", batch.len());

            tokio::task::spawn_blocking(move || {
                let mut embedder = embedder
                    .lock()
                    .map_err(|_| EmbeddingError::Model("embedding model lock poisoned".to_string()))?;
                embedder
                    .embed(&batch, Some(batch_size))
                    .map_err(|e| EmbeddingError::Model(e.to_string()))
            })
            .await
            .map_err(|e| EmbeddingError::Model(format!("embedding task failed: {e}")))?
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_default_dimensions() {
        let provider = OpenAIProvider::new().with_model("text-embedding-3-large");
        assert_eq!(provider.dimension(), 3072);

        let provider = provider.with_dimensions(256);
        assert_eq!(provider.dimension(), 256);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAIProvider::new().with_base_url("http://localhost:9000/v1/");
        assert_eq!(provider.base_url, "http://localhost:9000/v1");
    }
}
