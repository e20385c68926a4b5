//! # Embeddings
//!
//! Sentence embeddings and similarity search for the faqbot knowledge base.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert FAQ questions and chat queries to dense vectors
//! - **Similarity Search**: Linear cosine-similarity scan for the closest question
//! - **Multiple Providers**: In-process MiniLM (fastembed) or an OpenAI-compatible API
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► best_match                 │
//! │       │                                  │                      │
//! │       ▼                                  ▼                      │
//! │  FastEmbed/OpenAI               cosine_similarity               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
#[cfg(feature = "local")]
pub use provider::FastEmbedProvider;
pub use provider::{EmbeddingProvider, OpenAIProvider};
pub use similarity::{BestMatch, best_match, cosine_similarity};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Output dimension of `sentence-transformers/all-MiniLM-L6-v2`.
pub const MINILM_DIMENSION: usize = 384;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
