//! Error types for the FAQ service.

use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur while ingesting FAQs or answering queries.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A chat query arrived before any FAQ was ingested.
    #[error("The bot is not yet trained. Please upload an FAQ file.")]
    NotTrained,

    /// Decoding or store validation failed.
    #[error(transparent)]
    Knowledge(#[from] faqbot_knowledge::KnowledgeError),

    /// The embedding provider failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] faqbot_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Whether the caller should treat this as a bad request rather than a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NotTrained => true,
            Self::Knowledge(err) => err.is_validation(),
            Self::Embedding(_) | Self::Config(_) | Self::Io(_) => false,
        }
    }
}
