//! Error types for the knowledge base.

use thiserror::Error;

/// Result type alias for knowledge base operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Errors that can occur while decoding uploads or mutating the store.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Entries and vectors were not paired one to one.
    #[error("cannot append {entries} entries with {vectors} vectors")]
    LengthMismatch { entries: usize, vectors: usize },

    /// A vector does not match the store's dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Upload format could not be determined from the file name.
    #[error("Unsupported file type '{0}'. Use .json or .csv.")]
    UnsupportedFormat(String),

    /// Upload decoded to zero records.
    #[error("No Q&A pairs found in the file.")]
    EmptyUpload,

    /// A CSV header row lacks a required column.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A record lacks a usable question or answer.
    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// Malformed JSON payload.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV payload.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Similarity computation failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] faqbot_embeddings::EmbeddingError),
}

impl KnowledgeError {
    /// Whether the error was caused by the caller's input rather than a
    /// decoding or provider failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::UnsupportedFormat(_)
                | Self::EmptyUpload
                | Self::MissingColumn(_)
                | Self::InvalidRecord { .. }
        )
    }
}
