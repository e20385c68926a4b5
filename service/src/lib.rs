//! # FAQ Service
//!
//! Orchestrates the faqbot pipeline:
//!
//! - **Ingestion**: decode uploads, embed only the new questions, append
//! - **Chat**: embed the query, find the closest question, apply the threshold
//! - **Seeding**: load a default FAQ file at startup
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         FaqService                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  upload ──► parse_faqs ──► embed_batch ──► KnowledgeBase        │
//! │                                              (write lock)       │
//! │  query  ──► embed ──► best_match ──► score > 0.75 ?             │
//! │                        (read lock)     answer : fallback        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use faqbot_service::{EmbeddingConfig, FaqService};
//!
//! let provider = EmbeddingConfig::default().build_provider()?;
//! let service = FaqService::new(provider);
//! service.load_seed("faqs.json").await?;
//!
//! let reply = service.answer("When are you open?").await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::{EmbeddingConfig, EmbeddingProviderType};
pub use engine::{
    ChatAnswer, FALLBACK_ANSWER, FaqService, IngestReport, MatchOutcome, SIMILARITY_THRESHOLD,
    ServiceStats, is_confident,
};
pub use error::{Result, ServiceError};

// Re-export from dependencies for convenience
pub use faqbot_embeddings::{EmbeddingError, EmbeddingProvider};
pub use faqbot_knowledge::{FaqEntry, FaqFormat, KnowledgeError};
