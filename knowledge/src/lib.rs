//! # Knowledge
//!
//! The FAQ knowledge base: question/answer entries stored side by side with
//! the embeddings of their questions, plus decoding of uploaded FAQ files.
//!
//! ```text
//! upload bytes ──► parse_faqs ──► Vec<FaqEntry>
//!                                      │ (questions embedded elsewhere)
//!                                      ▼
//!                 KnowledgeBase::append(entries, vectors)
//!                                      │
//!                                      ▼
//!                 KnowledgeBase::best_match(query) ──► BestMatch
//! ```

pub mod entry;
pub mod error;
pub mod ingest;
pub mod store;

pub use entry::FaqEntry;
pub use error::{KnowledgeError, Result};
pub use ingest::{FaqFormat, parse_faqs};
pub use store::KnowledgeBase;
