//! FAQ service implementation.

use std::path::Path;
use std::sync::Arc;

use faqbot_embeddings::{EmbeddingError, EmbeddingProvider};
use faqbot_knowledge::{FaqEntry, FaqFormat, KnowledgeBase, parse_faqs};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};

/// Minimum cosine score a match must exceed to be answered.
pub const SIMILARITY_THRESHOLD: f32 = 0.75;

/// Answer returned when no question is similar enough.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn’t find an answer to that in the FAQs.";

/// Whether a best-match score is confident enough to answer with.
///
/// The comparison is strict: a score equal to the threshold is not a match.
pub fn is_confident(score: f32) -> bool {
    score > SIMILARITY_THRESHOLD
}

/// Owns the knowledge base and answers chat queries against it.
///
/// Every mutation of the knowledge base goes through the write lock, and a
/// search holds the read lock for the whole scan, so readers never observe a
/// half-applied append. Embedding happens before any lock is taken.
pub struct FaqService {
    /// Embedding provider for questions and queries.
    provider: Arc<dyn EmbeddingProvider>,

    /// Entries and their question embeddings.
    knowledge: RwLock<KnowledgeBase>,
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Entries appended by this call.
    pub added: usize,

    /// Entries held after this call.
    pub total: usize,
}

/// How a chat query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The closest question cleared the threshold.
    Matched { index: usize, score: f32 },
    /// Nothing cleared the threshold.
    NoMatch { best_score: f32 },
}

/// Reply to a chat query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub outcome: MatchOutcome,
}

impl ChatAnswer {
    /// Whether the answer came from the knowledge base.
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Matched { .. })
    }
}

/// Statistics about the service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    /// Number of entries stored.
    pub entries: usize,

    /// Dimension of stored embeddings.
    pub dimension: Option<usize>,

    /// Embedding provider name.
    pub provider: String,

    /// Embedding model.
    pub model: String,
}

impl FaqService {
    /// Create a service with an empty knowledge base.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            knowledge: RwLock::new(KnowledgeBase::new()),
        }
    }

    /// Whether at least one FAQ has been ingested.
    pub async fn is_trained(&self) -> bool {
        self.knowledge.read().await.is_trained()
    }

    /// Number of FAQs held.
    pub async fn len(&self) -> usize {
        self.knowledge.read().await.len()
    }

    /// Check if no FAQs are held.
    pub async fn is_empty(&self) -> bool {
        self.knowledge.read().await.is_empty()
    }

    /// Get a copy of the entry at `index`.
    pub async fn entry(&self, index: usize) -> Option<FaqEntry> {
        self.knowledge.read().await.get(index).cloned()
    }

    /// Embed and append new FAQs.
    ///
    /// Only the new questions are embedded. If anything fails the knowledge
    /// base is left exactly as it was.
    pub async fn ingest(&self, entries: Vec<FaqEntry>) -> Result<IngestReport> {
        if entries.is_empty() {
            return Err(faqbot_knowledge::KnowledgeError::EmptyUpload.into());
        }

        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();
        let vectors = self.provider.embed_batch(&questions).await?;
        if vectors.len() != questions.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                questions.len(),
                vectors.len()
            ))
            .into());
        }

        let mut knowledge = self.knowledge.write().await;
        let added = knowledge.append(entries, vectors)?;
        let total = knowledge.len();

        info!("Added {added} FAQs, knowledge base now holds {total}");
        Ok(IngestReport { added, total })
    }

    /// Decode an uploaded file and ingest its FAQs.
    pub async fn ingest_file(&self, filename: &str, bytes: &[u8]) -> Result<IngestReport> {
        let format = FaqFormat::from_filename(filename)?;
        let entries = parse_faqs(bytes, format)?;
        debug!("Decoded {} FAQs from {filename} ({format})", entries.len());
        self.ingest(entries).await
    }

    /// Load a seed file from disk.
    pub async fn load_seed(&self, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path.to_string_lossy();

        let report = self.ingest_file(&filename, &bytes).await?;
        info!("Loaded and embedded {} seed FAQs from {}", report.added, path.display());
        Ok(report)
    }

    /// Answer a free-text query.
    ///
    /// Fails with [`ServiceError::NotTrained`] before touching the provider
    /// when nothing has been ingested yet.
    pub async fn answer(&self, query: &str) -> Result<ChatAnswer> {
        if !self.is_trained().await {
            return Err(ServiceError::NotTrained);
        }

        let query_vector = self.provider.embed(query).await?;

        let knowledge = self.knowledge.read().await;
        // Query vectors come from the provider, so a bad one is a provider error.
        match knowledge.dimension() {
            Some(expected) if query_vector.len() != expected => {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                }
                .into());
            }
            _ => {}
        }
        let best = knowledge.best_match(&query_vector)?.ok_or_else(|| {
            EmbeddingError::InvalidResponse(
                "query embedding produced no comparable score".to_string(),
            )
        })?;

        debug!(
            "Best match for query: index {} with score {:.4}",
            best.index, best.score
        );

        let answer = match knowledge.get(best.index) {
            Some(entry) if is_confident(best.score) => ChatAnswer {
                answer: entry.answer.clone(),
                outcome: MatchOutcome::Matched {
                    index: best.index,
                    score: best.score,
                },
            },
            _ => ChatAnswer {
                answer: FALLBACK_ANSWER.to_string(),
                outcome: MatchOutcome::NoMatch {
                    best_score: best.score,
                },
            },
        };
        Ok(answer)
    }

    /// Get service statistics.
    pub async fn stats(&self) -> ServiceStats {
        let knowledge = self.knowledge.read().await;
        ServiceStats {
            entries: knowledge.len(),
            dimension: knowledge.dimension(),
            provider: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
        }
    }
}
