//! Shared helpers for faqbot tests.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use faqbot_embeddings::{Embedding, EmbeddingError, EmbeddingProvider, Result};

/// Deterministic embedding provider.
///
/// Texts registered with [`StubProvider::with_vector`] embed to that vector;
/// anything else embeds to a one-hot vector picked by hashing the text.
/// Every embedded text is recorded so tests can assert what was (and was
/// not) sent to the provider.
pub struct StubProvider {
    dimension: usize,
    vectors: HashMap<String, Embedding>,
    embedded: Mutex<Vec<String>>,
    batches: Mutex<usize>,
    failing: AtomicBool,
}

impl StubProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            embedded: Mutex::new(Vec::new()),
            batches: Mutex::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Map `text` to a fixed vector.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Embedding) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Make every later call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every text embedded so far, in call order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.embedded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of texts embedded so far.
    pub fn embed_count(&self) -> usize {
        self.embedded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of `embed_batch` calls so far.
    pub fn batch_count(&self) -> usize {
        *self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn vector_for(&self, text: &str) -> Embedding {
        if let Some(vector) = self.vectors.get(text) {
            return vector.clone();
        }
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let slot = (hasher.finish() % self.dimension as u64) as usize;

        let mut vector = vec![0.0; self.dimension];
        vector[slot] = 1.0;
        vector
    }

    fn record(&self, text: &str) -> Result<Embedding> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ApiRequest("stub provider failure".to_string()));
        }
        self.embedded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(self.vector_for(text))
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.record(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        *self.batches.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        texts.iter().map(|text| self.record(text)).collect()
    }
}

/// A unit vector whose cosine similarity with `[1, 0, ...]` is `score`.
pub fn vector_with_score(score: f32, dimension: usize) -> Embedding {
    let mut vector = vec![0.0; dimension];
    vector[0] = score;
    vector[1] = (1.0 - score * score).max(0.0).sqrt();
    vector
}

/// The basis vector `[1, 0, ...]`.
pub fn unit_x(dimension: usize) -> Embedding {
    let mut vector = vec![0.0; dimension];
    vector[0] = 1.0;
    vector
}
