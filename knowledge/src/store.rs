//! The in-memory knowledge base.

use faqbot_embeddings::{BestMatch, Embedding, best_match};
use tracing::debug;

use crate::entry::FaqEntry;
use crate::error::{KnowledgeError, Result};

/// FAQ entries paired by position with the embeddings of their questions.
///
/// `entries` and `vectors` always have the same length: they are only ever
/// extended together, after the whole batch has been validated.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
    vectors: Vec<Embedding>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries and their question embeddings, preserving order.
    ///
    /// Nothing is appended unless every vector has the store's dimension and
    /// there is exactly one vector per entry. Returns the number appended.
    pub fn append(&mut self, entries: Vec<FaqEntry>, vectors: Vec<Embedding>) -> Result<usize> {
        if entries.len() != vectors.len() {
            return Err(KnowledgeError::LengthMismatch {
                entries: entries.len(),
                vectors: vectors.len(),
            });
        }

        let Some(first) = vectors.first() else {
            return Ok(0);
        };
        let expected = self.dimension().unwrap_or(first.len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(KnowledgeError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let added = entries.len();
        self.entries.extend(entries);
        self.vectors.extend(vectors);

        debug!("Appended {added} entries, knowledge base now holds {}", self.len());
        Ok(added)
    }

    /// Whether at least one vector is stored.
    pub fn is_trained(&self) -> bool {
        !self.vectors.is_empty()
    }

    /// Get the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the knowledge base is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension of the stored vectors, once any have been stored.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    /// Find the stored question closest to `query`.
    ///
    /// Returns `None` on an untrained store.
    pub fn best_match(&self, query: &[f32]) -> Result<Option<BestMatch>> {
        match self.dimension() {
            Some(expected) if query.len() != expected => Err(KnowledgeError::DimensionMismatch {
                expected,
                actual: query.len(),
            }),
            _ => best_match(query, &self.vectors).map_err(KnowledgeError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(q: &str) -> FaqEntry {
        FaqEntry::new(q, format!("answer to {q}"))
    }

    #[test]
    fn test_starts_untrained() {
        let kb = KnowledgeBase::new();
        assert!(!kb.is_trained());
        assert!(kb.is_empty());
        assert_eq!(kb.dimension(), None);
        assert_eq!(kb.best_match(&[1.0, 0.0]).unwrap(), None);
    }

    #[test]
    fn test_append_and_get() {
        let mut kb = KnowledgeBase::new();
        let added = kb
            .append(vec![entry("a"), entry("b")], vec![vec![1.0, 0.0], vec![0.0, 1.0]])
            .unwrap();

        assert_eq!(added, 2);
        assert!(kb.is_trained());
        assert_eq!(kb.dimension(), Some(2));
        assert_eq!(kb.get(1), Some(&entry("b")));
        assert_eq!(kb.get(2), None);
    }

    #[test]
    fn test_split_appends_match_single_append() {
        let mut split = KnowledgeBase::new();
        split
            .append(vec![entry("a"), entry("b")], vec![vec![1.0, 0.0], vec![0.0, 1.0]])
            .unwrap();
        split.append(vec![entry("c")], vec![vec![1.0, 1.0]]).unwrap();

        let mut single = KnowledgeBase::new();
        single
            .append(
                vec![entry("a"), entry("b"), entry("c")],
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            )
            .unwrap();

        assert_eq!(split.entries(), single.entries());
        assert_eq!(split.vectors(), single.vectors());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut kb = KnowledgeBase::new();
        kb.append(vec![entry("a")], vec![vec![1.0]]).unwrap();
        kb.append(vec![entry("a")], vec![vec![1.0]]).unwrap();
        assert_eq!(kb.len(), 2);
    }

    #[test]
    fn test_length_mismatch_leaves_store_unchanged() {
        let mut kb = KnowledgeBase::new();
        kb.append(vec![entry("a")], vec![vec![1.0, 0.0]]).unwrap();

        let err = kb
            .append(vec![entry("b"), entry("c")], vec![vec![0.0, 1.0]])
            .unwrap_err();

        assert!(matches!(
            err,
            KnowledgeError::LengthMismatch {
                entries: 2,
                vectors: 1
            }
        ));
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.entries().len(), kb.vectors().len());
    }

    #[test]
    fn test_dimension_mismatch_against_store() {
        let mut kb = KnowledgeBase::new();
        kb.append(vec![entry("a")], vec![vec![1.0, 0.0]]).unwrap();

        let err = kb.append(vec![entry("b")], vec![vec![1.0, 0.0, 0.0]]).unwrap_err();

        assert!(matches!(
            err,
            KnowledgeError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_dimension_mismatch_within_batch() {
        let mut kb = KnowledgeBase::new();
        let err = kb
            .append(vec![entry("a"), entry("b")], vec![vec![1.0, 0.0], vec![1.0]])
            .unwrap_err();

        assert!(matches!(err, KnowledgeError::DimensionMismatch { .. }));
        assert!(!kb.is_trained());
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut kb = KnowledgeBase::new();
        assert_eq!(kb.append(Vec::new(), Vec::new()).unwrap(), 0);
        assert!(!kb.is_trained());
    }

    #[test]
    fn test_best_match_over_store() {
        let mut kb = KnowledgeBase::new();
        kb.append(
            vec![entry("hours"), entry("refunds")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let best = kb.best_match(&[0.1, 0.9]).unwrap().unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(kb.get(best.index).map(|e| e.question.as_str()), Some("refunds"));
    }

    #[test]
    fn test_best_match_query_dimension() {
        let mut kb = KnowledgeBase::new();
        kb.append(vec![entry("a")], vec![vec![1.0, 0.0]]).unwrap();
        assert!(kb.best_match(&[1.0]).unwrap_err().is_validation());
    }
}
