//! FAQ records.

use serde::{Deserialize, Serialize};

use crate::error::{KnowledgeError, Result};

/// A single question/answer pair.
///
/// Entries have no id; they are identified by their position in the
/// knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    /// Create a new entry.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Build an entry from possibly-missing fields, rejecting blanks.
    ///
    /// `index` is the record's zero-based position in the upload.
    pub(crate) fn from_fields(
        index: usize,
        question: Option<String>,
        answer: Option<String>,
    ) -> Result<Self> {
        let question = required(index, "question", question)?;
        let answer = required(index, "answer", answer)?;
        Ok(Self { question, answer })
    }
}

fn required(index: usize, field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(KnowledgeError::InvalidRecord {
            index,
            reason: format!("'{field}' is blank"),
        }),
        None => Err(KnowledgeError::InvalidRecord {
            index,
            reason: format!("missing '{field}'"),
        }),
    }
}
