//! Decoding uploaded FAQ files into entries.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::entry::FaqEntry;
use crate::error::{KnowledgeError, Result};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqFormat {
    /// A JSON array of `{"question": ..., "answer": ...}` objects.
    Json,
    /// A CSV file with `Question` and `Answer` columns.
    Csv,
}

impl FaqFormat {
    /// Resolve the format from a file name's extension (case-insensitive).
    pub fn from_filename(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(KnowledgeError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl fmt::Display for FaqFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Decode an upload into entries, in file order.
///
/// Fails on malformed payloads, on records missing a question or answer, and
/// on uploads that contain no records at all.
pub fn parse_faqs(bytes: &[u8], format: FaqFormat) -> Result<Vec<FaqEntry>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(KnowledgeError::EmptyUpload);
    }

    let entries = match format {
        FaqFormat::Json => parse_json(bytes)?,
        FaqFormat::Csv => parse_csv(bytes)?,
    };

    if entries.is_empty() {
        return Err(KnowledgeError::EmptyUpload);
    }
    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RawFaq {
    question: Option<String>,
    answer: Option<String>,
}

fn parse_json(bytes: &[u8]) -> Result<Vec<FaqEntry>> {
    let records: Vec<RawFaq> = serde_json::from_slice(bytes)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| FaqEntry::from_fields(index, raw.question, raw.answer))
        .collect()
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<FaqEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let question = column(&headers, "Question")?;
    let answer = column(&headers, "Answer")?;

    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        entries.push(FaqEntry::from_fields(
            index,
            record.get(question).map(str::to_string),
            record.get(answer).map(str::to_string),
        )?);
    }
    Ok(entries)
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or(KnowledgeError::MissingColumn(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(FaqFormat::from_filename("faqs.json").unwrap(), FaqFormat::Json);
        assert_eq!(FaqFormat::from_filename("FAQS.CSV").unwrap(), FaqFormat::Csv);
        assert!(matches!(
            FaqFormat::from_filename("faqs.xlsx"),
            Err(KnowledgeError::UnsupportedFormat(_))
        ));
        assert!(FaqFormat::from_filename("faqs").is_err());
    }

    #[test]
    fn test_parse_json() {
        let payload = br#"[
            {"question": "What are your hours?", "answer": "9-5"},
            {"question": "Do you ship abroad?", "answer": "Yes", "category": "shipping"}
        ]"#;

        let entries = parse_faqs(payload, FaqFormat::Json).unwrap();
        assert_eq!(
            entries,
            vec![
                FaqEntry::new("What are your hours?", "9-5"),
                FaqEntry::new("Do you ship abroad?", "Yes"),
            ]
        );
    }

    #[test]
    fn test_parse_json_empty_list() {
        assert!(matches!(
            parse_faqs(b"[]", FaqFormat::Json),
            Err(KnowledgeError::EmptyUpload)
        ));
    }

    #[test]
    fn test_parse_json_missing_field() {
        let err = parse_faqs(br#"[{"question": "Q"}]"#, FaqFormat::Json).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidRecord { index: 0, .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_faqs(b"[{\"question\": ", FaqFormat::Json).unwrap_err();
        assert!(matches!(err, KnowledgeError::Json(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_parse_csv() {
        let payload = b"Question,Answer\nWhat are your hours?,9-5\n\"Where, exactly?\",Main St\n";

        let entries = parse_faqs(payload, FaqFormat::Csv).unwrap();
        assert_eq!(
            entries,
            vec![
                FaqEntry::new("What are your hours?", "9-5"),
                FaqEntry::new("Where, exactly?", "Main St"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_lowercase_headers_and_extra_columns() {
        let payload = b"id, answer ,question\n1,Yes,Open on Sunday?\n";

        let entries = parse_faqs(payload, FaqFormat::Csv).unwrap();
        assert_eq!(entries, vec![FaqEntry::new("Open on Sunday?", "Yes")]);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_faqs(b"Question,Reply\nQ,A\n", FaqFormat::Csv).unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingColumn("Answer")));
    }

    #[test]
    fn test_parse_csv_header_only() {
        assert!(matches!(
            parse_faqs(b"Question,Answer\n", FaqFormat::Csv),
            Err(KnowledgeError::EmptyUpload)
        ));
    }

    #[test]
    fn test_parse_csv_ragged_row() {
        let err = parse_faqs(b"Question,Answer\nQ,A,extra\n", FaqFormat::Csv).unwrap_err();
        assert!(matches!(err, KnowledgeError::Csv(_)));
    }

    #[test]
    fn test_blank_payload() {
        assert!(matches!(
            parse_faqs(b"  \n", FaqFormat::Csv),
            Err(KnowledgeError::EmptyUpload)
        ));
    }
}
