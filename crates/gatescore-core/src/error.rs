//! Extraction and scoring error types.
//!
//! Only structural problems with a whole document surface here. Anomalies
//! confined to a single question (an unmapped option, a non-numeric NAT
//! answer) are absorbed into the data model instead.

use std::fmt;

use thiserror::Error;

/// Which input document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    AnswerKey,
    ResponseSheet,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::AnswerKey => write!(f, "answer key"),
            Document::ResponseSheet => write!(f, "response sheet"),
        }
    }
}

/// Errors that abort a whole scoring run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The key document did not yield one answer per question.
    #[error("parsed {found} answers from the answer key; expected {expected}")]
    IncompleteKey { found: usize, expected: usize },

    /// The response document did not yield one response per question.
    #[error("parsed {found} responses from the response sheet; expected {expected}")]
    IncompleteResponses { found: usize, expected: usize },

    /// A question number inside the layout has no entry.
    #[error("{document} has no entry for question {qnum}")]
    MissingQuestion { document: Document, qnum: u32 },

    /// A JSON answer key could not be decoded.
    #[error("invalid JSON answer key: {0}")]
    InvalidKeyJson(#[from] serde_json::Error),
}

impl ParseError {
    /// Returns the number of entries actually found, for count mismatches.
    pub fn found_count(&self) -> Option<usize> {
        match self {
            ParseError::IncompleteKey { found, .. }
            | ParseError::IncompleteResponses { found, .. } => Some(*found),
            _ => None,
        }
    }
}
