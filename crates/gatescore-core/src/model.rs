//! Core data model types for gatescore.
//!
//! Answers, candidate responses and the scored report shared by the parsers,
//! the marking engine and the report writers.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Question format. Selects both the extraction rule and the marking rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    /// Single-answer multiple choice.
    Mcq,
    /// Multi-select, graded all-or-nothing.
    Msq,
    /// Numeric answer, exact (with tolerance) or range.
    Nat,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "MCQ"),
            QuestionType::Msq => write!(f, "MSQ"),
            QuestionType::Nat => write!(f, "NAT"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MCQ" => Ok(QuestionType::Mcq),
            "MSQ" => Ok(QuestionType::Msq),
            "NAT" => Ok(QuestionType::Nat),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Paper section used for subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "GA")]
    GeneralAptitude,
    #[serde(rename = "DA")]
    Domain,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::GeneralAptitude => write!(f, "GA"),
            Section::Domain => write!(f, "DA"),
        }
    }
}

/// Key value for a numeric-answer question.
///
/// Bounds are kept as text; they are parsed only when marking so a
/// malformed key value is a non-match rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NatKey {
    /// A single target value.
    Exact(String),
    /// An inclusive range, encoded `low:high`.
    Range { low: String, high: String },
}

impl From<String> for NatKey {
    fn from(s: String) -> Self {
        match s.split_once(':') {
            Some((low, high)) => NatKey::Range {
                low: low.trim().to_string(),
                high: high.trim().to_string(),
            },
            None => NatKey::Exact(s.trim().to_string()),
        }
    }
}

impl From<NatKey> for String {
    fn from(key: NatKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for NatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatKey::Exact(value) => write!(f, "{value}"),
            NatKey::Range { low, high } => write!(f, "{low}:{high}"),
        }
    }
}

/// The official answer for one question, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "answer", rename_all = "UPPERCASE")]
pub enum CanonicalAnswer {
    /// One uppercase option letter.
    Mcq(String),
    /// Sorted, duplicate-free, comma-joined option letters.
    Msq(String),
    Nat(NatKey),
}

impl CanonicalAnswer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            CanonicalAnswer::Mcq(_) => QuestionType::Mcq,
            CanonicalAnswer::Msq(_) => QuestionType::Msq,
            CanonicalAnswer::Nat(_) => QuestionType::Nat,
        }
    }
}

impl fmt::Display for CanonicalAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalAnswer::Mcq(letter) => write!(f, "{letter}"),
            CanonicalAnswer::Msq(letters) => write!(f, "{letters}"),
            CanonicalAnswer::Nat(key) => write!(f, "{key}"),
        }
    }
}

/// Canonical encoding of a set of option letters: trimmed, uppercased,
/// deduplicated, sorted and joined with commas.
pub fn canonical_choice_set<I, S>(letters: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    letters
        .into_iter()
        .map(|l| l.as_ref().trim().to_uppercase())
        .filter(|l| !l.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(",")
}

/// What the candidate ended up selecting for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing selected, or the selection could not be resolved.
    Absent,
    /// Canonical answer text (option letters, or the raw NAT entry).
    Resolved(String),
}

impl Selection {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Selection::Absent => None,
            Selection::Resolved(value) => Some(value),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Selection::Absent)
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) => Selection::Resolved(v),
            None => Selection::Absent,
        }
    }
}

/// A candidate's response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResponse {
    /// Type declared by the response sheet.
    pub qtype: QuestionType,
    pub selection: Selection,
    /// Free-text status shown by the exam portal (e.g. "Answered").
    #[serde(default)]
    pub status: String,
}

/// Candidate details printed at the top of a response sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMeta {
    #[serde(default)]
    pub candidate_id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub test_date: String,
    #[serde(default)]
    pub subject: String,
}

/// Marking outcome for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Correct,
    Wrong,
    Unanswered,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "CORRECT"),
            Outcome::Wrong => write!(f, "WRONG"),
            Outcome::Unanswered => write!(f, "UNANSWERED"),
        }
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub qnum: u32,
    pub section: Section,
    pub qtype: QuestionType,
    pub max_marks: u32,
    /// Candidate's canonical answer, or `--` when absent.
    pub your_answer: String,
    pub key_answer: String,
    /// Signed marks awarded. Not rounded.
    pub earned: f64,
    pub outcome: Outcome,
    /// Human-readable status, e.g. `WRONG (yours: B, key: A)`.
    pub status: String,
}

/// Aggregate marks and counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub ga_marks: f64,
    pub da_marks: f64,
    pub total_marks: f64,
    pub ga_max: f64,
    pub da_max: f64,
    pub total_max: f64,
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
}

/// The scored exam: summary plus one row per question in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamReport {
    pub summary: ExamSummary,
    pub results: Vec<ScoredRow>,
}

impl ExamReport {
    /// Look up the row for a question number.
    pub fn row(&self, qnum: u32) -> Option<&ScoredRow> {
        self.results.iter().find(|r| r.qnum == qnum)
    }
}
