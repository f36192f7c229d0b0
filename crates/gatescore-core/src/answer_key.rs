//! Answer key parser.
//!
//! Reads the text rendering of the official key (one
//! `<qnum> <TYPE> <SECTION> <answer>` line per question, surrounded by page
//! furniture) or a JSON key previously exported by gatescore.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Document, ParseError};
use crate::layout::ExamLayout;
use crate::model::{canonical_choice_set, CanonicalAnswer, NatKey, QuestionType};

static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+(MCQ|MSQ|NAT)\s+(GA|DA)\s+(.+?)\s*$").expect("valid key line regex")
});

static NAT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([-+]?\d*\.?\d+)\s*to\s*([-+]?\d*\.?\d+)$").expect("valid NAT range regex")
});

/// A complete answer key: one canonical answer per question number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    answers: BTreeMap<u32, CanonicalAnswer>,
}

impl AnswerKey {
    /// Build a key from explicit entries, enforcing the layout's completeness.
    pub fn from_entries(
        answers: BTreeMap<u32, CanonicalAnswer>,
        layout: &ExamLayout,
    ) -> Result<Self, ParseError> {
        layout.ensure_complete(&answers, Document::AnswerKey)?;
        Ok(Self { answers })
    }

    pub fn get(&self, qnum: u32) -> Option<&CanonicalAnswer> {
        self.answers.get(&qnum)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Entries in question order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &CanonicalAnswer)> {
        self.answers.iter().map(|(q, a)| (*q, a))
    }

    /// Number of questions of each type.
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for answer in self.answers.values() {
            *counts
                .entry(answer.question_type().to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}

/// Normalize the answer column of a key line for the given question type.
pub fn normalize_key_answer(qtype: QuestionType, raw: &str) -> CanonicalAnswer {
    let raw = raw.trim();
    match qtype {
        QuestionType::Mcq => CanonicalAnswer::Mcq(raw.to_uppercase()),
        QuestionType::Msq => CanonicalAnswer::Msq(canonical_choice_set(raw.split([';', ',']))),
        QuestionType::Nat => match NAT_RANGE.captures(raw) {
            Some(caps) => CanonicalAnswer::Nat(NatKey::Range {
                low: caps[1].to_string(),
                high: caps[2].to_string(),
            }),
            None => CanonicalAnswer::Nat(NatKey::Exact(raw.to_string())),
        },
    }
}

/// Parse one key line. Returns `None` for lines outside the grammar.
fn parse_key_line(line: &str) -> Option<(u32, CanonicalAnswer)> {
    let caps = KEY_LINE.captures(line)?;
    let qnum = caps[1].parse::<u32>().ok()?;
    let qtype = caps[2].parse::<QuestionType>().ok()?;
    Some((qnum, normalize_key_answer(qtype, &caps[4])))
}

/// Parse the text rendering of an answer key.
///
/// Lines that do not match the key grammar (headers, page numbers) are
/// skipped. The result must cover every question in the layout.
pub fn parse_answer_key(text: &str, layout: &ExamLayout) -> Result<AnswerKey, ParseError> {
    let mut answers = BTreeMap::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((qnum, answer)) = parse_key_line(line) else {
            tracing::trace!("skipping key line: {}", line.trim());
            continue;
        };
        if let Some(previous) = answers.insert(qnum, answer) {
            tracing::warn!("question {qnum} appears twice in the key, replacing {previous}");
        }
    }

    tracing::debug!("parsed {} key lines", answers.len());
    AnswerKey::from_entries(answers, layout)
}

/// Bring a deserialized answer into canonical form.
///
/// JSON keys may be hand-edited, so MSQ sets and `to` ranges get the same
/// treatment as the text grammar.
fn renormalize(answer: CanonicalAnswer) -> CanonicalAnswer {
    match answer {
        CanonicalAnswer::Mcq(letter) => normalize_key_answer(QuestionType::Mcq, &letter),
        CanonicalAnswer::Msq(letters) => normalize_key_answer(QuestionType::Msq, &letters),
        CanonicalAnswer::Nat(NatKey::Exact(value)) => {
            normalize_key_answer(QuestionType::Nat, &value)
        }
        range @ CanonicalAnswer::Nat(NatKey::Range { .. }) => range,
    }
}

/// Parse a JSON key as written by [`AnswerKey`]'s `Serialize` impl.
pub fn parse_answer_key_json(json: &str, layout: &ExamLayout) -> Result<AnswerKey, ParseError> {
    let answers: BTreeMap<u32, CanonicalAnswer> = serde_json::from_str(json)?;
    let answers = answers
        .into_iter()
        .map(|(qnum, answer)| (qnum, renormalize(answer)))
        .collect();
    AnswerKey::from_entries(answers, layout)
}

/// Parse a key document in either supported format.
///
/// A document whose first non-blank character is `{` is treated as JSON.
pub fn parse_answer_key_document(
    text: &str,
    layout: &ExamLayout,
) -> Result<AnswerKey, ParseError> {
    if text.trim_start().starts_with('{') {
        parse_answer_key_json(text, layout)
    } else {
        parse_answer_key(text, layout)
    }
}
