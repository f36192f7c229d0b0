//! Exam layout: question count, sections, mark bands and tolerances.
//!
//! The defaults describe the fixed 65-question paper (10 general-aptitude
//! questions followed by 55 domain questions). They are kept as named
//! fields so the constants have one home and can be read from config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Document, ParseError};
use crate::model::Section;

/// A contiguous run of question numbers sharing the same maximum marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkBand {
    /// First question number in the band (inclusive).
    pub first: u32,
    /// Last question number in the band (inclusive).
    pub last: u32,
    /// Marks awarded for a correct answer.
    pub marks: u32,
}

/// Exam-specific constants used by extraction and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamLayout {
    /// Number of questions on the paper.
    #[serde(default = "default_total_questions")]
    pub total_questions: u32,
    /// Questions `1..=general_aptitude_questions` form the GA section.
    #[serde(default = "default_general_aptitude_questions")]
    pub general_aptitude_questions: u32,
    /// A single-valued NAT answer is correct when strictly closer than this.
    #[serde(default = "default_nat_tolerance")]
    pub nat_tolerance: f64,
    /// A wrong MCQ costs `max_marks / mcq_penalty_divisor`.
    #[serde(default = "default_mcq_penalty_divisor")]
    pub mcq_penalty_divisor: f64,
    /// Maximum marks by position.
    #[serde(default = "default_mark_bands")]
    pub mark_bands: Vec<MarkBand>,
}

fn default_total_questions() -> u32 {
    65
}

fn default_general_aptitude_questions() -> u32 {
    10
}

fn default_nat_tolerance() -> f64 {
    0.01
}

fn default_mcq_penalty_divisor() -> f64 {
    3.0
}

fn default_mark_bands() -> Vec<MarkBand> {
    vec![
        MarkBand {
            first: 1,
            last: 5,
            marks: 1,
        },
        MarkBand {
            first: 6,
            last: 10,
            marks: 2,
        },
        MarkBand {
            first: 11,
            last: 35,
            marks: 1,
        },
        MarkBand {
            first: 36,
            last: 65,
            marks: 2,
        },
    ]
}

impl Default for ExamLayout {
    fn default() -> Self {
        Self {
            total_questions: default_total_questions(),
            general_aptitude_questions: default_general_aptitude_questions(),
            nat_tolerance: default_nat_tolerance(),
            mcq_penalty_divisor: default_mcq_penalty_divisor(),
            mark_bands: default_mark_bands(),
        }
    }
}

impl ExamLayout {
    /// All question numbers, in order.
    pub fn questions(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.total_questions
    }

    /// Maximum marks for a question. Numbers outside every band are worth 0.
    pub fn max_marks(&self, qnum: u32) -> u32 {
        self.mark_bands
            .iter()
            .find(|band| (band.first..=band.last).contains(&qnum))
            .map(|band| band.marks)
            .unwrap_or(0)
    }

    /// Section a question belongs to.
    pub fn section(&self, qnum: u32) -> Section {
        if qnum <= self.general_aptitude_questions {
            Section::GeneralAptitude
        } else {
            Section::Domain
        }
    }

    /// Sum of maximum marks over one section.
    pub fn section_max(&self, section: Section) -> f64 {
        self.questions()
            .filter(|&q| self.section(q) == section)
            .map(|q| f64::from(self.max_marks(q)))
            .sum()
    }

    /// Sum of maximum marks over the whole paper.
    pub fn total_max(&self) -> f64 {
        self.questions().map(|q| f64::from(self.max_marks(q))).sum()
    }

    /// Marks lost for a wrong MCQ worth `max_marks`.
    pub fn mcq_penalty(&self, max_marks: u32) -> f64 {
        f64::from(max_marks) / self.mcq_penalty_divisor
    }

    /// Check that a mapping holds exactly one entry per question number.
    pub fn ensure_complete<V>(
        &self,
        entries: &BTreeMap<u32, V>,
        document: Document,
    ) -> Result<(), ParseError> {
        let expected = self.total_questions as usize;
        if entries.len() != expected {
            return Err(match document {
                Document::AnswerKey => ParseError::IncompleteKey {
                    found: entries.len(),
                    expected,
                },
                Document::ResponseSheet => ParseError::IncompleteResponses {
                    found: entries.len(),
                    expected,
                },
            });
        }

        if let Some(qnum) = self.questions().find(|q| !entries.contains_key(q)) {
            return Err(ParseError::MissingQuestion { document, qnum });
        }

        Ok(())
    }
}
