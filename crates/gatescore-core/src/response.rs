//! Response sheet extractor.
//!
//! The exported response sheet is one (often minified) HTML document with a
//! `question-pnl` block per question. Blocks are cut at their start markers
//! rather than parsed as a tree, and each field inside a block is recovered
//! by its own extractor so a missing field only affects that block.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Document, ParseError};
use crate::layout::ExamLayout;
use crate::model::{
    canonical_choice_set, CandidateMeta, CandidateResponse, QuestionType, Selection,
};
use crate::options::OptionMap;

/// Marker the portal uses for "nothing chosen".
pub const NO_SELECTION: &str = "--";

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div class="question-pnl"[^>]*>"#).expect("valid block marker regex")
});

static FIRST_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]*name="([^"]+)"[^>]*>"#).expect("valid image regex")
});

static DOMAIN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)daq(\d+)q(?:v\d+)?\.png$").expect("valid domain image regex")
});

static APTITUDE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ga\d*q(\d+)q(?:v\d+)?\.png$").expect("valid aptitude image regex")
});

static QUESTION_TYPE: LazyLock<Regex> = LazyLock::new(|| field_regex("Question Type", "MCQ|MSQ|NAT"));
static STATUS: LazyLock<Regex> = LazyLock::new(|| field_regex("Status", "[^<]+?"));
static CHOSEN_OPTION: LazyLock<Regex> = LazyLock::new(|| field_regex("Chosen Option", "[^<]+?"));
static GIVEN_ANSWER: LazyLock<Regex> = LazyLock::new(|| field_regex("Given Answer", "[^<]+?"));

/// `<label> :</td><td ...> value </td>` rows of the per-question menu table.
fn field_regex(label: &str, value: &str) -> Regex {
    Regex::new(&format!(
        r"(?i){}\s*:</td>\s*<td[^>]*>\s*({value})\s*</td>",
        regex::escape(label)
    ))
    .expect("valid field regex")
}

/// All attributed responses of one candidate, keyed by question number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSheet {
    responses: BTreeMap<u32, CandidateResponse>,
}

impl ResponseSheet {
    /// Build a sheet from explicit entries, enforcing the layout's completeness.
    pub fn from_entries(
        responses: BTreeMap<u32, CandidateResponse>,
        layout: &ExamLayout,
    ) -> Result<Self, ParseError> {
        layout.ensure_complete(&responses, Document::ResponseSheet)?;
        Ok(Self { responses })
    }

    pub fn get(&self, qnum: u32) -> Option<&CandidateResponse> {
        self.responses.get(&qnum)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CandidateResponse)> {
        self.responses.iter().map(|(q, r)| (*q, r))
    }

    /// Number of questions with a resolved selection.
    pub fn attempted(&self) -> usize {
        self.responses
            .values()
            .filter(|r| !r.selection.is_absent())
            .count()
    }
}

/// Split the document into question blocks, marker to marker.
pub fn question_blocks(html: &str) -> Vec<&str> {
    let starts: Vec<usize> = BLOCK_START.find_iter(html).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            &html[start..end]
        })
        .collect()
}

/// Question number encoded in a question image filename.
pub fn question_number_from_image(name: &str) -> Option<u32> {
    DOMAIN_IMAGE
        .captures(name)
        .or_else(|| APTITUDE_IMAGE.captures(name))
        .and_then(|caps| caps[1].parse().ok())
}

fn capture_field(re: &Regex, block: &str) -> Option<String> {
    re.captures(block).map(|caps| caps[1].trim().to_string())
}

/// Resolve a chosen-option field through the block's option map.
fn resolve_choice(qtype: QuestionType, chosen: &str, options: &OptionMap) -> Selection {
    let mapped: Vec<String> = chosen
        .split(',')
        .filter(|label| !label.trim().is_empty())
        .filter_map(|label| options.resolve_label(label))
        .map(String::from)
        .collect();

    if mapped.is_empty() {
        return Selection::Absent;
    }

    match qtype {
        QuestionType::Mcq => Selection::Resolved(mapped[0].clone()),
        _ => Selection::Resolved(canonical_choice_set(&mapped)),
    }
}

/// Extract one question block. `None` if the block cannot be attributed.
pub fn extract_block(block: &str) -> Option<(u32, CandidateResponse)> {
    let image = FIRST_IMAGE.captures(block)?;
    let Some(qnum) = question_number_from_image(&image[1]) else {
        tracing::debug!("unrecognized question image {}", &image[1]);
        return None;
    };

    let Some(qtype) = capture_field(&QUESTION_TYPE, block).and_then(|t| t.parse().ok()) else {
        tracing::debug!("question {qnum}: no question type, skipping block");
        return None;
    };
    let status = capture_field(&STATUS, block).unwrap_or_default();

    let selection = match qtype {
        QuestionType::Mcq | QuestionType::Msq => {
            match capture_field(&CHOSEN_OPTION, block) {
                Some(chosen) if chosen != NO_SELECTION => {
                    let options = OptionMap::from_block(block);
                    let selection = resolve_choice(qtype, &chosen, &options);
                    if selection.is_absent() {
                        tracing::debug!(
                            "question {qnum}: chosen option {chosen} not in option map ({} rows)",
                            options.len()
                        );
                    }
                    selection
                }
                _ => Selection::Absent,
            }
        }
        QuestionType::Nat => match capture_field(&GIVEN_ANSWER, block) {
            Some(given) if given != NO_SELECTION => Selection::Resolved(given),
            _ => Selection::Absent,
        },
    };

    Some((
        qnum,
        CandidateResponse {
            qtype,
            selection,
            status,
        },
    ))
}

/// Extract every question of a response sheet.
pub fn parse_response_sheet(html: &str, layout: &ExamLayout) -> Result<ResponseSheet, ParseError> {
    let blocks = question_blocks(html);
    let mut responses = BTreeMap::new();

    for (idx, block) in blocks.iter().enumerate() {
        let Some((qnum, response)) = extract_block(block) else {
            tracing::debug!("skipping block {idx}: not attributable to a question");
            continue;
        };
        if responses.insert(qnum, response).is_some() {
            tracing::warn!("question {qnum} appears in more than one block, keeping the last");
        }
    }

    tracing::debug!(
        "attributed {} of {} question blocks",
        responses.len(),
        blocks.len()
    );
    ResponseSheet::from_entries(responses, layout)
}

/// Value of a `<td>label</td><td>value</td>` row anywhere in the document.
fn labelled_cell(html: &str, label: &str) -> String {
    let pattern = format!(
        r"(?i){}\s*</td>\s*<td[^>]*>\s*([^<]+?)\s*</td>",
        regex::escape(label)
    );
    Regex::new(&pattern)
        .ok()
        .and_then(|re| capture_field(&re, html))
        .unwrap_or_default()
}

/// Candidate details from the sheet header. Missing rows become empty strings.
pub fn parse_candidate_meta(html: &str) -> CandidateMeta {
    CandidateMeta {
        candidate_id: labelled_cell(html, "Candidate ID"),
        candidate_name: labelled_cell(html, "Candidate Name"),
        test_date: labelled_cell(html, "Test Date"),
        subject: labelled_cell(html, "Subject"),
    }
}
