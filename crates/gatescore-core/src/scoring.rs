//! Marking scheme.
//!
//! Every question is classified independently:
//!
//! | Type | Correct | Wrong | Unanswered |
//! |------|---------|-------|------------|
//! | MCQ  | +max    | -max/3 | 0 |
//! | MSQ  | +max    | 0     | 0 |
//! | NAT  | +max    | 0     | 0 |
//!
//! MSQ is all-or-nothing. NAT accepts an inclusive range or a single value
//! within the layout's tolerance.

use crate::answer_key::AnswerKey;
use crate::error::{Document, ParseError};
use crate::layout::ExamLayout;
use crate::model::{
    canonical_choice_set, CanonicalAnswer, ExamReport, ExamSummary, NatKey, Outcome, ScoredRow,
    Section,
};
use crate::response::{ResponseSheet, NO_SELECTION};

/// Parse a numeric string the way a candidate or key would write it.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Check a NAT response against its key. Never fails: unparsable text on
/// either side is simply not a match.
pub fn nat_matches(given: &str, key: &NatKey, tolerance: f64) -> bool {
    let Some(value) = parse_number(given) else {
        return false;
    };
    match key {
        NatKey::Range { low, high } => match (parse_number(low), parse_number(high)) {
            (Some(low), Some(high)) => low <= value && value <= high,
            _ => false,
        },
        NatKey::Exact(target) => {
            parse_number(target).is_some_and(|target| (value - target).abs() < tolerance)
        }
    }
}

/// Whether a resolved answer matches the key.
pub fn is_correct(answer: &str, key: &CanonicalAnswer, layout: &ExamLayout) -> bool {
    match key {
        CanonicalAnswer::Mcq(letter) => answer.trim().eq_ignore_ascii_case(letter),
        CanonicalAnswer::Msq(letters) => canonical_choice_set(answer.split(',')) == *letters,
        CanonicalAnswer::Nat(nat) => nat_matches(answer, nat, layout.nat_tolerance),
    }
}

/// Marks for one answered question.
fn marks_for(key: &CanonicalAnswer, correct: bool, max_marks: u32, layout: &ExamLayout) -> f64 {
    match (correct, key) {
        (true, _) => f64::from(max_marks),
        (false, CanonicalAnswer::Mcq(_)) => -layout.mcq_penalty(max_marks),
        (false, _) => 0.0,
    }
}

/// Score one question.
pub fn score_question(
    qnum: u32,
    key: &CanonicalAnswer,
    answer: Option<&str>,
    layout: &ExamLayout,
) -> ScoredRow {
    let max_marks = layout.max_marks(qnum);
    let key_answer = key.to_string();

    let (outcome, earned) = match answer {
        None => (Outcome::Unanswered, 0.0),
        Some(answer) => {
            let correct = is_correct(answer, key, layout);
            let outcome = if correct {
                Outcome::Correct
            } else {
                Outcome::Wrong
            };
            (outcome, marks_for(key, correct, max_marks, layout))
        }
    };

    let your_answer = answer.unwrap_or(NO_SELECTION).to_string();
    let status = match outcome {
        Outcome::Wrong => format!("WRONG (yours: {your_answer}, key: {key_answer})"),
        other => other.to_string(),
    };

    ScoredRow {
        qnum,
        section: layout.section(qnum),
        qtype: key.question_type(),
        max_marks,
        your_answer,
        key_answer,
        earned,
        outcome,
        status,
    }
}

/// Roll rows up into section totals and outcome counts.
pub fn summarize(rows: &[ScoredRow], layout: &ExamLayout) -> ExamSummary {
    let mut summary = ExamSummary {
        ga_max: layout.section_max(Section::GeneralAptitude),
        da_max: layout.section_max(Section::Domain),
        total_max: layout.total_max(),
        ..Default::default()
    };

    for row in rows {
        summary.total_marks += row.earned;
        match row.section {
            Section::GeneralAptitude => summary.ga_marks += row.earned,
            Section::Domain => summary.da_marks += row.earned,
        }
        match row.outcome {
            Outcome::Correct => summary.correct += 1,
            Outcome::Wrong => summary.wrong += 1,
            Outcome::Unanswered => summary.unanswered += 1,
        }
    }

    summary
}

/// Join the key and the responses question by question and mark them.
///
/// Both inputs are complete by construction; a missing question can only
/// come from inputs built against different layouts.
pub fn evaluate(
    key: &AnswerKey,
    responses: &ResponseSheet,
    layout: &ExamLayout,
) -> Result<ExamReport, ParseError> {
    let mut results = Vec::with_capacity(layout.total_questions as usize);

    for qnum in layout.questions() {
        let answer = key.get(qnum).ok_or(ParseError::MissingQuestion {
            document: Document::AnswerKey,
            qnum,
        })?;
        let response = responses.get(qnum).ok_or(ParseError::MissingQuestion {
            document: Document::ResponseSheet,
            qnum,
        })?;

        if response.qtype != answer.question_type() {
            tracing::warn!(
                "question {qnum}: response sheet says {}, key says {}; marking as {}",
                response.qtype,
                answer.question_type(),
                answer.question_type()
            );
        }

        results.push(score_question(
            qnum,
            answer,
            response.selection.answer(),
            layout,
        ));
    }

    let summary = summarize(&results, layout);
    tracing::debug!(
        "scored {} questions: {:.2} / {:.2}",
        results.len(),
        summary.total_marks,
        summary.total_max
    );
    Ok(ExamReport { summary, results })
}
