//! CSV export of the per-question table.

use std::path::Path;

use anyhow::{Context, Result};

use gatescore_core::model::ExamReport;

pub const CSV_HEADER: [&str; 8] = [
    "Q#",
    "Section",
    "Type",
    "Max",
    "Your Answer",
    "Key",
    "Earned",
    "Status",
];

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = fields
        .into_iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Render the results table. Earned marks are signed with two decimals.
pub fn generate_csv(report: &ExamReport) -> String {
    let mut out = csv_line(CSV_HEADER);
    for row in &report.results {
        out.push_str(&csv_line([
            row.qnum.to_string(),
            row.section.to_string(),
            row.qtype.to_string(),
            row.max_marks.to_string(),
            row.your_answer.clone(),
            row.key_answer.clone(),
            format!("{:+.2}", row.earned),
            row.status.clone(),
        ]));
    }
    out
}

/// Write the CSV export to a file.
pub fn write_csv_report(report: &ExamReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_csv(report))
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatescore_core::model::{ExamSummary, Outcome, QuestionType, ScoredRow, Section};

    fn report() -> ExamReport {
        ExamReport {
            summary: ExamSummary::default(),
            results: vec![
                ScoredRow {
                    qnum: 2,
                    section: Section::GeneralAptitude,
                    qtype: QuestionType::Mcq,
                    max_marks: 1,
                    your_answer: "A".into(),
                    key_answer: "C".into(),
                    earned: -1.0 / 3.0,
                    outcome: Outcome::Wrong,
                    status: "WRONG (yours: A, key: C)".into(),
                },
                ScoredRow {
                    qnum: 28,
                    section: Section::Domain,
                    qtype: QuestionType::Msq,
                    max_marks: 1,
                    your_answer: "A,C".into(),
                    key_answer: "A,C".into(),
                    earned: 1.0,
                    outcome: Outcome::Correct,
                    status: "CORRECT".into(),
                },
            ],
        }
    }

    #[test]
    fn header_and_rows() {
        let csv = generate_csv(&report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Q#,Section,Type,Max,Your Answer,Key,Earned,Status");
        assert_eq!(lines[1], "2,GA,MCQ,1,A,C,-0.33,\"WRONG (yours: A, key: C)\"");
        assert_eq!(lines[2], "28,DA,MSQ,1,\"A,C\",\"A,C\",+1.00,CORRECT");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn zero_is_signed() {
        let mut r = report();
        r.results[1].earned = 0.0;
        assert!(generate_csv(&r).contains(",+0.00,"));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.csv");
        write_csv_report(&report(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Q#,"));
    }
}
