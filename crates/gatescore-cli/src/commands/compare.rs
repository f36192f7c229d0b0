//! The `gatescore compare` command.

use std::path::PathBuf;

use anyhow::Result;

use gatescore_core::report::ScoreCard;

pub fn execute(baseline_path: PathBuf, current_path: PathBuf, format: String) -> Result<()> {
    let baseline = ScoreCard::load_json(&baseline_path)?;
    let current = ScoreCard::load_json(&current_path)?;

    if baseline.candidate.candidate_id != current.candidate.candidate_id {
        tracing::warn!(
            "comparing different candidates: {} vs {}",
            baseline.candidate.candidate_id,
            current.candidate.candidate_id
        );
    }

    let diff = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", diff.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        _ => {
            println!(
                "Total: {:.2} -> {:.2} ({:+.2})",
                diff.baseline_total, diff.current_total, diff.total_delta
            );
            println!(
                "Comparison: {} changed, {} unchanged",
                diff.changes.len(),
                diff.unchanged
            );

            if diff.has_changes() {
                println!("\nChanged:");
                for c in &diff.changes {
                    println!(
                        "  Q{} {} {:+.2} -> {} {:+.2} ({:+.2})",
                        c.qnum,
                        c.baseline_outcome,
                        c.baseline_earned,
                        c.current_outcome,
                        c.current_earned,
                        c.delta
                    );
                }
            }

            if diff.only_in_current > 0 {
                println!("\n{} question(s) only in current", diff.only_in_current);
            }
            if diff.only_in_baseline > 0 {
                println!("{} question(s) only in baseline", diff.only_in_baseline);
            }
        }
    }

    Ok(())
}
