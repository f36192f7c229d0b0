//! Score cards with JSON persistence and change detection.
//!
//! A [`ScoreCard`] is what `gatescore score` saves: the candidate details and
//! the full per-question report. Two cards for the same response sheet can be
//! compared to see the effect of a revised answer key.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CandidateMeta, ExamReport, Outcome};

/// A scored response sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Unique card identifier.
    pub id: Uuid,
    /// When the card was produced.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub candidate: CandidateMeta,
    pub report: ExamReport,
}

impl ScoreCard {
    pub fn new(candidate: CandidateMeta, report: ExamReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            candidate,
            report,
        }
    }

    /// Save the card as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize score card")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write score card to {}", path.display()))?;
        Ok(())
    }

    /// Load a card from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read score card from {}", path.display()))?;
        let card: ScoreCard =
            serde_json::from_str(&content).context("failed to parse score card JSON")?;
        Ok(card)
    }

    /// Compare this card against a baseline, question by question.
    pub fn compare(&self, baseline: &ScoreCard) -> ScoreDiff {
        let mut changes = Vec::new();
        let mut unchanged = 0usize;
        let mut only_in_current = 0usize;

        for current in &self.report.results {
            let Some(before) = baseline.report.row(current.qnum) else {
                only_in_current += 1;
                continue;
            };
            let delta = current.earned - before.earned;
            if before.outcome != current.outcome || delta.abs() > f64::EPSILON {
                changes.push(RowChange {
                    qnum: current.qnum,
                    baseline_outcome: before.outcome,
                    current_outcome: current.outcome,
                    baseline_earned: before.earned,
                    current_earned: current.earned,
                    delta,
                });
            } else {
                unchanged += 1;
            }
        }

        let only_in_baseline = baseline
            .report
            .results
            .iter()
            .filter(|r| self.report.row(r.qnum).is_none())
            .count();

        ScoreDiff {
            baseline_total: baseline.report.summary.total_marks,
            current_total: self.report.summary.total_marks,
            total_delta: self.report.summary.total_marks - baseline.report.summary.total_marks,
            changes,
            unchanged,
            only_in_current,
            only_in_baseline,
        }
    }
}

/// Result of comparing two score cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDiff {
    pub baseline_total: f64,
    pub current_total: f64,
    pub total_delta: f64,
    /// Questions whose outcome or marks moved.
    pub changes: Vec<RowChange>,
    pub unchanged: usize,
    pub only_in_current: usize,
    pub only_in_baseline: usize,
}

/// A question whose marking differs between two cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowChange {
    pub qnum: u32,
    pub baseline_outcome: Outcome,
    pub current_outcome: Outcome,
    pub baseline_earned: f64,
    pub current_earned: f64,
    pub delta: f64,
}

impl ScoreDiff {
    /// Format the diff as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Total:** {:.2} -> {:.2} ({:+.2}), {} changed, {} unchanged\n\n",
            self.baseline_total,
            self.current_total,
            self.total_delta,
            self.changes.len(),
            self.unchanged
        ));

        if !self.changes.is_empty() {
            md.push_str("### Changed questions\n\n");
            md.push_str("| Q# | Baseline | Current | Delta |\n");
            md.push_str("|----|----------|---------|-------|\n");
            for c in &self.changes {
                md.push_str(&format!(
                    "| {} | {} ({:+.2}) | {} ({:+.2}) | {:+.2} |\n",
                    c.qnum,
                    c.baseline_outcome,
                    c.baseline_earned,
                    c.current_outcome,
                    c.current_earned,
                    c.delta
                ));
            }
        }

        md
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}
