//! JSON-file leaderboard of submitted totals.
//!
//! One entry per candidate ID; re-scoring a candidate replaces their marks.
//! Ranks are 1-based positions in descending order of marks, ties broken by
//! candidate ID.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatescore_core::report::ScoreCard;
use gatescore_core::statistics::{histogram, MarksDistribution};

/// Histogram resolution used for leaderboard insights.
pub const HISTOGRAM_BINS: usize = 14;

/// One candidate's stored total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub candidate_id: String,
    pub marks: f64,
    pub updated_at: DateTime<Utc>,
}

/// Where a candidate stands after an upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub candidate_id: String,
    pub rank: usize,
    pub out_of: usize,
    pub distribution: MarksDistribution,
    pub histogram: Vec<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LeaderboardFile {
    #[serde(default)]
    entries: Vec<LeaderboardEntry>,
}

/// Leaderboard backed by a JSON file.
#[derive(Debug)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

/// Stored marks keep six decimals.
fn round_marks(marks: f64) -> f64 {
    (marks * 1e6).round() / 1e6
}

impl Leaderboard {
    /// Open a leaderboard file. A missing file is an empty leaderboard.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read leaderboard {}", path.display()))?;
            let file: LeaderboardFile = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse leaderboard {}", path.display()))?;
            file.entries
        } else {
            tracing::debug!("leaderboard {} does not exist yet", path.display());
            Vec::new()
        };

        let mut board = Self {
            path: path.to_path_buf(),
            entries,
        };
        board.sort();
        Ok(board)
    }

    /// Write the leaderboard back to its file.
    pub fn save(&self) -> Result<()> {
        let file = LeaderboardFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("failed to serialize leaderboard")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write leaderboard {}", self.path.display()))?;
        Ok(())
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            b.marks
                .total_cmp(&a.marks)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
    }

    /// Insert or replace a candidate's marks. Blank IDs are ignored.
    /// Returns whether the leaderboard changed.
    pub fn upsert(&mut self, candidate_id: &str, marks: f64) -> bool {
        let candidate_id = candidate_id.trim();
        if candidate_id.is_empty() {
            tracing::warn!("not recording marks without a candidate id");
            return false;
        }
        if !marks.is_finite() {
            tracing::warn!("not recording non-finite marks {marks} for {candidate_id}");
            return false;
        }
        let entry = LeaderboardEntry {
            candidate_id: candidate_id.to_string(),
            marks: round_marks(marks),
            updated_at: Utc::now(),
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.candidate_id == candidate_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.sort();
        true
    }

    /// Record a score card and return the candidate's standing.
    pub fn record(&mut self, card: &ScoreCard) -> Option<Standing> {
        let id = card.candidate.candidate_id.trim();
        if !self.upsert(id, card.report.summary.total_marks) {
            return None;
        }
        self.standing(id)
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based rank of a candidate.
    pub fn rank_of(&self, candidate_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.candidate_id == candidate_id.trim())
            .map(|i| i + 1)
    }

    pub fn marks(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.marks).collect()
    }

    pub fn distribution(&self) -> Option<MarksDistribution> {
        MarksDistribution::from_marks(&self.marks())
    }

    pub fn standing(&self, candidate_id: &str) -> Option<Standing> {
        let rank = self.rank_of(candidate_id)?;
        let marks = self.marks();
        Some(Standing {
            candidate_id: candidate_id.trim().to_string(),
            rank,
            out_of: self.entries.len(),
            distribution: MarksDistribution::from_marks(&marks)?,
            histogram: histogram(&marks, HISTOGRAM_BINS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_in(dir: &tempfile::TempDir) -> Leaderboard {
        Leaderboard::open(&dir.path().join("ranks.json")).unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let board = board_in(&dir);
        assert!(board.is_empty());
        assert!(board.distribution().is_none());
        assert_eq!(board.rank_of("anyone"), None);
    }

    #[test]
    fn upsert_replaces_and_ranks_descending() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_in(&dir);

        assert!(board.upsert("C1", 50.0));
        assert!(board.upsert("C2", 70.5));
        assert!(board.upsert("C3", 61.0));
        assert_eq!(board.rank_of("C2"), Some(1));
        assert_eq!(board.rank_of("C1"), Some(3));

        assert!(board.upsert("C1", 80.0));
        assert_eq!(board.len(), 3);
        assert_eq!(board.rank_of("C1"), Some(1));
        assert_eq!(board.rank_of("C3"), Some(3));
    }

    #[test]
    fn ties_are_broken_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_in(&dir);
        board.upsert("B", 40.0);
        board.upsert("A", 40.0);
        assert_eq!(board.rank_of("A"), Some(1));
        assert_eq!(board.rank_of("B"), Some(2));
    }

    #[test]
    fn blank_ids_and_non_finite_marks_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_in(&dir);
        assert!(!board.upsert("   ", 10.0));
        assert!(!board.upsert("C1", f64::NAN));
        assert!(!board.upsert("C1", f64::INFINITY));
        assert!(board.is_empty());
        assert!(board.upsert("C1", 10.0));
        assert!(!board.upsert("C1", f64::NEG_INFINITY));
        assert_eq!(board.marks(), vec![10.0]);
    }

    #[test]
    fn persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ranks.json");

        let mut board = Leaderboard::open(&path).unwrap();
        board.upsert("C1", 86.666_666_666_666_67);
        board.upsert("C2", 12.0);
        board.save().unwrap();

        let reopened = Leaderboard::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.entries()[0].candidate_id, "C1");
        assert_eq!(reopened.entries()[0].marks, 86.666667);
    }

    #[test]
    fn standing_includes_distribution() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_in(&dir);
        for (id, marks) in [("C1", 10.0), ("C2", 20.0), ("C3", 30.0), ("C4", 40.0)] {
            board.upsert(id, marks);
        }
        let standing = board.standing("C3").unwrap();
        assert_eq!(standing.rank, 2);
        assert_eq!(standing.out_of, 4);
        assert_eq!(standing.distribution.mean, 25.0);
        assert_eq!(standing.histogram.len(), HISTOGRAM_BINS);
        assert_eq!(standing.histogram.iter().sum::<usize>(), 4);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranks.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Leaderboard::open(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse leaderboard"));
    }
}
