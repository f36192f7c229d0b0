//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const KEY: &str = "../../fixtures/answer-key.txt";
const SHEET: &str = "../../fixtures/response.html";

fn gatescore() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("gatescore").unwrap()
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|x| x == ext))
        .collect()
}

/// Score the fixture sheet against `key` and return the saved JSON card.
fn save_card(key: &str, output: &Path) -> PathBuf {
    gatescore()
        .args(["score", "--answer-key", key, "--response", SHEET])
        .args(["--format", "json", "--output"])
        .arg(output)
        .assert()
        .success();
    let cards = files_with_extension(output, "json");
    assert_eq!(cards.len(), 1);
    cards.into_iter().next().unwrap()
}

#[test]
fn score_prints_summary() {
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET])
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate: Asha Verma (DA26S86201284)"))
        .stdout(predicate::str::contains("GA Marks:    +11.67 / 15.00"))
        .stdout(predicate::str::contains("DA Marks:    +75.00 / 85.00"))
        .stdout(predicate::str::contains("TOTAL:       +86.67 / 100.00"))
        .stdout(predicate::str::contains("Correct:     56"))
        .stdout(predicate::str::contains("Wrong:       6"))
        .stdout(predicate::str::contains("Unanswered:  3"))
        .stdout(predicate::str::contains("WRONG (yours: A, key: C)"))
        .stderr(predicate::str::contains("Scored: 56 correct"));
}

#[test]
fn score_writes_all_formats() {
    let out = TempDir::new().unwrap();
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET])
        .args(["--format", "all", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL:"));

    for ext in ["json", "csv", "html"] {
        let files = files_with_extension(out.path(), ext);
        assert_eq!(files.len(), 1, "expected one .{ext} file");
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("DA26S86201284-"), "{name}");
    }

    let csv = std::fs::read_to_string(&files_with_extension(out.path(), "csv")[0]).unwrap();
    assert!(csv.contains(r#"2,GA,MCQ,1,A,C,-0.33,"WRONG (yours: A, key: C)""#));
}

#[test]
fn score_json_only_prints_no_table() {
    let out = TempDir::new().unwrap();
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET])
        .args(["--format", "json", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL:").not())
        .stderr(predicate::str::contains("Score card saved to:"));
}

#[test]
fn score_records_leaderboard_rank() {
    let dir = TempDir::new().unwrap();
    let board = dir.path().join("ranks.json");

    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET, "--leaderboard"])
        .arg(&board)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rank:        1 of 1"));

    // rescoring the same candidate replaces the entry
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET, "--leaderboard"])
        .arg(&board)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rank:        1 of 1"));

    assert!(board.exists());
}

#[test]
fn score_without_key_fails() {
    let dir = TempDir::new().unwrap();
    gatescore()
        .current_dir(dir.path())
        .args(["score", "--response"])
        .arg(Path::new(env!("CARGO_MANIFEST_DIR")).join(SHEET))
        .env("HOME", dir.path())
        .env_remove("GATESCORE_ANSWER_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: no answer key given"));
}

#[test]
fn score_key_from_environment() {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let dir = TempDir::new().unwrap();
    gatescore()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("GATESCORE_ANSWER_KEY", manifest.join(KEY))
        .args(["score", "--response"])
        .arg(manifest.join(SHEET))
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL:       +86.67 / 100.00"));
}

#[test]
fn score_unknown_format_fails() {
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", SHEET])
        .args(["--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'sarif'"));
}

#[test]
fn score_missing_response_fails() {
    gatescore()
        .args(["score", "--answer-key", KEY, "--response", "nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.html"));
}

#[test]
fn score_truncated_sheet_fails() {
    let dir = TempDir::new().unwrap();
    let sheet = std::fs::read_to_string(SHEET).unwrap();
    let cut = sheet.rfind("<div class=\"question-pnl\"").unwrap();
    let truncated = dir.path().join("truncated.html");
    std::fs::write(&truncated, &sheet[..cut]).unwrap();

    gatescore()
        .args(["score", "--answer-key", KEY, "--response"])
        .arg(&truncated)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("64"));
}

#[test]
fn key_text_lists_questions() {
    gatescore()
        .args(["key", "--answer-key", KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("65 questions"))
        .stdout(predicate::str::contains("2.25:2.35"));
}

#[test]
fn key_json_round_trips_through_score() {
    let dir = TempDir::new().unwrap();
    let output = gatescore()
        .args(["key", "--answer-key", KEY, "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json_key = dir.path().join("key.json");
    std::fs::write(&json_key, output).unwrap();

    gatescore()
        .args(["score", "--answer-key"])
        .arg(&json_key)
        .args(["--response", SHEET])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL:       +86.67 / 100.00"));
}

#[test]
fn key_with_bad_type_fails() {
    let dir = TempDir::new().unwrap();
    let key = std::fs::read_to_string(KEY)
        .unwrap()
        .replace("   2   MCQ   GA   C  ", "   2   MMQ   GA   C  ");
    let path = dir.path().join("key.txt");
    std::fs::write(&path, key).unwrap();

    gatescore()
        .args(["key", "--answer-key"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid answer key"));
}

#[test]
fn compare_text_and_markdown() {
    let dir = TempDir::new().unwrap();
    let revised_key = dir.path().join("revised.txt");
    let key = std::fs::read_to_string(KEY)
        .unwrap()
        .replace("   2   MCQ   GA   C  ", "   2   MCQ   GA   A  ");
    std::fs::write(&revised_key, key).unwrap();

    let baseline = save_card(KEY, &dir.path().join("baseline"));
    let current = save_card(
        revised_key.to_str().unwrap(),
        &dir.path().join("current"),
    );

    gatescore()
        .args(["compare", "--baseline"])
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 86.67 -> 88.00 (+1.33)"))
        .stdout(predicate::str::contains("Comparison: 1 changed, 64 unchanged"))
        .stdout(predicate::str::contains("Q2 WRONG -0.33 -> CORRECT +1.00 (+1.33)"));

    gatescore()
        .args(["compare", "--format", "markdown", "--baseline"])
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2 | WRONG (-0.33) | CORRECT (+1.00) | +1.33 |"));
}

#[test]
fn compare_missing_card_fails() {
    gatescore()
        .args(["compare", "--baseline", "a.json", "--current", "b.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.json"));
}

#[test]
fn init_creates_then_skips() {
    let dir = TempDir::new().unwrap();
    gatescore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gatescore.toml"));

    let config = std::fs::read_to_string(dir.path().join("gatescore.toml")).unwrap();
    assert!(config.contains("[ghostscript]"));

    gatescore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping."));
}

#[test]
fn help_output() {
    gatescore()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Score a GATE response sheet against the official answer key",
        ))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("compare"));
}

#[test]
fn version_output() {
    gatescore()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gatescore"));
}
