//! The `gatescore score` command.

use std::path::PathBuf;

use anyhow::Result;

use gatescore_core::engine::{ProgressReporter, ScoringPipeline};
use gatescore_core::model::{ExamReport, Outcome};
use gatescore_core::report::ScoreCard;
use gatescore_report::csv::write_csv_report;
use gatescore_report::html::write_html_report;
use gatescore_report::leaderboard::{Leaderboard, Standing};
use gatescore_sources::config::{create_source, load_config_from, GatescoreConfig};

const FORMATS: [&str; 4] = ["text", "json", "csv", "html"];

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_fetched(&self, source: &str, bytes: usize) {
        eprintln!("  Loaded: {source} ({bytes} bytes)");
    }

    fn on_scored(&self, card: &ScoreCard) {
        let s = &card.report.summary;
        eprintln!(
            "  Scored: {} correct, {} wrong, {} unanswered",
            s.correct, s.wrong, s.unanswered
        );
    }
}

/// The key location from the command line, else from config.
pub(crate) fn answer_key_location(arg: Option<String>, config: &GatescoreConfig) -> Result<String> {
    match arg.or_else(|| config.answer_key.clone()) {
        Some(location) if !location.trim().is_empty() => Ok(location),
        _ => anyhow::bail!(
            "no answer key given: pass --answer-key or set answer_key in gatescore.toml"
        ),
    }
}

fn parse_formats(format: &str) -> Result<Vec<&'static str>> {
    if format.trim() == "all" {
        return Ok(FORMATS.to_vec());
    }
    format
        .split(',')
        .map(|f| {
            let f = f.trim();
            FORMATS.iter().copied().find(|known| *known == f).ok_or_else(|| {
                anyhow::anyhow!("unknown format '{f}' (expected text, json, csv, html or all)")
            })
        })
        .collect()
}

pub async fn execute(
    answer_key: Option<String>,
    response: String,
    format: String,
    output: Option<PathBuf>,
    leaderboard: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let formats = parse_formats(&format)?;
    let config = load_config_from(config_path.as_deref())?;
    let key_location = answer_key_location(answer_key, &config)?;

    let pipeline = ScoringPipeline::new(
        create_source(&key_location, &config)?,
        create_source(&response, &config)?,
        config.layout.clone(),
    );

    eprintln!("gatescore v{}", env!("CARGO_PKG_VERSION"));
    let card = pipeline.run(&ConsoleReporter).await?;

    let standing = match leaderboard.or_else(|| config.leaderboard.clone()) {
        Some(path) => record_standing(&path, &card)?,
        None => None,
    };

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let prefix = if card.candidate.candidate_id.is_empty() {
        "scorecard".to_string()
    } else {
        card.candidate.candidate_id.clone()
    };

    for fmt in &formats {
        match *fmt {
            "text" => print_report(&card, standing.as_ref()),
            "json" => {
                let path = output.join(format!("{prefix}-{timestamp}.json"));
                card.save_json(&path)?;
                eprintln!("Score card saved to: {}", path.display());
            }
            "csv" => {
                let path = output.join(format!("{prefix}-{timestamp}.csv"));
                write_csv_report(&card.report, &path)?;
                eprintln!("CSV report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{prefix}-{timestamp}.html"));
                write_html_report(&card, standing.as_ref(), &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            other => anyhow::bail!("unknown format '{other}'"),
        }
    }

    Ok(())
}

fn record_standing(path: &std::path::Path, card: &ScoreCard) -> Result<Option<Standing>> {
    let mut board = Leaderboard::open(path)?;
    let standing = board.record(card);
    if standing.is_some() {
        board.save()?;
        tracing::info!("leaderboard {} now has {} entries", path.display(), board.len());
    }
    Ok(standing)
}

fn print_report(card: &ScoreCard, standing: Option<&Standing>) {
    let candidate = &card.candidate;
    if !candidate.candidate_id.is_empty() {
        println!(
            "Candidate: {} ({})",
            if candidate.candidate_name.is_empty() {
                "-"
            } else {
                candidate.candidate_name.as_str()
            },
            candidate.candidate_id
        );
    }

    println!("{}", results_table(&card.report));

    let s = &card.report.summary;
    println!();
    println!("GA Marks:    {:+.2} / {:.2}", s.ga_marks, s.ga_max);
    println!("DA Marks:    {:+.2} / {:.2}", s.da_marks, s.da_max);
    println!("TOTAL:       {:+.2} / {:.2}", s.total_marks, s.total_max);
    println!();
    println!("Correct:     {}", s.correct);
    println!("Wrong:       {}", s.wrong);
    println!("Unanswered:  {}", s.unanswered);

    if let Some(standing) = standing {
        let d = &standing.distribution;
        println!();
        println!("Rank:        {} of {}", standing.rank, standing.out_of);
        println!(
            "Insights:    mean {:.2}, sd {:.2}, median {:.2}, p90 {:.2}, min {:.2}, max {:.2}",
            d.mean, d.std_dev, d.median, d.p90, d.min, d.max
        );
    }
}

fn results_table(report: &ExamReport) -> comfy_table::Table {
    use comfy_table::{Cell, Color, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Q#",
        "Section",
        "Type",
        "Max",
        "Your Answer",
        "Key",
        "Earned",
        "Status",
    ]);

    for row in &report.results {
        let color = match row.outcome {
            Outcome::Correct => Color::Green,
            Outcome::Wrong => Color::Red,
            Outcome::Unanswered => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(row.qnum),
            Cell::new(row.section),
            Cell::new(row.qtype),
            Cell::new(row.max_marks),
            Cell::new(&row.your_answer),
            Cell::new(&row.key_answer),
            Cell::new(format!("{:+.2}", row.earned)),
            Cell::new(&row.status).fg(color),
        ]);
    }

    table
}
