//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use gatescore_core::model::{Outcome, Section};
use gatescore_core::report::ScoreCard;

use crate::leaderboard::Standing;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn outcome_class(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "pass",
        Outcome::Wrong => "fail",
        Outcome::Unanswered => "skip",
    }
}

/// Generate an HTML report for a score card, with leaderboard insights
/// when a standing is available.
pub fn generate_html(card: &ScoreCard, standing: Option<&Standing>) -> String {
    let summary = &card.report.summary;
    let candidate = &card.candidate;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let title = if candidate.candidate_id.is_empty() {
        "gatescore report".to_string()
    } else {
        format!("gatescore report: {}", html_escape(&candidate.candidate_id))
    };
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gatescore report</h1>\n");
    let mut meta = Vec::new();
    for (label, value) in [
        ("Candidate", &candidate.candidate_name),
        ("ID", &candidate.candidate_id),
        ("Subject", &candidate.subject),
        ("Test date", &candidate.test_date),
    ] {
        if !value.is_empty() {
            meta.push(format!("{label}: <strong>{}</strong>", html_escape(value)));
        }
    }
    meta.push(card.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    html.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" | ")));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n<div class=\"kpis\">\n");
    for (label, value) in [
        (
            "General Aptitude",
            format!("{:.2} / {:.0}", summary.ga_marks, summary.ga_max),
        ),
        (
            "Domain",
            format!("{:.2} / {:.0}", summary.da_marks, summary.da_max),
        ),
        (
            "Total",
            format!("{:.2} / {:.0}", summary.total_marks, summary.total_max),
        ),
        ("Correct", summary.correct.to_string()),
        ("Wrong", summary.wrong.to_string()),
        ("Unanswered", summary.unanswered.to_string()),
    ] {
        html.push_str(&format!(
            "<div class=\"kpi\"><div>{label}</div><div class=\"n\">{value}</div></div>\n"
        ));
    }
    html.push_str("</div>\n</section>\n");

    if let Some(standing) = standing {
        html.push_str(&generate_insights(standing));
    }

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<div class=\"filters\">");
    for (label, call) in [
        ("All", "resetRows()"),
        ("GA", "filterRows('GA')"),
        ("DA", "filterRows('DA')"),
        ("Correct", "statusRows('CORRECT')"),
        ("Wrong", "statusRows('WRONG')"),
        ("Unanswered", "statusRows('UNANSWERED')"),
    ] {
        html.push_str(&format!("<button onclick=\"{call}\">{label}</button>"));
    }
    html.push_str("</div>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Q#</th><th onclick=\"sortTable(1)\">Section</th><th onclick=\"sortTable(2)\">Type</th><th>Max</th><th>Your Answer</th><th>Key</th><th onclick=\"sortTable(6)\">Earned</th><th>Status</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &card.report.results {
        let section = match r.section {
            Section::GeneralAptitude => "GA",
            Section::Domain => "DA",
        };
        html.push_str(&format!(
            "<tr class=\"{}\" data-section=\"{section}\" data-status=\"{}\"><td>{}</td><td>{section}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:+.2}</td><td>{}</td></tr>\n",
            outcome_class(r.outcome),
            html_escape(&r.status),
            r.qnum,
            r.qtype,
            r.max_marks,
            html_escape(&r.your_answer),
            html_escape(&r.key_answer),
            r.earned,
            html_escape(&r.status),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(card)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(card: &ScoreCard, standing: Option<&Standing>, path: &Path) -> Result<()> {
    let html = generate_html(card, standing);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_insights(standing: &Standing) -> String {
    let d = &standing.distribution;
    let mut html = String::from("<section class=\"insights\">\n<h2>Score Insights</h2>\n");
    html.push_str(&format!(
        "<p class=\"rank\">Rank <strong>{}</strong> of {}</p>\n",
        standing.rank, standing.out_of
    ));
    html.push_str("<div class=\"kpis\">\n");
    for (label, value) in [
        ("Samples", d.count.to_string()),
        ("Mean", format!("{:.2}", d.mean)),
        ("SD", format!("{:.2}", d.std_dev)),
        ("Median", format!("{:.2}", d.median)),
        ("Min", format!("{:.2}", d.min)),
        ("Max", format!("{:.2}", d.max)),
        ("P90", format!("{:.2}", d.p90)),
    ] {
        html.push_str(&format!(
            "<div class=\"kpi\"><div>{label}</div><div class=\"n\">{value}</div></div>\n"
        ));
    }
    html.push_str("</div>\n");
    html.push_str(&generate_histogram(&standing.histogram, d.min, d.max));
    html.push_str("</section>\n");
    html
}

fn generate_histogram(bins: &[usize], min: f64, max: f64) -> String {
    let chart_height = 160;
    let bar_width = 36;
    let padding = 6;
    let label_height = 20;

    let top = bins.iter().copied().max().unwrap_or(0).max(1);
    let width = bins.len() * (bar_width + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width,
        chart_height + label_height
    );

    for (i, &count) in bins.iter().enumerate() {
        let height = count * (chart_height - 10) / top;
        let x = i * (bar_width + padding) + padding;
        let y = chart_height - height;
        svg.push_str(&format!(
            "  <rect x=\"{x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{height}\" fill=\"#14b8a6\" rx=\"3\"><title>{count}</title></rect>\n"
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">{:.1}</text>\n",
        padding,
        chart_height + label_height - 4,
        min
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" text-anchor=\"end\">{:.1}</text>\n",
        width - padding,
        chart_height + label_height - 4,
        max
    ));

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.kpis { display: flex; flex-wrap: wrap; gap: 0.75rem; }
.kpi { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; min-width: 8rem; }
.kpi .n { font-size: 1.4rem; font-weight: bold; }
.filters button { margin-right: 0.5rem; padding: 0.25rem 0.75rem; cursor: pointer; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.skip { background: var(--skip); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function rows() {
  return Array.from(document.querySelectorAll('#results tbody tr'));
}
function filterRows(section) {
  rows().forEach(tr => tr.style.display = tr.dataset.section === section ? '' : 'none');
}
function statusRows(prefix) {
  rows().forEach(tr => tr.style.display = (tr.dataset.status || '').startsWith(prefix) ? '' : 'none');
}
function resetRows() {
  rows().forEach(tr => tr.style.display = '');
}
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const sorted = rows().sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = isNaN(na) || isNaN(nb) ? va.localeCompare(vb) : na - nb;
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  sorted.forEach(r => tbody.appendChild(r));
}
"#;
