//! The `gatescore key` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gatescore_core::answer_key::parse_answer_key_document;
use gatescore_sources::config::{create_source, load_config_from};

use super::score::answer_key_location;

pub async fn execute(
    answer_key: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let location = answer_key_location(answer_key, &config)?;

    let source = create_source(&location, &config)?;
    let text = source
        .fetch()
        .await
        .with_context(|| format!("failed to load {location}"))?;
    let key = parse_answer_key_document(&text, &config.layout)
        .with_context(|| format!("invalid answer key {location}"))?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&key)?);
        }
        _ => {
            use comfy_table::{Cell, Table};

            let mut table = Table::new();
            table.set_header(vec!["Q#", "Section", "Type", "Max", "Key"]);
            for (qnum, answer) in key.iter() {
                table.add_row(vec![
                    Cell::new(qnum),
                    Cell::new(config.layout.section(qnum)),
                    Cell::new(answer.question_type()),
                    Cell::new(config.layout.max_marks(qnum)),
                    Cell::new(answer),
                ]);
            }
            println!("{table}");

            let counts = key
                .type_counts()
                .iter()
                .map(|(qtype, n)| format!("{n} {qtype}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("\n{} questions ({counts})", key.len());
        }
    }

    Ok(())
}
