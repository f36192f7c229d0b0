//! gatescore CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gatescore",
    version,
    about = "Score a GATE response sheet against the official answer key"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a response sheet
    Score {
        /// Answer key: text dump, JSON key or PDF (defaults to `answer_key` in config)
        #[arg(long)]
        answer_key: Option<String>,

        /// Response sheet: HTML file or http(s) URL
        #[arg(long)]
        response: String,

        /// Output format: text, json, csv, html, all (comma-separated)
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory for json/csv/html (defaults to `output_dir` in config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Leaderboard file to record the total in
        #[arg(long)]
        leaderboard: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse and print an answer key
    Key {
        /// Answer key: text dump, JSON key or PDF (defaults to `answer_key` in config)
        #[arg(long)]
        answer_key: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two saved score cards
    Compare {
        /// Baseline score card JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current score card JSON
        #[arg(long)]
        current: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter gatescore.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gatescore=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            answer_key,
            response,
            format,
            output,
            leaderboard,
            config,
        } => {
            commands::score::execute(answer_key, response, format, output, leaderboard, config)
                .await
        }
        Commands::Key {
            answer_key,
            format,
            config,
        } => commands::key::execute(answer_key, format, config).await,
        Commands::Compare {
            baseline,
            current,
            format,
        } => commands::compare::execute(baseline, current, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
