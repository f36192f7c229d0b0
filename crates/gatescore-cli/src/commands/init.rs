//! The `gatescore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gatescore.toml").exists() {
        println!("gatescore.toml already exists, skipping.");
    } else {
        std::fs::write("gatescore.toml", SAMPLE_CONFIG)?;
        println!("Created gatescore.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set answer_key in gatescore.toml (text dump, JSON key or PDF)");
    println!("  2. Run: gatescore key");
    println!("  3. Run: gatescore score --response response.html");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gatescore configuration

# Answer key used when --answer-key is not given. PDFs need Ghostscript.
# answer_key = "answer-key.pdf"

# Leaderboard file updated on every `gatescore score`.
# leaderboard = "gatescore-ranks.json"

output_dir = "./gatescore-results"

[http]
timeout_secs = 30
accept_invalid_certs = false

[ghostscript]
binary = "gs"
timeout_secs = 60
"#;
