//! PDF answer keys converted to text with Ghostscript.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::instrument;

use gatescore_core::traits::DocumentSource;

use crate::config::GhostscriptConfig;
use crate::error::SourceError;

/// Runs `gs -sDEVICE=txtwrite` over a PDF and returns the extracted text.
pub struct GhostscriptSource {
    pdf: PathBuf,
    binary: String,
    timeout: Duration,
}

impl GhostscriptSource {
    pub fn new(pdf: impl Into<PathBuf>, config: &GhostscriptConfig) -> Self {
        Self {
            pdf: pdf.into(),
            binary: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "-q",
            "-dNOPAUSE",
            "-dBATCH",
            "-sDEVICE=txtwrite",
            "-sOutputFile=-",
        ])
        .arg(&self.pdf)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
        cmd
    }
}

/// Whether a key location should go through Ghostscript.
pub fn is_pdf(location: &str) -> bool {
    location.trim().to_ascii_lowercase().ends_with(".pdf")
}

#[async_trait]
impl DocumentSource for GhostscriptSource {
    fn describe(&self) -> String {
        self.pdf.display().to_string()
    }

    #[instrument(skip(self), fields(pdf = %self.pdf.display()))]
    async fn fetch(&self) -> anyhow::Result<String> {
        if !self.pdf.exists() {
            return Err(SourceError::Io {
                path: self.describe(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }
            .into());
        }

        let output = tokio::time::timeout(self.timeout, self.command().output())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SourceError::ToolMissing(self.binary.clone()),
                _ => SourceError::ToolFailed {
                    tool: self.binary.clone(),
                    message: e.to_string(),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::ToolFailed {
                tool: self.binary.clone(),
                message: format!("{} ({})", stderr.trim(), output.status),
            }
            .into());
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!("extracted {} lines", text.lines().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_in(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("key.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        path
    }

    fn config(binary: &str) -> GhostscriptConfig {
        GhostscriptConfig {
            binary: binary.into(),
            ..Default::default()
        }
    }

    #[test]
    fn pdf_detection() {
        assert!(is_pdf("keys/GATE_DA_2026.PDF"));
        assert!(!is_pdf("keys/answer-key.txt"));
    }

    #[tokio::test]
    async fn missing_binary_is_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = GhostscriptSource::new(pdf_in(&dir), &config("gatescore-no-such-gs"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::ToolMissing(name)) if name == "gatescore-no-such-gs"
        ));
    }

    #[tokio::test]
    async fn missing_pdf_is_io_error() {
        let source = GhostscriptSource::new("/nonexistent/key.pdf", &config("gs"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_tool_is_tool_failed() {
        let dir = tempfile::tempdir().unwrap();
        let source = GhostscriptSource::new(pdf_in(&dir), &config("false"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::ToolFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_txtwrite_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = pdf_in(&dir);
        let source = GhostscriptSource::new(&pdf, &config("echo"));
        let text = source.fetch().await.unwrap();
        assert!(text.contains("-sDEVICE=txtwrite -sOutputFile=-"));
        assert!(text.trim_end().ends_with(&pdf.display().to_string()));
    }
}
