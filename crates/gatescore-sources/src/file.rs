//! Local file source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use gatescore_core::traits::DocumentSource;

use crate::error::SourceError;

/// Reads a text or HTML document from disk. Invalid UTF-8 is replaced
/// rather than rejected; exported response sheets are not always clean.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.describe(),
                source,
            })?;
        tracing::debug!("read {} bytes", bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
