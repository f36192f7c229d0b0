//! Mock source for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use gatescore_core::traits::DocumentSource;

use crate::error::SourceError;

/// A document source that serves fixed text, or fails with a fixed error,
/// without touching the filesystem or network.
pub struct MockSource {
    name: String,
    body: Result<String, u16>,
    call_count: AtomicU32,
}

impl MockSource {
    /// Serve `body` on every fetch.
    pub fn with_text(name: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            body: Ok(body.to_string()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Fail every fetch with the given HTTP status.
    pub fn with_status(name: &str, status: u16) -> Self {
        Self {
            name: name.to_string(),
            body: Err(status),
            call_count: AtomicU32::new(0),
        }
    }

    /// Number of fetches made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.body {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(SourceError::HttpStatus {
                status: *status,
                url: self.name.clone(),
            }
            .into()),
        }
    }
}
