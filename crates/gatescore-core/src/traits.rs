//! Core trait for fetching input documents.
//!
//! Implemented by the `gatescore-sources` crate for local files, HTTP URLs
//! and PDF keys.

use async_trait::async_trait;

/// Something that can produce the text of an answer key or response sheet.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable location (path or URL) for logs and errors.
    fn describe(&self) -> String;

    /// Fetch the whole document as text.
    async fn fetch(&self) -> anyhow::Result<String>;
}

#[async_trait]
impl DocumentSource for String {
    fn describe(&self) -> String {
        "<inline>".to_string()
    }

    async fn fetch(&self) -> anyhow::Result<String> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inline_text_is_a_source() {
        let source = String::from("1 MCQ GA A");
        assert_eq!(source.describe(), "<inline>");
        assert_eq!(source.fetch().await.unwrap(), "1 MCQ GA A");
    }
}
