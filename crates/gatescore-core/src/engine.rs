//! Scoring pipeline orchestrator.
//!
//! Fetches the answer key and the response sheet concurrently, parses both
//! against one exam layout and marks the result into a [`ScoreCard`].

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::answer_key::{parse_answer_key_document, AnswerKey};
use crate::layout::ExamLayout;
use crate::report::ScoreCard;
use crate::response::{parse_candidate_meta, parse_response_sheet};
use crate::scoring::evaluate;
use crate::traits::DocumentSource;

/// Progress reporting hook.
pub trait ProgressReporter: Send + Sync {
    fn on_fetched(&self, source: &str, bytes: usize);
    fn on_scored(&self, card: &ScoreCard);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_fetched(&self, _: &str, _: usize) {}
    fn on_scored(&self, _: &ScoreCard) {}
}

/// Key + response sheet -> score card.
pub struct ScoringPipeline {
    key_source: Arc<dyn DocumentSource>,
    response_source: Arc<dyn DocumentSource>,
    layout: ExamLayout,
}

impl ScoringPipeline {
    pub fn new(
        key_source: Arc<dyn DocumentSource>,
        response_source: Arc<dyn DocumentSource>,
        layout: ExamLayout,
    ) -> Self {
        Self {
            key_source,
            response_source,
            layout,
        }
    }

    pub fn layout(&self) -> &ExamLayout {
        &self.layout
    }

    /// Fetch and parse only the answer key.
    pub async fn load_key(&self) -> Result<AnswerKey> {
        let text = self.fetch(self.key_source.as_ref(), &NoopReporter).await?;
        parse_answer_key_document(&text, &self.layout)
            .with_context(|| format!("invalid answer key {}", self.key_source.describe()))
    }

    /// Run the full pipeline.
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<ScoreCard> {
        let start = Instant::now();

        let (key_text, response_html) = futures::try_join!(
            self.fetch(self.key_source.as_ref(), progress),
            self.fetch(self.response_source.as_ref(), progress),
        )?;

        let key = parse_answer_key_document(&key_text, &self.layout)
            .with_context(|| format!("invalid answer key {}", self.key_source.describe()))?;
        let responses = parse_response_sheet(&response_html, &self.layout).with_context(|| {
            format!("invalid response sheet {}", self.response_source.describe())
        })?;
        let candidate = parse_candidate_meta(&response_html);

        tracing::info!(
            "parsed {} key answers and {} responses ({} attempted)",
            key.len(),
            responses.len(),
            responses.attempted()
        );

        let report = evaluate(&key, &responses, &self.layout)?;
        let card = ScoreCard::new(candidate, report);

        tracing::info!(
            "scored {} in {:?}: {:.2} / {:.2}",
            if card.candidate.candidate_id.is_empty() {
                "response sheet"
            } else {
                card.candidate.candidate_id.as_str()
            },
            start.elapsed(),
            card.report.summary.total_marks,
            card.report.summary.total_max
        );
        progress.on_scored(&card);
        Ok(card)
    }

    async fn fetch(
        &self,
        source: &dyn DocumentSource,
        progress: &dyn ProgressReporter,
    ) -> Result<String> {
        let location = source.describe();
        tracing::debug!("fetching {location}");
        let text = source
            .fetch()
            .await
            .with_context(|| format!("failed to load {location}"))?;
        progress.on_fetched(&location, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    const FIXTURE_KEY: &str = include_str!("../../../fixtures/answer-key.txt");
    const FIXTURE_SHEET: &str = include_str!("../../../fixtures/response.html");

    struct Failing;

    #[async_trait]
    impl DocumentSource for Failing {
        fn describe(&self) -> String {
            "https://example.invalid/sheet.html".into()
        }

        async fn fetch(&self) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    #[derive(Default)]
    struct Counting {
        fetched: AtomicUsize,
        scored: AtomicUsize,
    }

    impl ProgressReporter for Counting {
        fn on_fetched(&self, _: &str, _: usize) {
            self.fetched.fetch_add(1, Ordering::SeqCst);
        }
        fn on_scored(&self, _: &ScoreCard) {
            self.scored.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pipeline(key: Arc<dyn DocumentSource>, sheet: Arc<dyn DocumentSource>) -> ScoringPipeline {
        ScoringPipeline::new(key, sheet, ExamLayout::default())
    }

    #[tokio::test]
    async fn scores_the_fixture() {
        let progress = Counting::default();
        let card = pipeline(
            Arc::new(FIXTURE_KEY.to_string()),
            Arc::new(FIXTURE_SHEET.to_string()),
        )
        .run(&progress)
        .await
        .unwrap();

        assert_eq!(card.candidate.candidate_id, "DA26S86201284");
        assert_eq!(card.report.results.len(), 65);
        assert!((card.report.summary.total_marks - 86.666_666_666_666_67).abs() < 1e-9);
        assert_eq!(progress.fetched.load(Ordering::SeqCst), 2);
        assert_eq!(progress.scored.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_names_the_source() {
        let err = pipeline(Arc::new(FIXTURE_KEY.to_string()), Arc::new(Failing))
            .run(&NoopReporter)
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("example.invalid"), "got: {msg}");
        assert!(msg.contains("connection refused"), "got: {msg}");
    }

    #[tokio::test]
    async fn incomplete_key_is_reported() {
        let short: String = FIXTURE_KEY
            .lines()
            .filter(|l| !l.trim_start().starts_with("65 "))
            .map(|l| format!("{l}\n"))
            .collect();
        let err = pipeline(Arc::new(short), Arc::new(FIXTURE_SHEET.to_string()))
            .run(&NoopReporter)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("64"));
    }

    #[tokio::test]
    async fn load_key_only() {
        let key = pipeline(Arc::new(FIXTURE_KEY.to_string()), Arc::new(Failing))
            .load_key()
            .await
            .unwrap();
        assert_eq!(key.len(), 65);
    }
}
