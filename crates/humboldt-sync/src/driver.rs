//! The cursor-follow pagination driver.

use std::time::Duration;

use async_trait::async_trait;
use humboldt_client::{Cursor, Page};
use humboldt_types::{HumboldtError, RawRecord, Result};
use tracing::debug;

/// A source of pages for one pagination sweep.
///
/// Implementations are already bound to an endpoint and query; only the
/// cursor varies between rounds. The production implementation wraps the
/// HTTP client, and tests inject scripted fakes.
#[async_trait]
pub trait PageSource {
    /// Fetches one page, continuing from `cursor` when given.
    async fn fetch(&self, cursor: Option<&Cursor>) -> Result<Page>;
}

/// Drives a [`PageSource`] to exhaustion, accumulating raw records.
///
/// The driver is an explicit state machine over `{cursor, accumulated}`.
/// Per round it fetches a page; an empty page terminates the sweep
/// ("exhausted-empty"), as does an absent or repeated cursor after a
/// non-empty page ("exhausted-dup"). Otherwise the new cursor is adopted
/// and the driver waits the pacing delay before the next round.
///
/// Failures propagate immediately; there is no partial-success state. A
/// rerun replays the sweep from its original bounds, which is safe
/// because appends deduplicate by timestamp.
#[derive(Debug, Clone)]
pub struct PaginationDriver {
    delay: Duration,
    max_rounds: u32,
}

impl PaginationDriver {
    /// Creates a driver with the given inter-round delay and round cap.
    #[must_use]
    pub const fn new(delay: Duration, max_rounds: u32) -> Self {
        Self { delay, max_rounds }
    }

    /// Runs the sweep to exhaustion.
    ///
    /// # Errors
    ///
    /// Propagates any fetch failure, and returns
    /// [`HumboldtError::PaginationLimit`] if the source never signals
    /// exhaustion within the round cap.
    pub async fn run<S: PageSource + Sync>(&self, source: &S) -> Result<Vec<RawRecord>> {
        let mut cursor: Option<Cursor> = None;
        let mut accumulated = Vec::new();

        for round in 1..=self.max_rounds {
            let page = source.fetch(cursor.as_ref()).await?;

            if page.is_empty() {
                debug!(round, total = accumulated.len(), "exhausted: empty page");
                return Ok(accumulated);
            }

            accumulated.extend(page.records);
            debug!(round, total = accumulated.len(), "page accumulated");

            match page.next_cursor {
                None => {
                    debug!(round, "exhausted: no cursor");
                    return Ok(accumulated);
                }
                Some(next) if cursor.as_ref() == Some(&next) => {
                    debug!(round, "exhausted: repeated cursor");
                    return Ok(accumulated);
                }
                Some(next) => cursor = Some(next),
            }

            tokio::time::sleep(self.delay).await;
        }

        Err(HumboldtError::PaginationLimit {
            max_rounds: self.max_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted page source: pops pre-built results in order.
    struct Script {
        pages: Mutex<Vec<Result<Page>>>,
        cursors_seen: Mutex<Vec<Option<String>>>,
    }

    impl Script {
        fn new(pages: Vec<Result<Page>>) -> Self {
            let mut pages = pages;
            pages.reverse();
            Self {
                pages: Mutex::new(pages),
                cursors_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for Script {
        async fn fetch(&self, cursor: Option<&Cursor>) -> Result<Page> {
            self.cursors_seen
                .lock()
                .unwrap()
                .push(cursor.map(|c| c.as_str().to_string()));
            self.pages.lock().unwrap().pop().expect("script exhausted")
        }
    }

    fn page(values: &[i64], next: Option<&str>) -> Page {
        Page {
            records: values.iter().map(|v| json!({ "n": v })).collect(),
            next_cursor: next.map(|c| Cursor::new(c.to_string())),
        }
    }

    fn driver() -> PaginationDriver {
        PaginationDriver::new(Duration::ZERO, 100)
    }

    #[tokio::test]
    async fn test_terminates_on_empty_page() {
        let script = Script::new(vec![
            Ok(page(&[1, 2], Some("a"))),
            Ok(page(&[3], Some("b"))),
            Ok(page(&[], None)),
        ]);
        let records = driver().run(&script).await.unwrap();

        let values: Vec<i64> = records.iter().map(|r| r["n"].as_i64().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);

        // The adopted cursors were threaded through in order.
        let seen = script.cursors_seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_terminates_on_absent_cursor() {
        let script = Script::new(vec![Ok(page(&[1], Some("a"))), Ok(page(&[2], None))]);
        let records = driver().run(&script).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_terminates_on_repeated_cursor() {
        let script = Script::new(vec![Ok(page(&[1], Some("a"))), Ok(page(&[2], Some("a")))]);
        let records = driver().run(&script).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates_immediately() {
        let script = Script::new(vec![
            Ok(page(&[1], Some("a"))),
            Err(HumboldtError::Api {
                code: 10006,
                message: "rate limited".to_string(),
            }),
        ]);
        let err = driver().run(&script).await.unwrap_err();
        assert!(matches!(err, HumboldtError::Api { code: 10006, .. }));
    }

    #[tokio::test]
    async fn test_round_cap() {
        // Cursor changes every round and never signals exhaustion.
        let pages: Vec<Result<Page>> = (0..10)
            .map(|i| Ok(page(&[i], Some(&format!("c{i}")))))
            .collect();
        let script = Script::new(pages);
        let driver = PaginationDriver::new(Duration::ZERO, 5);

        let err = driver.run(&script).await.unwrap_err();
        assert!(matches!(
            err,
            HumboldtError::PaginationLimit { max_rounds: 5 }
        ));
    }
}
