// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced prefix autocomplete over the archive tag index.
//!
//! Each `suggest` call is a cancellable delayed task: it cancels whatever
//! suggestion was pending, waits out the debounce window, then queries the
//! index. A call superseded by a newer keystroke reports
//! [`Suggestion::Superseded`] instead of a stale result, so only the latest
//! call's result is ever applied.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use huddle_core::{HuddleError, TagIndex, TagName};

/// Outcome of a single `suggest` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// A newer keystroke arrived while this call was pending; discard it.
    Superseded,
    /// Ranked suggestions from the index, best first, capped at the
    /// configured limit.
    Ranked(Vec<TagName>),
}

/// Debounced tag autocomplete service.
pub struct Autocompleter {
    index: Arc<dyn TagIndex>,
    debounce: Duration,
    limit: usize,
    /// Token of the currently pending call, cancelled by each newer call.
    pending: Mutex<Option<CancellationToken>>,
}

impl Autocompleter {
    /// Create an autocompleter over the given index.
    ///
    /// `debounce` is the delay before a query fires; `limit` caps the
    /// number of suggestions returned per query.
    pub fn new(index: Arc<dyn TagIndex>, debounce: Duration, limit: usize) -> Self {
        Self {
            index,
            debounce,
            limit,
            pending: Mutex::new(None),
        }
    }

    /// Suggest tags for a prefix after the debounce window elapses.
    ///
    /// An empty prefix always yields an empty ranked sequence without
    /// touching the index, and still cancels any pending call (the user
    /// cleared the input).
    pub async fn suggest(&self, prefix: &str) -> Result<Suggestion, HuddleError> {
        let token = CancellationToken::new();
        {
            let mut pending = self
                .pending
                .lock()
                .map_err(|_| HuddleError::Internal("autocomplete lock poisoned".into()))?;
            if let Some(prev) = pending.replace(token.clone()) {
                prev.cancel();
            }
        }

        if prefix.is_empty() {
            return Ok(Suggestion::Ranked(Vec::new()));
        }

        tokio::select! {
            _ = token.cancelled() => {
                debug!(prefix, "suggestion superseded before query");
                return Ok(Suggestion::Superseded);
            }
            _ = tokio::time::sleep(self.debounce) => {}
        }

        let ranked = self.index.search_prefix(prefix, self.limit).await?;

        // A keystroke may have landed while the query was in flight.
        if token.is_cancelled() {
            debug!(prefix, "suggestion superseded during query");
            return Ok(Suggestion::Superseded);
        }

        Ok(Suggestion::Ranked(ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_test_utils::MockTagIndex;

    fn index_with(tags: &[&str]) -> Arc<MockTagIndex> {
        Arc::new(MockTagIndex::with_tags(
            tags.iter().map(|t| TagName(t.to_string())).collect(),
        ))
    }

    #[tokio::test]
    async fn suggest_returns_ranked_prefix_matches() {
        let index = index_with(&["weekly", "weather", "report"]);
        let ac = Autocompleter::new(index, Duration::from_millis(1), 10);

        let got = ac.suggest("we").await.unwrap();
        assert_eq!(
            got,
            Suggestion::Ranked(vec![TagName("weekly".into()), TagName("weather".into())])
        );
    }

    #[tokio::test]
    async fn empty_prefix_never_queries_the_index() {
        let index = index_with(&["weekly"]);
        let ac = Autocompleter::new(index.clone(), Duration::from_millis(1), 10);

        for _ in 0..3 {
            let got = ac.suggest("").await.unwrap();
            assert_eq!(got, Suggestion::Ranked(Vec::new()));
        }
        assert_eq!(index.query_count(), 0);
    }

    #[tokio::test]
    async fn newer_call_supersedes_pending_one() {
        let index = index_with(&["weekly", "weather"]);
        let ac = Arc::new(Autocompleter::new(
            index.clone(),
            Duration::from_millis(80),
            10,
        ));

        let first = {
            let ac = Arc::clone(&ac);
            tokio::spawn(async move { ac.suggest("w").await.unwrap() })
        };
        // Let the first call install its pending token.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = ac.suggest("we").await.unwrap();

        assert_eq!(first.await.unwrap(), Suggestion::Superseded);
        assert_eq!(
            second,
            Suggestion::Ranked(vec![TagName("weekly".into()), TagName("weather".into())])
        );
        // Only the surviving call reached the index.
        assert_eq!(index.query_count(), 1);
    }

    #[tokio::test]
    async fn limit_caps_result_length() {
        let index = index_with(&["t1", "t2", "t3", "t4"]);
        let ac = Autocompleter::new(index, Duration::from_millis(1), 2);

        match ac.suggest("t").await.unwrap() {
            Suggestion::Ranked(tags) => assert_eq!(tags.len(), 2),
            other => panic!("expected ranked suggestions, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn matching_is_case_sensitive() {
        let index = index_with(&["Report", "report"]);
        let ac = Autocompleter::new(index, Duration::from_millis(1), 10);

        let got = ac.suggest("Rep").await.unwrap();
        assert_eq!(got, Suggestion::Ranked(vec![TagName("Report".into())]));
    }
}
