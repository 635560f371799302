// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag autocomplete route.
//!
//! Each user gets their own debounced [`Autocompleter`], so one user's
//! keystrokes never cancel another's pending query. A superseded call
//! answers `204 No Content`; the client simply waits for the response
//! to its latest keystroke.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use huddle_core::{TagIndex, TagName, UserId};
use huddle_tags::autocomplete::{Autocompleter, Suggestion};

use crate::handlers::error_response;
use crate::server::GatewayState;

/// Per-user autocompleters over a shared tag index.
pub struct TagSuggesters {
    index: Arc<dyn TagIndex>,
    debounce: Duration,
    limit: usize,
    by_user: DashMap<UserId, Arc<Autocompleter>>,
}

impl TagSuggesters {
    pub fn new(index: Arc<dyn TagIndex>, debounce: Duration, limit: usize) -> Self {
        Self {
            index,
            debounce,
            limit,
            by_user: DashMap::new(),
        }
    }

    fn for_user(&self, user: &UserId) -> Arc<Autocompleter> {
        self.by_user
            .entry(user.clone())
            .or_insert_with(|| {
                Arc::new(Autocompleter::new(
                    self.index.clone(),
                    self.debounce,
                    self.limit,
                ))
            })
            .clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    prefix: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub tags: Vec<TagName>,
}

/// `GET /archive/tags/suggest?prefix=...`
pub async fn get_suggestions(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Query(query): Query<SuggestQuery>,
) -> Response {
    let suggester = state.suggesters.for_user(&user);
    match suggester.suggest(&query.prefix).await {
        Ok(Suggestion::Ranked(tags)) => Json(SuggestResponse { tags }).into_response(),
        Ok(Suggestion::Superseded) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_test_utils::MockTagIndex;

    #[tokio::test]
    async fn each_user_gets_an_isolated_suggester() {
        let index = Arc::new(MockTagIndex::with_tags(vec![
            TagName("report".into()),
            TagName("review".into()),
        ]));
        let suggesters = TagSuggesters::new(index, Duration::from_millis(5), 10);

        let alice = UserId("alice".into());
        let bob = UserId("bob".into());

        let for_alice = suggesters.for_user(&alice);
        let for_bob = suggesters.for_user(&bob);
        // Bob's keystroke must not cancel Alice's pending query.
        let (a, b) = tokio::join!(for_alice.suggest("re"), for_bob.suggest("re"));
        assert!(matches!(a.unwrap(), Suggestion::Ranked(_)));
        assert!(matches!(b.unwrap(), Suggestion::Ranked(_)));
    }

    #[tokio::test]
    async fn same_user_reuses_the_suggester() {
        let index = Arc::new(MockTagIndex::new());
        let suggesters = TagSuggesters::new(index, Duration::from_millis(5), 10);
        let alice = UserId("alice".into());
        let first = suggesters.for_user(&alice);
        let second = suggesters.for_user(&alice);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
