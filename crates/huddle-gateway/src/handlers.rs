// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST handlers for summaries, acknowledgements, and liveness.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use huddle_core::{HuddleError, RoomId, RoomSummary, UserId};
use huddle_rooms::SessionCache;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub rooms: Vec<RoomSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: String,
    reason: String,
}

pub(crate) fn error_response(e: HuddleError) -> Response {
    let status = match &e {
        HuddleError::Auth(_) => StatusCode::UNAUTHORIZED,
        HuddleError::NotMember { .. } => StatusCode::FORBIDDEN,
        HuddleError::UnknownRoom(_) => StatusCode::NOT_FOUND,
        HuddleError::Validation(_) => StatusCode::BAD_REQUEST,
        HuddleError::Upstream { .. } | HuddleError::Transport(_) => StatusCode::BAD_GATEWAY,
        HuddleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        code: e.code().to_owned(),
        reason: e.to_string(),
    };
    (status, Json(body)).into_response()
}

/// `GET /health`, unauthenticated.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// `GET /rooms/summary`: the caller's per-room previews and unread
/// counts, most recently active room first.
pub async fn get_summaries(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
) -> Json<SummaryResponse> {
    let rooms = state.summaries.summaries(&user);
    Json(SummaryResponse { rooms })
}

/// `POST /rooms/{roomId}/acknowledge`: clears the caller's unread count
/// after they have viewed the room. Membership is checked first so a
/// non-member cannot probe which room ids exist.
pub async fn post_acknowledge(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Path(room_id): Path<RoomId>,
) -> Response {
    let cache = SessionCache::new();
    match state.resolver.member_room(&cache, &user, &room_id).await {
        Ok(_) => {
            state.summaries.acknowledge(&user, &room_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests::test_state;

    #[tokio::test]
    async fn health_reports_ok() {
        let state = test_state();
        let Json(body) = get_health(State(state)).await;
        assert_eq!(body.status, "ok");
        assert!(!body.version.is_empty());
    }

    #[tokio::test]
    async fn summaries_empty_for_new_user() {
        let state = test_state();
        let Json(body) = get_summaries(
            State(state),
            Extension(UserId("alice".into())),
        )
        .await;
        assert!(body.rooms.is_empty());
    }

    #[tokio::test]
    async fn acknowledge_unknown_room_maps_to_not_found() {
        let state = test_state();
        let response = post_acknowledge(
            State(state),
            Extension(UserId("alice".into())),
            Path(RoomId("missing".into())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
