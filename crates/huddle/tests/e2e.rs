// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Huddle pipeline.
//!
//! Each test wires a resolver, dispatcher, summary store, and capture
//! sink from mocks. Tests are independent and order-insensitive.

use std::sync::Arc;

use huddle_core::{RoomId, RoomScope, ServerFrame, UserId};
use huddle_dispatch::Dispatcher;
use huddle_rooms::{ScopeResolver, SessionCache};
use huddle_summary::SummaryStore;
use huddle_test_utils::{
    direct_frame, text_frame, CaptureSink, MockArchiveStore, MockDirectory, MockHistory,
};

struct Harness {
    dispatcher: Dispatcher,
    summaries: Arc<SummaryStore>,
    sink: Arc<CaptureSink>,
    history: Arc<MockHistory>,
    cache: SessionCache,
}

fn harness(seed: impl FnOnce(&MockDirectory)) -> Harness {
    let directory = Arc::new(MockDirectory::new());
    seed(&directory);

    let resolver = Arc::new(ScopeResolver::new(directory));
    let summaries = Arc::new(SummaryStore::new());
    let sink = Arc::new(CaptureSink::new());
    let history = Arc::new(MockHistory::new());
    let dispatcher = Dispatcher::new(
        resolver,
        Arc::new(MockArchiveStore::new()),
        summaries.clone(),
        sink.clone(),
    );

    Harness {
        dispatcher,
        summaries,
        sink,
        history,
        cache: SessionCache::new(),
    }
}

// ---- Live delivery and summaries ----

#[tokio::test]
async fn message_reaches_connected_members_and_counts_unread() {
    let h = harness(|dir| {
        dir.add_room("dept-eng", RoomScope::Department, &["alice", "bob", "cara"]);
    });
    h.sink.connect("alice");
    h.sink.connect("bob");

    let result = h
        .dispatcher
        .dispatch(&h.cache, text_frame("dept-eng", "alice", "standup in 5", 0))
        .await
        .unwrap();

    // Cara is offline, so only two live pushes.
    assert_eq!(result.delivered, 2);
    assert_eq!(h.sink.frames_for("bob").len(), 1);
    assert!(h.sink.frames_for("cara").is_empty());

    // Summaries update for everyone, connected or not.
    let alice = UserId("alice".into());
    let cara = UserId("cara".into());
    assert_eq!(h.summaries.summaries(&alice)[0].unread_count, 0);
    assert_eq!(h.summaries.summaries(&cara)[0].unread_count, 1);
}

// ---- Reconnect backfill ----

#[tokio::test]
async fn disconnected_member_recovers_messages_from_history() {
    let h = harness(|dir| {
        dir.add_room("proj-apollo", RoomScope::Project, &["alice", "bob"]);
    });
    h.sink.connect("alice");
    // Bob is offline for both sends.

    for (content, offset) in [("kickoff at noon", 0), ("notes uploaded", 60)] {
        let frame = text_frame("proj-apollo", "alice", content, offset);
        h.dispatcher.dispatch(&h.cache, frame.clone()).await.unwrap();
        // The external history service persists every admitted message.
        h.history.record(frame);
    }

    assert!(h.sink.frames_for("bob").is_empty());
    let bob = UserId("bob".into());
    assert_eq!(h.summaries.summaries(&bob)[0].unread_count, 2);

    // Bob reconnects and opens the room; the backlog covers the gap,
    // oldest first.
    h.sink.connect("bob");
    let backlog = {
        use huddle_core::HistoryStore;
        h.history
            .room_messages(&RoomId("proj-apollo".into()))
            .await
            .unwrap()
    };
    assert_eq!(backlog.len(), 2);
    assert_eq!(backlog[0].content, "kickoff at noon");
    assert_eq!(backlog[1].content, "notes uploaded");
    assert!(backlog[0].created_at < backlog[1].created_at);
}

// ---- Acknowledge ----

#[tokio::test]
async fn acknowledge_clears_unread_but_keeps_preview() {
    let h = harness(|dir| {
        dir.add_room("dept-eng", RoomScope::Department, &["alice", "bob"]);
    });

    h.dispatcher
        .dispatch(&h.cache, text_frame("dept-eng", "alice", "release shipped", 0))
        .await
        .unwrap();

    let bob = UserId("bob".into());
    assert_eq!(h.summaries.summaries(&bob)[0].unread_count, 1);

    h.summaries.acknowledge(&bob, &RoomId("dept-eng".into()));

    let after = h.summaries.summaries(&bob);
    assert_eq!(after[0].unread_count, 0);
    assert_eq!(after[0].preview.content, "release shipped");
}

// ---- Rejection leaves no trace ----

#[tokio::test]
async fn rejected_direct_frame_has_no_side_effects() {
    let h = harness(|dir| {
        dir.add_room("dm-a-b", RoomScope::Direct, &["alice", "bob"]);
    });
    h.sink.connect("bob");

    let mut frame = direct_frame("dm-a-b", "alice", "bob", "psst");
    frame.receiver_id = None;

    let err = h.dispatcher.dispatch(&h.cache, frame).await.unwrap_err();
    assert_eq!(err.code(), "validation");

    assert!(h.sink.frames_for("bob").is_empty());
    let bob = UserId("bob".into());
    assert!(h.summaries.summaries(&bob).is_empty());
}

// ---- Wire shape ----

#[tokio::test]
async fn delivered_frames_use_the_message_envelope() {
    let h = harness(|dir| {
        dir.add_room("dept-eng", RoomScope::Department, &["alice", "bob"]);
    });
    h.sink.connect("bob");

    h.dispatcher
        .dispatch(&h.cache, text_frame("dept-eng", "alice", "hello", 0))
        .await
        .unwrap();

    let frames = h.sink.frames_for("bob");
    let ServerFrame::Message { frame } = &frames[0] else {
        panic!("expected a message frame");
    };
    let wire = serde_json::to_value(&frames[0]).unwrap();
    assert_eq!(wire["type"], "message");
    assert_eq!(wire["roomId"], "dept-eng");
    assert_eq!(frame.content, "hello");
}
