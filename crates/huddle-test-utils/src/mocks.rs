// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock implementations of the chat core's external seams.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use huddle_core::{
    ArchiveItem, ArchiveStore, AuthVerifier, FrameSink, HistoryStore, HuddleError,
    MembershipDirectory, MessageFrame, NewArchiveItem, RoomId, RoomInfo, RoomScope, ServerFrame,
    TagIndex, TagName, UserId,
};

/// In-memory membership directory seeded per test.
#[derive(Default)]
pub struct MockDirectory {
    rooms: Mutex<HashMap<RoomId, RoomInfo>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a room with the given scope and members.
    pub fn add_room(&self, room: &str, scope: RoomScope, members: &[&str]) {
        self.add_room_info(RoomInfo {
            room_id: RoomId(room.to_string()),
            scope,
            members: members.iter().map(|m| UserId(m.to_string())).collect(),
            archive_room_id: None,
        });
    }

    /// Registers a room with full metadata, including a paired archive sub-room.
    pub fn add_room_info(&self, info: RoomInfo) {
        self.rooms
            .lock()
            .expect("directory lock")
            .insert(info.room_id.clone(), info);
    }
}

#[async_trait]
impl MembershipDirectory for MockDirectory {
    async fn room_info(&self, room_id: &RoomId) -> Result<Option<RoomInfo>, HuddleError> {
        Ok(self.rooms.lock().expect("directory lock").get(room_id).cloned())
    }
}

/// Archive store mock that records created items and can be told to fail.
#[derive(Default)]
pub struct MockArchiveStore {
    created: Mutex<Vec<ArchiveItem>>,
    fail_next: AtomicBool,
    counter: AtomicUsize,
}

impl MockArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_item` call fail with an upstream error.
    pub fn set_failing(&self, failing: bool) {
        self.fail_next.store(failing, Ordering::SeqCst);
    }

    /// Items created so far, in creation order.
    pub fn created_items(&self) -> Vec<ArchiveItem> {
        self.created.lock().expect("archive lock").clone()
    }
}

#[async_trait]
impl ArchiveStore for MockArchiveStore {
    async fn create_item(&self, item: NewArchiveItem) -> Result<ArchiveItem, HuddleError> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(HuddleError::upstream("archive store unavailable"));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let created = ArchiveItem {
            id: format!("arc-{n}"),
            room_id: item.room_id,
            uploader_nickname: item.uploader.0,
            file_name: item.file_name.clone(),
            file_url: format!("https://files.internal/arc-{n}/{}", item.file_name),
            tags: item.tags,
            created_at: Utc::now(),
        };
        self.created.lock().expect("archive lock").push(created.clone());
        Ok(created)
    }
}

/// Prefix-matching tag index that counts how many queries it served.
#[derive(Default)]
pub struct MockTagIndex {
    tags: Mutex<Vec<TagName>>,
    queries: AtomicUsize,
}

impl MockTagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(tags: Vec<TagName>) -> Self {
        Self {
            tags: Mutex::new(tags),
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of `search_prefix` calls that actually reached the index.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagIndex for MockTagIndex {
    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<TagName>, HuddleError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tags
            .lock()
            .expect("index lock")
            .iter()
            .filter(|t| t.0.starts_with(prefix))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// History store mock; tests record dispatched frames to emulate the
/// external persistence path.
#[derive(Default)]
pub struct MockHistory {
    messages: Mutex<HashMap<RoomId, Vec<MessageFrame>>>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame to a room's persisted history (ascending order is
    /// the caller's responsibility, as with the real store).
    pub fn record(&self, frame: MessageFrame) {
        self.messages
            .lock()
            .expect("history lock")
            .entry(frame.room_id.clone())
            .or_default()
            .push(frame);
    }
}

#[async_trait]
impl HistoryStore for MockHistory {
    async fn room_messages(&self, room_id: &RoomId) -> Result<Vec<MessageFrame>, HuddleError> {
        Ok(self
            .messages
            .lock()
            .expect("history lock")
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Auth verifier backed by a static token table.
#[derive(Default)]
pub struct StaticAuth {
    tokens: Mutex<HashMap<String, UserId>>,
}

impl StaticAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: &str, user: &str) -> Self {
        self.tokens
            .lock()
            .expect("auth lock")
            .insert(token.to_string(), UserId(user.to_string()));
        self
    }
}

#[async_trait]
impl AuthVerifier for StaticAuth {
    async fn verify(&self, token: &str) -> Result<UserId, HuddleError> {
        self.tokens
            .lock()
            .expect("auth lock")
            .get(token)
            .cloned()
            .ok_or_else(|| HuddleError::Auth("unrecognized bearer token".into()))
    }
}

/// Frame sink that captures pushes per user instead of writing to sockets.
#[derive(Default)]
pub struct CaptureSink {
    pushed: Mutex<HashMap<UserId, Vec<ServerFrame>>>,
    connected: Mutex<HashSet<UserId>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a user as having a live connection handle.
    pub fn connect(&self, user: &str) {
        self.connected
            .lock()
            .expect("sink lock")
            .insert(UserId(user.to_string()));
    }

    /// Drops a user's live handle; later pushes to them are discarded.
    pub fn disconnect(&self, user: &str) {
        self.connected
            .lock()
            .expect("sink lock")
            .remove(&UserId(user.to_string()));
    }

    /// Frames pushed to a user's live handle, in push order.
    pub fn frames_for(&self, user: &str) -> Vec<ServerFrame> {
        self.pushed
            .lock()
            .expect("sink lock")
            .get(&UserId(user.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl FrameSink for CaptureSink {
    fn push_frame(&self, user: &UserId, frame: &ServerFrame) -> bool {
        if !self.connected.lock().expect("sink lock").contains(user) {
            return false;
        }
        self.pushed
            .lock()
            .expect("sink lock")
            .entry(user.clone())
            .or_default()
            .push(frame.clone());
        true
    }

    fn is_connected(&self, user: &UserId) -> bool {
        self.connected.lock().expect("sink lock").contains(user)
    }
}
