// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room Scope Resolver.
//!
//! Classifies a target room by scope, checks the sender's membership before
//! any message is admitted, validates DIRECT receiver requirements, and
//! redirects archive uploads to a room's paired archive sub-room. Scope and
//! format are closed enums matched exhaustively; there is no string-literal
//! fallthrough anywhere on this path.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use huddle_core::{
    ChatKind, HuddleError, MembershipDirectory, MessageFormat, MessageFrame, RoomId, RoomInfo,
    RoomScope, UserId,
};

/// Per-connection cache of resolved room metadata.
///
/// Owned by one connection task and dropped when the connection closes, so
/// membership is never cached beyond a session's lifetime.
#[derive(Default)]
pub struct SessionCache {
    rooms: DashMap<RoomId, RoomInfo>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, room_id: &RoomId) -> Option<RoomInfo> {
        self.rooms.get(room_id).map(|entry| entry.clone())
    }

    fn insert(&self, info: RoomInfo) {
        self.rooms.insert(info.room_id.clone(), info);
    }
}

/// A room a message has been admitted to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoom {
    /// Where the message actually lands. Differs from the frame's room id
    /// only for archive uploads into a room with a paired sub-room.
    pub target_room: RoomId,
    pub scope: RoomScope,
    pub members: Vec<UserId>,
}

/// Classifies rooms and admits senders against the membership directory.
pub struct ScopeResolver {
    directory: Arc<dyn MembershipDirectory>,
}

impl ScopeResolver {
    pub fn new(directory: Arc<dyn MembershipDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves a frame's target room and admits the sender.
    ///
    /// Runs synchronously before dispatch; no message is fanned out
    /// speculatively. Rejections: [`HuddleError::UnknownRoom`],
    /// [`HuddleError::NotMember`], [`HuddleError::Validation`].
    pub async fn resolve(
        &self,
        cache: &SessionCache,
        frame: &MessageFrame,
    ) -> Result<ResolvedRoom, HuddleError> {
        let info = self.lookup(cache, &frame.room_id).await?;

        if !info.members.contains(&frame.sender_id) {
            return Err(HuddleError::NotMember {
                user: frame.sender_id.clone(),
                room: frame.room_id.clone(),
            });
        }

        match info.scope {
            RoomScope::Direct => {
                if frame.chat_type != ChatKind::Direct {
                    return Err(HuddleError::Validation(format!(
                        "room {} is DIRECT but frame chatType is {}",
                        frame.room_id, frame.chat_type
                    )));
                }
                let receiver = frame.receiver_id.as_ref().ok_or_else(|| {
                    HuddleError::Validation(format!(
                        "DIRECT message to room {} is missing receiverId",
                        frame.room_id
                    ))
                })?;
                if !info.members.contains(receiver) {
                    return Err(HuddleError::Validation(format!(
                        "receiver {} is not a member of room {}",
                        receiver, frame.room_id
                    )));
                }
            }
            RoomScope::Department | RoomScope::Project => {
                if frame.chat_type != ChatKind::Group {
                    return Err(HuddleError::Validation(format!(
                        "room {} is {} but frame chatType is {}",
                        frame.room_id, info.scope, frame.chat_type
                    )));
                }
            }
        }

        // Archive uploads always land in the paired sub-room when one
        // exists; it shares the parent room's membership.
        let target_room = match (frame.format, &info.archive_room_id) {
            (MessageFormat::Archive, Some(archive_room)) => archive_room.clone(),
            (MessageFormat::Archive, None) | (MessageFormat::Text, _) => info.room_id.clone(),
        };

        debug!(
            room = %frame.room_id,
            target = %target_room,
            scope = %info.scope,
            sender = %frame.sender_id,
            "message admitted"
        );

        Ok(ResolvedRoom {
            target_room,
            scope: info.scope,
            members: info.members,
        })
    }

    /// Looks up a room and checks that `user` belongs to it.
    ///
    /// Used by the gateway for room-open history seeding and unread
    /// acknowledgements, which carry no frame to validate.
    pub async fn member_room(
        &self,
        cache: &SessionCache,
        user: &UserId,
        room_id: &RoomId,
    ) -> Result<RoomInfo, HuddleError> {
        let info = self.lookup(cache, room_id).await?;
        if !info.members.contains(user) {
            return Err(HuddleError::NotMember {
                user: user.clone(),
                room: room_id.clone(),
            });
        }
        Ok(info)
    }

    async fn lookup(
        &self,
        cache: &SessionCache,
        room_id: &RoomId,
    ) -> Result<RoomInfo, HuddleError> {
        if let Some(cached) = cache.get(room_id) {
            return Ok(cached);
        }
        let info = self
            .directory
            .room_info(room_id)
            .await?
            .ok_or_else(|| HuddleError::UnknownRoom(room_id.clone()))?;
        cache.insert(info.clone());
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_test_utils::{direct_frame, text_frame, MockDirectory};

    fn resolver_with(dir: MockDirectory) -> ScopeResolver {
        ScopeResolver::new(Arc::new(dir))
    }

    #[tokio::test]
    async fn unknown_room_is_rejected() {
        let resolver = resolver_with(MockDirectory::new());
        let cache = SessionCache::new();
        let err = resolver
            .resolve(&cache, &text_frame("ghost", "alice", "hi", 0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unknown_room");
    }

    #[tokio::test]
    async fn non_member_sender_is_rejected() {
        let dir = MockDirectory::new();
        dir.add_room("dept-7", RoomScope::Department, &["alice", "bob"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        let err = resolver
            .resolve(&cache, &text_frame("dept-7", "mallory", "hi", 0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_member");
    }

    #[tokio::test]
    async fn group_message_resolves_with_members() {
        let dir = MockDirectory::new();
        dir.add_room("proj-x", RoomScope::Project, &["alice", "bob", "carol"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        let resolved = resolver
            .resolve(&cache, &text_frame("proj-x", "alice", "shipped", 0))
            .await
            .unwrap();
        assert_eq!(resolved.scope, RoomScope::Project);
        assert_eq!(resolved.target_room, RoomId("proj-x".into()));
        assert_eq!(resolved.members.len(), 3);
    }

    #[tokio::test]
    async fn direct_without_receiver_is_a_validation_error() {
        let dir = MockDirectory::new();
        dir.add_room("dm-1", RoomScope::Direct, &["alice", "bob"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        // Membership is fine; the frame shape is not.
        let mut frame = direct_frame("dm-1", "alice", "bob", "hi");
        frame.receiver_id = None;
        let err = resolver.resolve(&cache, &frame).await.unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[tokio::test]
    async fn direct_receiver_must_be_a_member() {
        let dir = MockDirectory::new();
        dir.add_room("dm-1", RoomScope::Direct, &["alice", "bob"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        let err = resolver
            .resolve(&cache, &direct_frame("dm-1", "alice", "mallory", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[tokio::test]
    async fn chat_type_must_match_room_scope() {
        let dir = MockDirectory::new();
        dir.add_room("dept-7", RoomScope::Department, &["alice", "bob"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        let err = resolver
            .resolve(&cache, &direct_frame("dept-7", "alice", "bob", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[tokio::test]
    async fn archive_upload_lands_in_paired_subroom() {
        let dir = MockDirectory::new();
        dir.add_room_info(RoomInfo {
            room_id: RoomId("dept-7".into()),
            scope: RoomScope::Department,
            members: vec![UserId("alice".into()), UserId("bob".into())],
            archive_room_id: Some(RoomId("arc-dept-7".into())),
        });
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        let resolved = resolver
            .resolve(
                &cache,
                &huddle_test_utils::archive_frame("dept-7", "alice", "plan.pdf", &[]),
            )
            .await
            .unwrap();
        assert_eq!(resolved.target_room, RoomId("arc-dept-7".into()));

        // TEXT messages to the same room stay in the parent room.
        let resolved = resolver
            .resolve(&cache, &text_frame("dept-7", "alice", "see file", 0))
            .await
            .unwrap();
        assert_eq!(resolved.target_room, RoomId("dept-7".into()));
    }

    #[tokio::test]
    async fn session_cache_serves_repeat_lookups() {
        let dir = MockDirectory::new();
        dir.add_room("dept-7", RoomScope::Department, &["alice", "bob"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        resolver
            .resolve(&cache, &text_frame("dept-7", "alice", "one", 0))
            .await
            .unwrap();
        assert!(cache.get(&RoomId("dept-7".into())).is_some());
    }

    #[tokio::test]
    async fn member_room_checks_membership() {
        let dir = MockDirectory::new();
        dir.add_room("dept-7", RoomScope::Department, &["alice"]);
        let resolver = resolver_with(dir);
        let cache = SessionCache::new();

        assert!(resolver
            .member_room(&cache, &UserId("alice".into()), &RoomId("dept-7".into()))
            .await
            .is_ok());
        let err = resolver
            .member_room(&cache, &UserId("bob".into()), &RoomId("dept-7".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_member");
    }
}
