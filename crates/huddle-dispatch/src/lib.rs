// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message Dispatcher.
//!
//! One lazily-spawned worker task per room id is the single serialization
//! point on the hot path: jobs are handled strictly in submission order
//! within a room, and no ordering is promised across rooms. Each job
//! carries a oneshot so the sender gets the result synchronously.
//!
//! Dispatch order inside the worker:
//! 1. ARCHIVE frames only: create the backing archive item; a failure here
//!    aborts the whole dispatch (no message without its item).
//! 2. Update every member's room summary, offline members included.
//! 3. Best-effort push to every currently-connected member.
//!
//! Admission (scope classification + membership + receiver validation)
//! happens before a job is enqueued, so nothing is fanned out
//! speculatively.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use huddle_core::{
    ArchiveStore, FrameSink, HuddleError, MessageFormat, MessageFrame, NewArchiveItem, RoomId,
    ServerFrame, UserId,
};
use huddle_rooms::{ScopeResolver, SessionCache};
use huddle_summary::SummaryStore;
use huddle_tags::{extract_tags, merge_tags};

/// Per-room job queue depth. A full queue applies backpressure to senders
/// rather than dropping jobs.
const ROOM_QUEUE_DEPTH: usize = 256;

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Members whose live connection accepted the frame. Observability
    /// only: a lower count never implies loss, history backfill exists.
    pub delivered: usize,
}

struct DispatchJob {
    frame: MessageFrame,
    members: Vec<UserId>,
    reply: oneshot::Sender<Result<DispatchResult, HuddleError>>,
}

/// Routes admitted messages through per-room worker tasks.
pub struct Dispatcher {
    resolver: Arc<ScopeResolver>,
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    archive: Arc<dyn ArchiveStore>,
    summaries: Arc<SummaryStore>,
    sink: Arc<dyn FrameSink>,
    workers: DashMap<RoomId, mpsc::Sender<DispatchJob>>,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<ScopeResolver>,
        archive: Arc<dyn ArchiveStore>,
        summaries: Arc<SummaryStore>,
        sink: Arc<dyn FrameSink>,
    ) -> Self {
        Self {
            resolver,
            inner: Arc::new(DispatcherInner {
                archive,
                summaries,
                sink,
                workers: DashMap::new(),
            }),
        }
    }

    /// Admits and dispatches one message, returning synchronously.
    ///
    /// Rejections are never retried by the core; the caller decides
    /// whether to resubmit. `cache` is the sending connection's session
    /// cache for membership lookups.
    pub async fn dispatch(
        &self,
        cache: &SessionCache,
        frame: MessageFrame,
    ) -> Result<DispatchResult, HuddleError> {
        let resolved = self.resolver.resolve(cache, &frame).await?;

        // Normalize addressing at admission: archive uploads into a room
        // with a paired sub-room land there.
        let mut frame = frame;
        frame.room_id = resolved.target_room.clone();

        let (reply_tx, reply_rx) = oneshot::channel();
        let job = DispatchJob {
            frame,
            members: resolved.members,
            reply: reply_tx,
        };

        let worker = self.worker_for(&resolved.target_room);
        worker
            .send(job)
            .await
            .map_err(|_| HuddleError::Internal("room dispatch worker is gone".into()))?;

        reply_rx
            .await
            .map_err(|_| HuddleError::Internal("room dispatch worker dropped the reply".into()))?
    }

    /// Returns the room's job queue, spawning its worker on first use.
    fn worker_for(&self, room_id: &RoomId) -> mpsc::Sender<DispatchJob> {
        if let Some(existing) = self.inner.workers.get(room_id) {
            return existing.clone();
        }

        let entry = self.inner.workers.entry(room_id.clone()).or_insert_with(|| {
            let (tx, rx) = mpsc::channel(ROOM_QUEUE_DEPTH);
            let inner = Arc::clone(&self.inner);
            let room = room_id.clone();
            tokio::spawn(run_worker(room, inner, rx));
            tx
        });
        entry.clone()
    }
}

/// Serialized dispatch loop for one room. Lives for the process lifetime;
/// rooms are not deleted by this core.
async fn run_worker(
    room_id: RoomId,
    inner: Arc<DispatcherInner>,
    mut rx: mpsc::Receiver<DispatchJob>,
) {
    debug!(room = %room_id, "room dispatch worker started");
    while let Some(job) = rx.recv().await {
        let result = handle_job(&inner, job.frame, &job.members).await;
        if job.reply.send(result).is_err() {
            // Sender's connection went away mid-dispatch; the dispatch
            // itself still completed (or failed) above.
            warn!(room = %room_id, "dispatch result had no receiver");
        }
    }
}

async fn handle_job(
    inner: &DispatcherInner,
    frame: MessageFrame,
    members: &[UserId],
) -> Result<DispatchResult, HuddleError> {
    // ARCHIVE messages are only admitted once their backing item exists.
    if frame.format == MessageFormat::Archive {
        let confirmed = frame.tag_names.clone().unwrap_or_default();
        let tags = merge_tags(&confirmed, &extract_tags(&frame.content));
        let item = inner
            .archive
            .create_item(NewArchiveItem {
                room_id: frame.room_id.clone(),
                uploader: frame.sender_id.clone(),
                file_name: frame.content.clone(),
                tags,
            })
            .await?;
        debug!(item = %item.id, room = %frame.room_id, "archive item created");
    }

    // Summary updates always happen, unlike socket delivery.
    inner.summaries.on_dispatch(&frame.room_id, &frame, members);

    let wire = ServerFrame::Message {
        frame: frame.clone(),
    };
    let mut delivered = 0;
    for member in members {
        if inner.sink.push_frame(member, &wire) {
            delivered += 1;
        }
    }

    debug!(
        room = %frame.room_id,
        sender = %frame.sender_id,
        delivered,
        members = members.len(),
        "message dispatched"
    );

    Ok(DispatchResult { delivered })
}
