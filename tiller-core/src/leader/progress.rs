use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::trace;

use crate::NodeId;

/// A cold snapshot transfer, armed but not yet spawned.
pub type SnapshotTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Replication progress of a single peer as tracked by the leader.
///
/// Raft paper §5.3 Figure 2: `next_index` is the optimistic guess of the
/// next entry to ship, `match_index` the highest entry known replicated.
/// After any response update `match_index <= next_index - 1`, and
/// `next_index >= 1` always.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerProgress {
    pub next_index: u64,
    pub match_index: u64,
}

/// Where an in-flight snapshot handshake stands for one peer.
pub(crate) enum SnapshotPhase {
    /// Probe sent; the transfer is retained here until the follower
    /// authorises it.
    Prepared(Mutex<Option<SnapshotTask>>),
    /// Transfer task spawned and running.
    Streaming(JoinHandle<()>),
}

/// Per-peer replication bookkeeping, shared between the heartbeat driver,
/// response handlers and snapshot transfer tasks.
///
/// A peer present in the snapshot set receives no AppendEntries traffic
/// until the entry is removed, covering the whole window from the decision
/// to install through the streamer's completion or abort.
#[derive(Default)]
pub struct ProgressTracker {
    progress: DashMap<NodeId, PeerProgress>,
    snapshots: DashMap<NodeId, SnapshotPhase>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets tracking for a fresh leadership: every peer starts with
    /// `next_index` one past the leader's log and nothing known replicated.
    pub fn initialize(
        &self,
        last_log_index: u64,
        peers: impl IntoIterator<Item = NodeId>,
    ) {
        for peer in peers {
            debug!(peer = %peer, next_index = last_log_index + 1, "init peer progress");
            self.progress.insert(
                peer,
                PeerProgress {
                    next_index: last_log_index + 1,
                    match_index: 0,
                },
            );
        }
    }

    /// Records a confirmed replication up to `last_log_index`.
    pub fn record_success(
        &self,
        peer: &NodeId,
        last_log_index: u64,
    ) {
        self.progress.insert(
            peer.clone(),
            PeerProgress {
                next_index: last_log_index + 1,
                match_index: last_log_index,
            },
        );
    }

    /// Walks `next_index` back one entry after a consistency rejection,
    /// clamped at 1. Deliberately unhinted: simple and convergent.
    pub fn record_rejection(
        &self,
        peer: &NodeId,
    ) {
        let mut entry = self.progress.entry(peer.clone()).or_insert(PeerProgress {
            next_index: 1,
            match_index: 0,
        });
        if entry.next_index > 1 {
            entry.next_index -= 1;
        }
    }

    pub fn next_index(
        &self,
        peer: &NodeId,
    ) -> Option<u64> {
        self.progress.get(peer).map(|p| p.next_index)
    }

    pub fn match_index(
        &self,
        peer: &NodeId,
    ) -> Option<u64> {
        self.progress.get(peer).map(|p| p.match_index)
    }

    pub fn get(
        &self,
        peer: &NodeId,
    ) -> Option<PeerProgress> {
        self.progress.get(peer).map(|p| *p)
    }

    /// Point-in-time copy of every peer's `match_index`, for quorum math.
    pub fn match_indexes(&self) -> HashMap<NodeId, u64> {
        self.progress.iter().map(|e| (e.key().clone(), e.value().match_index)).collect()
    }

    pub fn snapshot_in_flight(
        &self,
        peer: &NodeId,
    ) -> bool {
        self.snapshots.contains_key(peer)
    }

    /// Marks `peer` as snapshot-in-flight, retaining the armed transfer
    /// until [`Self::start_prepared`] releases it.
    pub fn begin_snapshot(
        &self,
        peer: NodeId,
        task: SnapshotTask,
    ) {
        trace!(peer = %peer, "snapshot handshake started");
        self.snapshots.insert(peer, SnapshotPhase::Prepared(Mutex::new(Some(task))));
    }

    /// Spawns the armed transfer for `peer`, switching the session to
    /// streaming in place so the peer never momentarily leaves the
    /// in-flight set. Returns false when nothing is prepared.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_prepared(
        &self,
        peer: &NodeId,
    ) -> bool {
        let Some(mut session) = self.snapshots.get_mut(peer) else {
            return false;
        };
        let task = match &mut *session {
            SnapshotPhase::Prepared(task) => task.lock().unwrap().take(),
            SnapshotPhase::Streaming(_) => None,
        };
        match task {
            Some(task) => {
                *session = SnapshotPhase::Streaming(tokio::spawn(task));
                true
            }
            None => false,
        }
    }

    /// Takes `peer` out of the in-flight set. Dropping a prepared transfer
    /// discards it; a running streamer is left to finish on its own.
    pub fn finish_snapshot(
        &self,
        peer: &NodeId,
    ) {
        if self.snapshots.remove(peer).is_some() {
            trace!(peer = %peer, "snapshot session cleared");
        }
    }

    /// Drops every snapshot session. Running streamers keep going detached
    /// and observe cancellation through the transport.
    pub fn abandon_snapshots(&self) {
        self.snapshots.clear();
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("peers", &self.progress.len())
            .field("snapshots_in_flight", &self.snapshots.len())
            .finish()
    }
}
