use std::sync::Arc;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::NodeId;
use tiller_proto::common::LogEntry;

/// Payload of a commit-index advancement notification.
#[derive(Debug, Clone)]
pub struct NewCommitData {
    pub new_commit_index: u64,
    pub current_term: u64,
}

/// Events the leader raises toward the enclosing engine.
///
/// The engine owns role transitions and state machine application; the
/// leader only signals. Events are delivered over an unbounded channel so
/// raising one never blocks a response handler.
#[derive(Debug)]
pub enum RoleEvent {
    /// A higher term was observed; the engine must adopt `term` and
    /// transition this node to follower. `leader_hint` names the leader the
    /// responder follows, when it told us.
    BecomeFollower {
        term: u64,
        leader_hint: Option<NodeId>,
    },

    /// Quorum agreed on a new commit index; the engine applies the freshly
    /// committed range to the state machine.
    NotifyNewCommitIndex(NewCommitData),

    /// The leader hit an unrecoverable failure (persistent log read error)
    /// and can no longer drive replication.
    Fatal(String),
}

/// Notification hooks fired by the replication machinery.
///
/// Subscribers are invoked synchronously right after the emission they
/// mirror, so they must be cheap.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait RaftObserver: Send + Sync + 'static {
    /// One heartbeat fan-out round completed.
    fn heartbeat_sent(&self) {}

    /// A batch of entries went out to a peer. Mirrors what that follower
    /// will observe on receipt, letting local subscribers react as if the
    /// leader were also a follower of itself.
    fn entries_appended(
        &self,
        entries: &[LogEntry],
    ) {
        let _ = entries;
    }
}

/// Synchronous fan-out list of [`RaftObserver`] subscribers.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    subscribers: Vec<Arc<dyn RaftObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        observer: Arc<dyn RaftObserver>,
    ) {
        self.subscribers.push(observer);
    }

    pub(crate) fn heartbeat_sent(&self) {
        for subscriber in &self.subscribers {
            subscriber.heartbeat_sent();
        }
    }

    pub(crate) fn entries_appended(
        &self,
        entries: &[LogEntry],
    ) {
        for subscriber in &self.subscribers {
            subscriber.entries_appended(entries);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
