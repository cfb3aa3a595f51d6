//! The leader replication subsystem.
//!
//! Everything here is volatile state created on transition to leader and
//! destroyed on transition away; durable state lives behind the storage
//! traits.

pub mod leader_state;
pub mod pending;
pub mod progress;
pub mod quorum;
pub mod replication;

#[cfg(test)]
mod leader_state_test;
#[cfg(test)]
mod progress_test;
#[cfg(test)]
mod quorum_test;

pub use leader_state::*;
pub use pending::*;
pub use progress::*;
pub use quorum::*;
pub use replication::*;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::NodeId;

/// Term and commit state shared between the heartbeat driver and the
/// response handlers, which run concurrently.
pub struct SharedState {
    node_id: NodeId,
    current_term: AtomicU64,
    commit_index: AtomicU64,
}

impl SharedState {
    pub fn new(
        node_id: NodeId,
        current_term: u64,
        commit_index: u64,
    ) -> Self {
        Self {
            node_id,
            current_term: AtomicU64::new(current_term),
            commit_index: AtomicU64::new(commit_index),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn current_term(&self) -> u64 {
        self.current_term.load(Ordering::Acquire)
    }

    /// Adopts a higher observed term. Terms never move backwards.
    pub(crate) fn update_current_term(
        &self,
        term: u64,
    ) {
        self.current_term.fetch_max(term, Ordering::AcqRel);
    }

    pub fn commit_index(&self) -> u64 {
        self.commit_index.load(Ordering::Acquire)
    }

    /// Raises the commit index monotonically; returns the previous value.
    pub(crate) fn advance_commit_index(
        &self,
        new_commit_index: u64,
    ) -> u64 {
        self.commit_index.fetch_max(new_commit_index, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("node_id", &self.node_id)
            .field("current_term", &self.current_term())
            .field("commit_index", &self.commit_index())
            .finish()
    }
}
