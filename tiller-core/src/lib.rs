//! # tiller-core
//!
//! The leader replication core of a Raft consensus implementation.
//!
//! While a node holds leadership this crate:
//!
//! - tracks per-follower replication progress (`next_index`/`match_index`)
//! - drives periodic heartbeats and log replication to every voting peer
//! - falls back to snapshot streaming for followers behind the retained log
//! - computes the quorum commit index across the current topology and any
//!   concurrent joint-consensus topology
//! - completes client-submitted commands once their log position commits
//! - steps down when a higher term is observed
//!
//! Everything around that is a collaborator the enclosing engine supplies:
//! the persistent log ([`RaftLog`]), the application state machine
//! ([`StateMachine`]), the transport ([`Transport`]), the membership view
//! ([`Membership`]) and the role machine listening on the [`RoleEvent`]
//! channel. Bind concrete implementations once through [`TypeConfig`].
//!
//! ## Concurrency model
//!
//! One heartbeat driver task per leader instance, at most one snapshot
//! streamer per peer, and response handlers invoked by the engine's message
//! pump, all sharing the progress tracker through fine-grained concurrent
//! maps. A `watch` token pair (engine-global plus leader-local) bounds
//! step-down and disposal latency.

mod config;
mod errors;
mod event;
mod leader;
mod membership;
mod network;
mod raft_context;
mod storage;
mod type_config;

pub use config::*;
pub use errors::*;
pub use event::*;
pub use leader::*;
pub use membership::*;
pub use network::*;
pub use raft_context::*;
pub use storage::*;
pub use type_config::*;

#[cfg(any(test, feature = "test-utils"))]
mod mock_type_config;
#[cfg(any(test, feature = "test-utils"))]
pub use mock_type_config::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;

#[cfg(test)]
mod config_test;
