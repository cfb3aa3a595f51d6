//! Error hierarchy for the replication core, categorized by protocol layer
//! and operational concern.
//!
//! Peer-level failures (send errors, rejected requests, broken snapshot
//! streams) are absorbed where they occur and converged by retry; only
//! storage failures and fatal conditions travel up through these types.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raft consensus protocol violations and failures
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// Configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Persistent log failures; fatal to the current leader instance
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Transport-level failures
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Unrecoverable failures requiring a role transition
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// Log replication failures (Section 5.3 Raft paper)
    #[error(transparent)]
    Replication(#[from] ReplicationError),

    /// Snapshot acquisition or streaming failures (Section 7 Raft paper)
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    /// Operation requires leadership that this instance no longer holds
    #[error("node is no longer the leader")]
    NotLeader,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The state machine has no snapshot to offer
    #[error("no snapshot available")]
    NotAvailable,
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Point-to-point send failure
    #[error("failed to send {request_type} to {peer}")]
    SendFailed {
        request_type: &'static str,
        peer: String,
    },

    /// Streaming transfer interrupted mid-flight
    #[error("stream to {peer} aborted: {reason}")]
    StreamAborted { peer: String, reason: String },

    /// Peer communication timeout
    #[error("connection timeout to {peer} after {duration:?}")]
    Timeout { peer: String, duration: Duration },

    /// In-process signal channel closed on the receiving side
    #[error("signal send failed: {0}")]
    SignalSendFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Log read failed during replication assembly
    #[error("log read failed at index {index}: {reason}")]
    ReadFailed { index: u64, reason: String },

    /// Leader-side append failed
    #[error("log append failed: {0}")]
    AppendFailed(String),
}

impl From<ReplicationError> for Error {
    fn from(e: ReplicationError) -> Self {
        Error::Consensus(ConsensusError::Replication(e))
    }
}

impl From<SnapshotError> for Error {
    fn from(e: SnapshotError) -> Self {
        Error::Consensus(ConsensusError::Snapshot(e))
    }
}
