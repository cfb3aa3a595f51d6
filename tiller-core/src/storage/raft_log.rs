//! Persistent log contract, as the leader sees it.
//!
//! Key safety properties the implementation must uphold (Raft paper §5.3):
//! 1. Log Matching: two logs holding an entry with the same index and term
//!    are identical in all preceding entries
//! 2. Leader Append-Only: the leader never overwrites or deletes entries
//! 3. Assigned indexes are unique and monotonically increasing

use bytes::Bytes;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use tonic::async_trait;

use crate::Result;
use tiller_proto::common::EntryKind;
use tiller_proto::common::LogEntry;
use tiller_proto::common::LogId;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RaftLog: Send + Sync + 'static {
    /// Latest persisted term.
    ///
    /// The leader caches this at creation; it changes only through the
    /// engine's term updates, which also dispose the leader.
    fn current_term(&self) -> u64;

    /// The newest entry, or `None` on an empty log.
    fn last_entry(&self) -> Option<LogEntry>;

    /// Entry at `index`.
    ///
    /// `Ok(None)` when the index is out of range (compacted or beyond the
    /// tail); `Err` only for unrecoverable storage failures, which are
    /// fatal to the current leader instance.
    fn entry(
        &self,
        index: u64,
    ) -> Result<Option<LogEntry>>;

    /// Up to `limit` entries with index strictly greater than `index`,
    /// ordered ascending.
    fn entries_after(
        &self,
        index: u64,
        limit: u64,
    ) -> Result<Vec<LogEntry>>;

    /// Appends a leader-originated record and returns its assigned index.
    ///
    /// Must be atomic under concurrent appends: each call observes a
    /// unique, strictly increasing index.
    async fn append_command(
        &self,
        kind: EntryKind,
        payload: Bytes,
        term: u64,
    ) -> Result<u64>;

    /// Metadata of the most recent snapshot, or `None` before the first
    /// compaction. Entries at or below the returned index may no longer be
    /// readable from the log.
    fn last_snapshot(&self) -> Option<LogId>;
}
