use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use tokio_stream::Stream;
use tonic::async_trait;

use crate::Result;
use tiller_proto::common::LogId;

/// Ordered chunk stream backing one snapshot transfer.
pub type SnapshotChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// An opened snapshot, ready to stream.
///
/// Holds whatever resources the state machine needed to pin the snapshot
/// (file handles, a consistent view) until dropped, so acquisition is
/// scoped and release is guaranteed.
pub struct SnapshotSource {
    /// Position covered by this snapshot.
    pub last_included: LogId,
    pub chunks: SnapshotChunkStream,
}

impl SnapshotSource {
    pub fn new(
        last_included: LogId,
        chunks: SnapshotChunkStream,
    ) -> Self {
        Self {
            last_included,
            chunks,
        }
    }

    /// In-memory source over pre-materialized chunks.
    pub fn from_chunks(
        last_included: LogId,
        chunks: Vec<Bytes>,
    ) -> Self {
        Self {
            last_included,
            chunks: Box::pin(tokio_stream::iter(chunks.into_iter().map(Ok))),
        }
    }
}

impl fmt::Debug for SnapshotSource {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SnapshotSource")
            .field("last_included", &self.last_included)
            .finish()
    }
}

/// Application state machine contract, reduced to what the leader needs:
/// opening snapshots for followers that fell behind the retained log.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StateMachine: Send + Sync + 'static {
    /// Metadata of the latest snapshot, or `None` before the first one.
    fn snapshot_metadata(&self) -> Option<LogId>;

    /// Opens the latest snapshot for streaming.
    ///
    /// Returns [`crate::SnapshotError::NotAvailable`] when no snapshot
    /// exists.
    async fn open_snapshot(&self) -> Result<SnapshotSource>;
}
