//! Transport contract and the background snapshot transfer built on it.

mod snapshot_transfer;

pub use snapshot_transfer::*;


#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use tonic::async_trait;

use crate::NodeId;
use crate::Result;
use crate::SnapshotSource;
use tiller_proto::envelope::Envelope;
use tiller_proto::snapshot::InstallSnapshotRequest;

/// Point-to-point message carrier.
///
/// `send` is fire-and-forget: delivery failures surface as `Err` but carry
/// no response. Responses arrive out of band through the engine's message
/// pump. The transport is expected to preserve per-peer ordering; if it
/// reorders, correctness is preserved but stale responses cause spurious
/// rejections and throughput degrades.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one enveloped message to `target`.
    async fn send(
        &self,
        target: &NodeId,
        message: Envelope,
    ) -> Result<()>;

    /// Streams a full snapshot to `target`, blocking until the transfer
    /// completes or fails. Must observe engine cancellation cooperatively.
    async fn install_snapshot(
        &self,
        target: &NodeId,
        request: InstallSnapshotRequest,
        source: SnapshotSource,
    ) -> Result<()>;
}
