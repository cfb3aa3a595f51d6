use std::sync::Arc;
use std::sync::Weak;

use tracing::info;
use tracing::warn;

use crate::NodeId;
use crate::ProgressTracker;
use crate::Result;
use crate::StateMachine;
use crate::Transport;
use crate::TypeConfig;
use crate::alias::SMOF;
use crate::alias::TROF;
use tiller_proto::snapshot::InstallSnapshotRequest;

/// One outbound snapshot transfer.
///
/// Created cold when the probe goes out and retained by the progress
/// tracker; [`Self::run`] executes only after the follower authorises the
/// transfer. Holds the tracker weakly so an abandoned transfer cannot keep
/// leader state alive.
pub struct SnapshotTransfer<T>
where
    T: TypeConfig,
{
    peer: NodeId,
    header: InstallSnapshotRequest,
    state_machine: Arc<SMOF<T>>,
    transport: Arc<TROF<T>>,
    progress: Weak<ProgressTracker>,
}

impl<T> SnapshotTransfer<T>
where
    T: TypeConfig,
{
    pub fn new(
        peer: NodeId,
        header: InstallSnapshotRequest,
        state_machine: Arc<SMOF<T>>,
        transport: Arc<TROF<T>>,
        progress: Weak<ProgressTracker>,
    ) -> Self {
        Self {
            peer,
            header,
            state_machine,
            transport,
            progress,
        }
    }

    /// Opens the snapshot and streams it to the peer, then takes the peer
    /// out of the in-flight set whatever the outcome. A failed transfer is
    /// not retried here; the next heartbeat re-probes.
    pub async fn run(self) {
        match self.transfer().await {
            Ok(()) => info!(
                peer = %self.peer,
                index = self.header.last_included_index,
                "snapshot transfer completed"
            ),
            Err(e) => warn!(peer = %self.peer, error = %e, "snapshot transfer failed"),
        }

        if let Some(progress) = self.progress.upgrade() {
            progress.finish_snapshot(&self.peer);
        }
    }

    async fn transfer(&self) -> Result<()> {
        let source = self.state_machine.open_snapshot().await?;
        self.transport.install_snapshot(&self.peer, self.header.clone(), source).await
    }
}
