use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use tonic::async_trait;
use tracing::trace;
use tracing::warn;

use crate::NodeId;
use crate::ProgressTracker;
use crate::RaftContext;
use crate::RaftLog;
use crate::Result;
use crate::SnapshotTransfer;
use crate::Transport;
use crate::TypeConfig;
use crate::alias::ROF;
use tiller_proto::common::LogId;
use tiller_proto::replication::AppendEntriesRequest;
use tiller_proto::snapshot::CanInstallSnapshotRequest;
use tiller_proto::snapshot::InstallSnapshotRequest;

/// Leader term and commit index captured at the start of a fan-out round.
#[derive(Clone, Copy, Debug)]
pub struct ReplicationView {
    pub current_term: u64,
    pub commit_index: u64,
}

/// Per-peer replication strategy: pick between shipping log entries and
/// falling back to a snapshot handshake.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReplicationCore<T>: Send + Sync + 'static
where
    T: TypeConfig,
{
    /// Drives one replication step toward `peer`.
    ///
    /// Peer-level failures (send errors) are absorbed here and retried by
    /// the next round; `Err` means a log read failed, which is fatal to the
    /// leader instance.
    async fn replicate_to_peer(
        &self,
        peer: &NodeId,
        view: &ReplicationView,
        progress: &Arc<ProgressTracker>,
        ctx: &RaftContext<T>,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct ReplicationHandler<T>
where
    T: TypeConfig,
{
    pub my_id: NodeId,
    _phantom: PhantomData<T>,
}

#[async_trait]
impl<T> ReplicationCore<T> for ReplicationHandler<T>
where
    T: TypeConfig,
{
    async fn replicate_to_peer(
        &self,
        peer: &NodeId,
        view: &ReplicationView,
        progress: &Arc<ProgressTracker>,
        ctx: &RaftContext<T>,
    ) -> Result<()> {
        // An active snapshot handshake owns this peer entirely.
        if progress.snapshot_in_flight(peer) {
            trace!(peer = %peer, "snapshot in flight, skipping append entries");
            return Ok(());
        }

        let next_index = progress.next_index(peer).unwrap_or(1);

        // A follower whose next entry predates the earliest retained log
        // entry cannot be caught up by AppendEntries.
        if let Some(snapshot) = ctx.raft_log().last_snapshot() {
            if next_index < snapshot.index {
                self.begin_snapshot_handshake(peer, snapshot, view, progress, ctx).await;
                return Ok(());
            }
        }

        let request = self.build_append_request(ctx.raft_log(), next_index, view, ctx)?;
        let entries = request.entries.clone();

        trace!(
            peer = %peer,
            next_index,
            batch = entries.len(),
            "replicating to peer"
        );

        if let Err(e) = ctx.transport().send(peer, request.into()).await {
            warn!(peer = %peer, error = %e, "append entries send failed");
            return Ok(());
        }

        ctx.observers.entries_appended(&entries);
        Ok(())
    }
}

impl<T> ReplicationHandler<T>
where
    T: TypeConfig,
{
    pub fn new(my_id: NodeId) -> Self {
        Self {
            my_id,
            _phantom: PhantomData,
        }
    }

    /// Arms a snapshot transfer for `peer` and sends the probe.
    ///
    /// The transfer is created cold and retained in the progress tracker so
    /// the peer is atomically in-flight from this moment; only an
    /// affirmative probe response actually starts it.
    async fn begin_snapshot_handshake(
        &self,
        peer: &NodeId,
        snapshot: LogId,
        view: &ReplicationView,
        progress: &Arc<ProgressTracker>,
        ctx: &RaftContext<T>,
    ) {
        let header = InstallSnapshotRequest {
            term: view.current_term,
            last_included_index: snapshot.index,
            last_included_term: snapshot.term,
            from: self.my_id.to_string(),
        };
        let transfer = SnapshotTransfer::<T>::new(
            peer.clone(),
            header,
            Arc::clone(ctx.state_machine()),
            Arc::clone(ctx.transport()),
            Arc::downgrade(progress),
        );
        progress.begin_snapshot(peer.clone(), Box::pin(transfer.run()));

        let probe = CanInstallSnapshotRequest {
            from: self.my_id.to_string(),
            leader_id: self.my_id.to_string(),
            index: snapshot.index,
            term: snapshot.term,
        };
        if let Err(e) = ctx.transport().send(peer, probe.into()).await {
            // Without the probe the follower will never authorise the
            // transfer; release the peer so the next round can retry.
            warn!(peer = %peer, error = %e, "snapshot probe send failed");
            progress.finish_snapshot(peer);
        }
    }

    /// Builds the AppendEntries request for a peer whose next index is
    /// `next_index`.
    ///
    /// The batch carries entries strictly after `next_index`; an empty
    /// batch is a plain heartbeat whose consistency point is the leader's
    /// log tail. A missing previous entry means the peer is at the very
    /// beginning and the zero entry stands in.
    pub fn build_append_request(
        &self,
        raft_log: &Arc<ROF<T>>,
        next_index: u64,
        view: &ReplicationView,
        ctx: &RaftContext<T>,
    ) -> Result<AppendEntriesRequest> {
        let max_entries = ctx.node_config.replication.max_entries_per_request;
        let entries = raft_log.entries_after(next_index, max_entries)?;

        let prev_log = if entries.is_empty() {
            raft_log.last_entry().map(|e| e.log_id())
        } else {
            let first_index = entries[0].index;
            raft_log.entry(first_index.saturating_sub(1))?.map(|e| e.log_id())
        }
        .unwrap_or_else(LogId::zero);

        Ok(AppendEntriesRequest {
            term: view.current_term,
            leader_id: self.my_id.to_string(),
            prev_log_index: prev_log.index,
            prev_log_term: prev_log.term,
            entries,
            leader_commit: view.commit_index,
            from: self.my_id.to_string(),
        })
    }
}

impl<T> Debug for ReplicationHandler<T>
where
    T: TypeConfig,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ReplicationHandler").field("my_id", &self.my_id).finish()
    }
}
