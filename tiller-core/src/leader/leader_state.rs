use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::sleep;
use tokio::time::timeout;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::SharedState;
use crate::CommandCompletion;
use crate::Membership;
use crate::NewCommitData;
use crate::NodeId;
use crate::PendingCommand;
use crate::PendingCommands;
use crate::ProgressTracker;
use crate::RaftContext;
use crate::RaftLog;
use crate::ReplicationCore;
use crate::ReplicationError;
use crate::ReplicationView;
use crate::Result;
use crate::RoleEvent;
use crate::TypeConfig;
use crate::quorum_commit_index;
use tiller_proto::common::EntryKind;
use tiller_proto::replication::AppendEntriesResponse;
use tiller_proto::snapshot::CanInstallSnapshotResponse;

/// Leader-volatile state plus the heartbeat driver that keeps followers
/// fed.
///
/// Created on transition to leader, destroyed on transition away. The
/// response handlers run on the engine's message pump concurrently with
/// the driver; everything mutable is shared through atomics, the progress
/// tracker and async-aware queues.
pub struct LeaderState<T: TypeConfig> {
    shared: SharedState,

    /// Per-peer `next_index`/`match_index` and snapshot sessions
    progress: Arc<ProgressTracker>,

    /// Client submissions awaiting commitment
    pending: PendingCommands,

    /// Index of the no-op appended when this leadership began
    noop_index: u64,

    /// Leader-local disposal token; tripped on step-down and dispose
    shutdown_tx: watch::Sender<()>,
    shutdown_rx: watch::Receiver<()>,

    heartbeat_handle: Mutex<Option<JoinHandle<()>>>,

    started_at: Instant,
    last_heartbeat_micros: AtomicU64,

    _marker: PhantomData<T>,
}

impl<T: TypeConfig> LeaderState<T> {
    /// Creates the volatile leader state for a fresh term and starts the
    /// heartbeat driver.
    ///
    /// Appends the term's no-op record before anything else: without an
    /// entry of the current term reaching quorum, no commit advance is
    /// permitted (Raft paper §5.4.2), and the quorum calculation counts
    /// all match indexes uniformly.
    pub async fn establish(
        ctx: &Arc<RaftContext<T>>,
        commit_index: u64,
        role_tx: mpsc::UnboundedSender<RoleEvent>,
    ) -> Result<Arc<Self>> {
        let node_id = ctx.node_id.clone();
        let current_term = ctx.raft_log().current_term();
        let last_log_index = ctx.raft_log().last_entry().map(|e| e.index).unwrap_or(0);

        let progress = Arc::new(ProgressTracker::new());
        let peers = ctx.membership().replication_peers(&node_id).await;
        progress.initialize(last_log_index, peers);
        // The leader counts toward quorum like any other voter.
        progress.record_success(&node_id, last_log_index);

        let noop_index =
            ctx.raft_log().append_command(EntryKind::Noop, Bytes::new(), current_term).await?;
        progress.record_success(&node_id, noop_index);

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let state = Arc::new(Self {
            shared: SharedState::new(node_id, current_term, commit_index),
            progress,
            pending: PendingCommands::new(),
            noop_index,
            shutdown_tx,
            shutdown_rx,
            heartbeat_handle: Mutex::new(None),
            started_at: Instant::now(),
            last_heartbeat_micros: AtomicU64::new(0),
            _marker: PhantomData,
        });

        info!(
            node = %state.shared.node_id(),
            term = current_term,
            noop_index,
            "leadership established"
        );

        let handle = state.spawn_heartbeat_driver(Arc::clone(ctx), role_tx.clone());
        *state.heartbeat_handle.lock().await = Some(handle);

        // A single-voter cluster needs no responses to commit the fresh
        // no-op.
        state.try_advance_commit(ctx, &role_tx).await;

        Ok(state)
    }

    /// One cooperative task that fans out replication to every peer, then
    /// sleeps for a sixth of the message timeout so followers see activity
    /// well before their election timers could fire.
    fn spawn_heartbeat_driver(
        self: &Arc<Self>,
        ctx: Arc<RaftContext<T>>,
        role_tx: mpsc::UnboundedSender<RoleEvent>,
    ) -> JoinHandle<()> {
        let state = Arc::clone(self);
        let mut local_shutdown = self.shutdown_rx.clone();
        let mut global_shutdown = ctx.shutdown_signal.clone();
        let period = ctx.node_config.replication.heartbeat_interval();

        tokio::spawn(async move {
            debug!(?period, "heartbeat driver started");
            loop {
                if let Err(e) = state.broadcast_replication(&ctx).await {
                    error!(error = %e, "replication fan-out failed, giving up leadership");
                    let _ = role_tx.send(RoleEvent::Fatal(e.to_string()));
                    return;
                }

                tokio::select! {
                    _ = local_shutdown.changed() => {
                        debug!("heartbeat driver stopping: leader disposed");
                        return;
                    }
                    _ = global_shutdown.changed() => {
                        debug!("heartbeat driver stopping: engine shutdown");
                        return;
                    }
                    _ = sleep(period) => {}
                }
            }
        })
    }

    /// One fan-out round over the live peer set.
    ///
    /// Membership is re-read every round so peers added or removed by a
    /// joint consensus entry begin or cease receiving traffic promptly.
    /// Cancellation is honoured between peers, bounding step-down latency
    /// by a single in-flight send.
    async fn broadcast_replication(
        &self,
        ctx: &Arc<RaftContext<T>>,
    ) -> Result<()> {
        self.mark_heartbeat_clock();

        let view = ReplicationView {
            current_term: self.shared.current_term(),
            commit_index: self.shared.commit_index(),
        };
        let peers = ctx.membership().replication_peers(self.shared.node_id()).await;

        for peer in peers {
            if self.is_cancelled(ctx) {
                debug!("fan-out interrupted by cancellation");
                return Ok(());
            }
            ctx.replication_handler().replicate_to_peer(&peer, &view, &self.progress, ctx).await?;
        }

        ctx.observers.heartbeat_sent();
        Ok(())
    }

    /// Appends a leader-originated command and registers its completion.
    ///
    /// Returns the assigned log index. On a single-voter cluster the
    /// command commits right here, without waiting for any response.
    pub async fn propose(
        &self,
        ctx: &RaftContext<T>,
        kind: EntryKind,
        payload: Bytes,
        completion: Option<CommandCompletion>,
        role_tx: &mpsc::UnboundedSender<RoleEvent>,
    ) -> Result<u64> {
        if self.is_disposed() {
            return Err(ReplicationError::NotLeader.into());
        }

        let term = self.shared.current_term();
        let index = ctx.raft_log().append_command(kind, payload, term).await?;
        self.progress.record_success(self.shared.node_id(), index);

        if let Some(completion) = completion {
            self.pending.enqueue(PendingCommand::new(index, completion)).await;
        }

        self.try_advance_commit(ctx, role_tx).await;
        Ok(index)
    }

    /// Digests one follower verdict on an AppendEntries request.
    pub async fn handle_append_entries_response(
        &self,
        response: AppendEntriesResponse,
        ctx: &RaftContext<T>,
        role_tx: &mpsc::UnboundedSender<RoleEvent>,
    ) {
        let my_term = self.shared.current_term();
        if response.current_term > my_term {
            warn!(
                response_term = response.current_term,
                my_term, "higher term observed in append response"
            );
            let leader_hint =
                (!response.leader_id.is_empty()).then(|| NodeId::from(response.leader_id.as_str()));
            self.step_down(response.current_term, leader_hint, role_tx);
            return;
        }

        let source = NodeId::from(response.source.as_str());
        if !response.success {
            debug!(peer = %source, "append rejected, walking next index back");
            self.progress.record_rejection(&source);
            return;
        }

        self.progress.record_success(&source, response.last_log_index);
        self.try_advance_commit(ctx, role_tx).await;
    }

    /// Digests a follower's answer to a snapshot probe.
    ///
    /// Must run inside a tokio runtime: an accepted probe spawns the
    /// prepared transfer task.
    pub fn handle_can_install_snapshot_response(
        &self,
        response: CanInstallSnapshotResponse,
    ) {
        let peer = NodeId::from(response.from.as_str());

        if !response.success {
            // The follower has progressed past the offered snapshot; its
            // reported index is authoritative and log replication resumes
            // next round.
            info!(
                peer = %peer,
                index = response.index,
                "snapshot refused, follower already covers it"
            );
            self.progress.record_success(&peer, response.index);
            self.progress.finish_snapshot(&peer);
            return;
        }

        if response.is_currently_installing {
            info!(peer = %peer, "follower busy with an earlier snapshot, will re-probe");
            self.progress.finish_snapshot(&peer);
            return;
        }

        if self.progress.start_prepared(&peer) {
            info!(peer = %peer, index = response.index, "snapshot transfer authorised");
        } else {
            warn!(peer = %peer, "no prepared snapshot transfer for peer");
        }
    }

    /// Recomputes the quorum commit index and, when it moved, notifies the
    /// engine to apply the newly committed range and resolves every
    /// pending command at or below it, in submission order.
    async fn try_advance_commit(
        &self,
        ctx: &RaftContext<T>,
        role_tx: &mpsc::UnboundedSender<RoleEvent>,
    ) {
        let current = ctx.membership().current_topology().await;
        let changing = ctx.membership().changing_topology().await;
        let match_index = self.progress.match_indexes();

        let Some(quorum_index) = quorum_commit_index(&current, changing.as_ref(), &match_index)
        else {
            return;
        };

        let previous = self.shared.advance_commit_index(quorum_index);
        if quorum_index <= previous {
            return;
        }

        debug!(from = previous, to = quorum_index, "commit index advanced");
        let data = NewCommitData {
            new_commit_index: quorum_index,
            current_term: self.shared.current_term(),
        };
        if role_tx.send(RoleEvent::NotifyNewCommitIndex(data)).is_err() {
            warn!("role event channel closed, commit notification dropped");
        }

        self.pending.complete_up_to(quorum_index).await;
    }

    /// Adopts the higher term and retires this leader instance. The local
    /// token is tripped first so no further messages leave once the
    /// current in-flight send finishes.
    fn step_down(
        &self,
        term: u64,
        leader_hint: Option<NodeId>,
        role_tx: &mpsc::UnboundedSender<RoleEvent>,
    ) {
        self.shared.update_current_term(term);
        info!(new_term = term, leader_hint = ?leader_hint, "stepping down to follower");

        let _ = self.shutdown_tx.send(());
        if role_tx.send(RoleEvent::BecomeFollower { term, leader_hint }).is_err() {
            error!("role event channel closed, step-down event dropped");
        }
    }

    /// Tears the leader down: trips the local token, waits for the driver
    /// within the disposal grace, abandons snapshot sessions and hands the
    /// unresolved completions back to the caller, whose role machine
    /// decides their fate.
    pub async fn dispose(
        &self,
        ctx: &RaftContext<T>,
    ) -> Vec<PendingCommand> {
        let _ = self.shutdown_tx.send(());

        let grace = ctx.node_config.replication.disposal_grace();
        let handle = self.heartbeat_handle.lock().await.take();
        if let Some(handle) = handle {
            match timeout(grace, handle).await {
                Ok(Ok(())) => debug!("heartbeat driver stopped"),
                Ok(Err(e)) if e.is_cancelled() => debug!("heartbeat driver cancelled"),
                Ok(Err(e)) => error!(error = %e, "heartbeat driver terminated abnormally"),
                Err(_) => warn!(?grace, "heartbeat driver did not stop within disposal grace"),
            }
        }

        // Running streamers are left to observe cancellation through the
        // transport; the peers re-request from the next leader.
        self.progress.abandon_snapshots();

        let unresolved = self.pending.drain().await;
        if !unresolved.is_empty() {
            info!(count = unresolved.len(), "handing unresolved commands to the engine");
        }
        unresolved
    }

    /// Engine timeout ticks received while leader only stamp the heartbeat
    /// clock, so shared timeout logic does not mistake leadership for a
    /// stalled follower.
    pub fn on_heartbeat_timeout(&self) {
        self.mark_heartbeat_clock();
    }

    fn mark_heartbeat_clock(&self) {
        let micros = self.started_at.elapsed().as_micros() as u64;
        self.last_heartbeat_micros.store(micros, Ordering::Relaxed);
    }

    /// Time since the driver last began a fan-out round (or since the last
    /// timeout stamp).
    pub fn last_heartbeat_age(&self) -> Duration {
        let stamped = Duration::from_micros(self.last_heartbeat_micros.load(Ordering::Relaxed));
        self.started_at.elapsed().saturating_sub(stamped)
    }

    fn is_cancelled(
        &self,
        ctx: &RaftContext<T>,
    ) -> bool {
        self.is_disposed() || ctx.shutdown_signal.has_changed().unwrap_or(true)
    }

    /// Whether the leader-local token has been tripped (step-down or
    /// disposal).
    pub fn is_disposed(&self) -> bool {
        self.shutdown_rx.has_changed().unwrap_or(true)
    }

    pub fn node_id(&self) -> &NodeId {
        self.shared.node_id()
    }

    pub fn current_term(&self) -> u64 {
        self.shared.current_term()
    }

    pub fn commit_index(&self) -> u64 {
        self.shared.commit_index()
    }

    /// Index of the no-op record appended when this leadership began.
    pub fn noop_index(&self) -> u64 {
        self.noop_index
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    pub fn pending(&self) -> &PendingCommands {
        &self.pending
    }
}

impl<T: TypeConfig> std::fmt::Debug for LeaderState<T> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LeaderState")
            .field("shared", &self.shared)
            .field("noop_index", &self.noop_index)
            .field("progress", &self.progress)
            .finish()
    }
}
