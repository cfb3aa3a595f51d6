use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::watch;

use crate::NodeId;
use crate::ObserverRegistry;
use crate::RaftNodeConfig;
use crate::TypeConfig;
use crate::alias::MOF;
use crate::alias::REPOF;
use crate::alias::ROF;
use crate::alias::SMOF;
use crate::alias::TROF;

pub struct RaftStorageHandles<T: TypeConfig> {
    pub raft_log: Arc<ROF<T>>,
    pub state_machine: Arc<SMOF<T>>,
}

/// Shared collaborator handles a leader instance borrows from the engine.
///
/// Everything here outlives any single role; the leader adds only its own
/// volatile state on top.
pub struct RaftContext<T>
where
    T: TypeConfig,
{
    pub node_id: NodeId,

    // Storages
    pub storage: RaftStorageHandles<T>,

    // Network
    pub transport: Arc<TROF<T>>,

    // Cluster membership
    pub membership: Arc<MOF<T>>,

    // Per-peer replication strategy
    pub replication_handler: REPOF<T>,

    pub node_config: Arc<RaftNodeConfig>,

    // Synchronous notification hooks
    pub observers: ObserverRegistry,

    /// Engine-wide cancellation; tripping it stops every role task.
    pub shutdown_signal: watch::Receiver<()>,
}

impl<T> RaftContext<T>
where
    T: TypeConfig,
{
    pub fn raft_log(&self) -> &Arc<ROF<T>> {
        &self.storage.raft_log
    }

    pub fn state_machine(&self) -> &Arc<SMOF<T>> {
        &self.storage.state_machine
    }

    pub fn transport(&self) -> &Arc<TROF<T>> {
        &self.transport
    }

    pub fn membership(&self) -> &Arc<MOF<T>> {
        &self.membership
    }

    pub fn replication_handler(&self) -> &REPOF<T> {
        &self.replication_handler
    }
}

impl<T> Debug for RaftContext<T>
where
    T: TypeConfig,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RaftContext").field("node_id", &self.node_id).finish()
    }
}
