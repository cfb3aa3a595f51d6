use std::fmt::Debug;

use crate::Membership;
use crate::RaftLog;
use crate::ReplicationCore;
use crate::StateMachine;
use crate::Transport;

/// Binds the collaborator implementations a node runs with.
///
/// Generic code in this crate names collaborators through the projections
/// in [`alias`]; a deployment picks concrete types once, in one place, and
/// tests substitute mocks the same way.
pub trait TypeConfig: Sized + Clone + Debug + Send + Sync + 'static {
    /// Persistent log store
    type R: RaftLog;

    /// Application state machine
    type SM: StateMachine;

    /// Message transport
    type TR: Transport;

    /// Cluster membership view
    type M: Membership;

    /// Per-peer replication strategy
    type REP: ReplicationCore<Self>;
}

/// Shorthand projections of [`TypeConfig`] associated types.
pub mod alias {
    use super::TypeConfig;

    pub type ROF<T> = <T as TypeConfig>::R;
    pub type SMOF<T> = <T as TypeConfig>::SM;
    pub type TROF<T> = <T as TypeConfig>::TR;
    pub type MOF<T> = <T as TypeConfig>::M;
    pub type REPOF<T> = <T as TypeConfig>::REP;
}
