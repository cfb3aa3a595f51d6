//! Shared fixtures for unit tests: a mock context factory with benign
//! defaults and log entry builders.

mod entry_builder;

pub use entry_builder::*;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tokio::sync::watch;

use crate::MockMembership;
use crate::MockRaftLog;
use crate::MockReplicationCore;
use crate::MockStateMachine;
use crate::MockTransport;
use crate::MockTypeConfig;
use crate::NodeId;
use crate::ObserverRegistry;
use crate::RaftContext;
use crate::RaftNodeConfig;
use crate::RaftStorageHandles;
use crate::Topology;

/// A context over mock collaborators with harmless defaults: empty log,
/// empty cluster, no snapshot. Tests replace the fields they exercise.
pub fn mock_raft_context(
    node_id: &str,
    shutdown_signal: watch::Receiver<()>,
) -> RaftContext<MockTypeConfig> {
    let mut raft_log = MockRaftLog::new();
    raft_log.expect_current_term().return_const(1u64);
    raft_log.expect_last_entry().returning(|| None);
    raft_log.expect_entry().returning(|_| Ok(None));
    raft_log.expect_entries_after().returning(|_, _| Ok(vec![]));
    raft_log.expect_last_snapshot().returning(|| None);
    let next_append = AtomicU64::new(1);
    raft_log
        .expect_append_command()
        .returning(move |_, _, _| Ok(next_append.fetch_add(1, Ordering::SeqCst)));

    let mut membership = MockMembership::new();
    membership.expect_current_topology().returning(Topology::default);
    membership.expect_changing_topology().returning(|| None);
    membership.expect_replication_peers().returning(|_| vec![]);

    RaftContext {
        node_id: NodeId::from(node_id),
        storage: RaftStorageHandles {
            raft_log: Arc::new(raft_log),
            state_machine: Arc::new(MockStateMachine::new()),
        },
        transport: Arc::new(MockTransport::new()),
        membership: Arc::new(membership),
        replication_handler: MockReplicationCore::<MockTypeConfig>::new(),
        node_config: Arc::new(RaftNodeConfig::default()),
        observers: ObserverRegistry::new(),
        shutdown_signal,
    }
}

/// Voters spelled as plain strings, collected into a topology.
pub fn topology_of(voters: &[&str]) -> Topology {
    Topology::new(voters.iter().map(|v| NodeId::from(*v)))
}
