//! Scenario tests for [`crate::LeaderState`]: lifecycle, commit advance,
//! snapshot handshake and step-down.

mod state_management_test;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::MockMembership;
use crate::MockRaftLog;
use crate::MockReplicationCore;
use crate::MockTypeConfig;
use crate::NodeId;
use crate::test_utils::noop_entry;
use crate::test_utils::topology_of;

/// Membership answering with a fixed voter set and peer list.
pub(super) fn membership_of(
    voters: &[&str],
    peers: &[&str],
) -> MockMembership {
    let mut membership = MockMembership::new();
    let topology = topology_of(voters);
    membership.expect_current_topology().returning(move || topology.clone());
    membership.expect_changing_topology().returning(|| None);
    let peer_ids: Vec<NodeId> = peers.iter().map(|p| NodeId::from(*p)).collect();
    membership.expect_replication_peers().returning(move |_| peer_ids.clone());
    membership
}

/// Replication core that accepts every fan-out without side effects.
pub(super) fn quiet_replication() -> MockReplicationCore<MockTypeConfig> {
    let mut handler = MockReplicationCore::new();
    handler.expect_replicate_to_peer().returning(|_, _, _, _| Ok(()));
    handler
}

/// Log whose tail sits at `last_index` in `term`; appends allocate the
/// following indexes.
pub(super) fn log_with_tail(
    last_index: u64,
    term: u64,
) -> MockRaftLog {
    let mut raft_log = MockRaftLog::new();
    raft_log.expect_current_term().return_const(term);
    raft_log
        .expect_last_entry()
        .returning(move || (last_index > 0).then(|| noop_entry(last_index, term)));
    raft_log.expect_entry().returning(|_| Ok(None));
    raft_log.expect_entries_after().returning(|_, _| Ok(vec![]));
    raft_log.expect_last_snapshot().returning(|| None);
    let next_append = AtomicU64::new(last_index + 1);
    raft_log
        .expect_append_command()
        .returning(move |_, _, _| Ok(next_append.fetch_add(1, Ordering::SeqCst)));
    raft_log
}
