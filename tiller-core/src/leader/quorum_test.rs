//! Quorum commit index calculation scenarios.
//!
//! Covers single-topology majorities, joint consensus intersection and the
//! degenerate cluster shapes.

use std::collections::HashMap;

use crate::NodeId;
use crate::Topology;
use crate::quorum_commit_index;
use crate::test_utils::topology_of;

fn match_indexes(pairs: &[(&str, u64)]) -> HashMap<NodeId, u64> {
    pairs.iter().map(|(id, index)| (NodeId::from(*id), *index)).collect()
}

/// Three nodes, leader and one follower at the log tail.
///
/// # Scenario
/// - Voters {A, B, C}, quorum 2
/// - A (leader) and B at index 5, C lagging at 3
/// - Expected: commit index 5
#[test]
fn test_three_node_majority_commits_tail() {
    let current = topology_of(&["node-a", "node-b", "node-c"]);
    let matches = match_indexes(&[("node-a", 5), ("node-b", 5), ("node-c", 3)]);

    assert_eq!(quorum_commit_index(&current, None, &matches), Some(5));
}

/// With only the leader ahead, the quorum index stays at zero: nothing has
/// been replicated to a majority yet.
#[test]
fn test_minority_progress_commits_nothing() {
    let current = topology_of(&["node-a", "node-b", "node-c"]);
    let matches = match_indexes(&[("node-a", 5)]);

    assert_eq!(quorum_commit_index(&current, None, &matches), Some(0));
}

#[test]
fn test_empty_topology_has_no_quorum() {
    let current = Topology::default();
    let matches = match_indexes(&[("node-a", 5)]);

    assert_eq!(quorum_commit_index(&current, None, &matches), None);
}

#[test]
fn test_single_voter_commits_own_tail() {
    let current = topology_of(&["node-a"]);
    let matches = match_indexes(&[("node-a", 7)]);

    assert_eq!(quorum_commit_index(&current, None, &matches), Some(7));
}

/// The descending walk accumulates voters above the candidate value.
///
/// Five voters at 9, 7, 7, 3, 1 with quorum 3: index 9 has one
/// confirmation, index 7 has three (two there plus one above), so 7 wins.
#[test]
fn test_boost_walk_counts_voters_above() {
    let current = topology_of(&["n1", "n2", "n3", "n4", "n5"]);
    let matches =
        match_indexes(&[("n1", 9), ("n2", 7), ("n3", 7), ("n4", 3), ("n5", 1)]);

    let result = quorum_commit_index(&current, None, &matches);

    assert_eq!(result, Some(7));
    // Property check: at least quorum voters sit at or above the result,
    // and no higher index satisfies that.
    let at_or_above = |n: u64| matches.values().filter(|&&m| m >= n).count();
    assert!(at_or_above(7) >= current.quorum_size());
    assert!(at_or_above(8) < current.quorum_size());
}

/// Joint consensus: a log index commits only when majority-agreed in both
/// configurations.
///
/// # Scenario
/// - current {A, B, C} quorum 2: all at 10 -> 10
/// - changing {C, D, E} quorum 2: C at 10, D and E at 4 -> 4
/// - Expected: min(10, 4) = 4
#[test]
fn test_joint_consensus_takes_min_of_both_topologies() {
    let current = topology_of(&["node-a", "node-b", "node-c"]);
    let changing = topology_of(&["node-c", "node-d", "node-e"]);
    let matches = match_indexes(&[
        ("node-a", 10),
        ("node-b", 10),
        ("node-c", 10),
        ("node-d", 4),
        ("node-e", 4),
    ]);

    assert_eq!(quorum_commit_index(&current, Some(&changing), &matches), Some(4));
}

#[test]
fn test_joint_consensus_with_empty_changing_topology_blocks_commit() {
    let current = topology_of(&["node-a", "node-b", "node-c"]);
    let changing = Topology::default();
    let matches = match_indexes(&[("node-a", 10), ("node-b", 10), ("node-c", 10)]);

    assert_eq!(quorum_commit_index(&current, Some(&changing), &matches), None);
}

/// Voters are matched case-insensitively against the progress table.
#[test]
fn test_voter_lookup_ignores_case() {
    let current = topology_of(&["Node-A", "Node-B", "Node-C"]);
    let matches = match_indexes(&[("node-a", 5), ("node-b", 5), ("node-c", 5)]);

    assert_eq!(quorum_commit_index(&current, None, &matches), Some(5));
}
