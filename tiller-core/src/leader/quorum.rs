//! Quorum-agreed commit index calculation.
//!
//! Raft paper §5.3/§5.4: an index commits once a majority of voters have
//! replicated it. Under joint consensus (§6) the rule applies to both the
//! current and the changing configuration and the result is the meet of
//! the two.

use std::collections::HashMap;

use crate::NodeId;
use crate::Topology;

/// Highest log index replicated on a quorum of every active topology.
///
/// `None` when some active topology has no quorum at any index yet. The
/// leader counts as an ordinary voter through its own `match_index` entry,
/// which also enforces the no-commit-of-old-term rule: the current-term
/// no-op must reach a quorum before anything newer can.
pub fn quorum_commit_index(
    current: &Topology,
    changing: Option<&Topology>,
    match_index: &HashMap<NodeId, u64>,
) -> Option<u64> {
    let base = topology_commit_index(current, match_index)?;
    match changing {
        Some(changing) => {
            let joint = topology_commit_index(changing, match_index)?;
            Some(base.min(joint))
        }
        None => Some(base),
    }
}

/// Quorum index within a single topology.
///
/// Buckets voters by `match_index`, walks the distinct values descending
/// and keeps a running count of voters strictly above the current value;
/// the first value whose bucket plus that count reaches the quorum size is
/// the answer. Voters with no recorded progress count at index 0.
fn topology_commit_index(
    topology: &Topology,
    match_index: &HashMap<NodeId, u64>,
) -> Option<u64> {
    if topology.is_empty() {
        return None;
    }

    let mut buckets: HashMap<u64, usize> = HashMap::new();
    for voter in topology.voters() {
        let index = match_index.get(voter).copied().unwrap_or(0);
        *buckets.entry(index).or_default() += 1;
    }

    let mut values: Vec<u64> = buckets.keys().copied().collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let quorum = topology.quorum_size();
    let mut boost = 0usize;
    for value in values {
        let confirmations = buckets[&value] + boost;
        if confirmations >= quorum {
            return Some(value);
        }
        boost += buckets[&value];
    }

    None
}
