use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use tonic::async_trait;

/// Case-insensitive node identifier.
///
/// Cluster configurations and wire messages spell node names with whatever
/// casing their source used; equality and hashing ignore ASCII case so the
/// progress table and topologies treat `Node-A` and `node-a` as one peer.
/// The original spelling is preserved for display and the wire.
#[derive(Clone, Eq)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl PartialEq for NodeId {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for NodeId {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

/// One voting configuration of the cluster.
///
/// During joint consensus two topologies are active at once and a log index
/// commits only when a quorum of each agrees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    voters: HashSet<NodeId>,
}

impl Topology {
    pub fn new(voters: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            voters: voters.into_iter().collect(),
        }
    }

    /// All nodes counted for quorum in this topology, including the local
    /// node when it is a voter.
    pub fn voters(&self) -> &HashSet<NodeId> {
        &self.voters
    }

    /// Majority threshold: `n / 2 + 1`.
    pub fn quorum_size(&self) -> usize {
        self.voters.len() / 2 + 1
    }

    pub fn contains(
        &self,
        id: &NodeId,
    ) -> bool {
        self.voters.contains(id)
    }

    pub fn into_voters(self) -> HashSet<NodeId> {
        self.voters
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}

/// The leader's read-only window onto cluster membership.
///
/// Implementations own the membership-change protocol; the replication core
/// only asks which topologies are active right now. The peer set is
/// recomputed every heartbeat round so nodes added or removed by a joint
/// consensus entry begin or cease receiving traffic promptly.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Membership: Send + Sync + 'static {
    /// The configuration currently in force.
    async fn current_topology(&self) -> Topology;

    /// The target configuration while a joint consensus transition is in
    /// flight, `None` otherwise.
    async fn changing_topology(&self) -> Option<Topology>;

    /// Voter union across the active topologies, minus `exclude`.
    async fn replication_peers(
        &self,
        exclude: &NodeId,
    ) -> Vec<NodeId> {
        let mut voters = self.current_topology().await.into_voters();
        if let Some(changing) = self.changing_topology().await {
            voters.extend(changing.into_voters());
        }
        voters.into_iter().filter(|id| id != exclude).collect()
    }
}
