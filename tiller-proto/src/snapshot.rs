/// Probe asking a follower whether it would accept a snapshot at
/// `index`/`term`.
///
/// Streaming a snapshot is expensive; the probe lets the follower refuse
/// before any data moves.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CanInstallSnapshotRequest {
    #[prost(string, tag = "1")]
    pub from: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub leader_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub index: u64,
    #[prost(uint64, tag = "4")]
    pub term: u64,
}

/// Follower's answer to a [`CanInstallSnapshotRequest`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CanInstallSnapshotResponse {
    #[prost(string, tag = "1")]
    pub from: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub success: bool,
    /// Set when the follower is still applying an earlier snapshot.
    #[prost(bool, tag = "3")]
    pub is_currently_installing: bool,
    /// On refusal: the follower's actual last log index, so the leader can
    /// resume normal replication from there.
    #[prost(uint64, tag = "4")]
    pub index: u64,
    #[prost(uint64, tag = "5")]
    pub term: u64,
}

/// Header sent ahead of the snapshot byte stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstallSnapshotRequest {
    #[prost(uint64, tag = "1")]
    pub term: u64,
    #[prost(uint64, tag = "2")]
    pub last_included_index: u64,
    #[prost(uint64, tag = "3")]
    pub last_included_term: u64,
    #[prost(string, tag = "4")]
    pub from: ::prost::alloc::string::String,
}
