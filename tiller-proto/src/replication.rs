use crate::common::LogEntry;

/// Log replication request fanned out by the leader to one peer.
///
/// Doubles as the heartbeat: an empty `entries` list still carries
/// `prev_log_*` for the consistency check and `leader_commit` so the
/// follower can advance its own commit index.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppendEntriesRequest {
    #[prost(uint64, tag = "1")]
    pub term: u64,
    #[prost(string, tag = "2")]
    pub leader_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub prev_log_index: u64,
    #[prost(uint64, tag = "4")]
    pub prev_log_term: u64,
    #[prost(message, repeated, tag = "5")]
    pub entries: ::prost::alloc::vec::Vec<LogEntry>,
    #[prost(uint64, tag = "6")]
    pub leader_commit: u64,
    #[prost(string, tag = "7")]
    pub from: ::prost::alloc::string::String,
}

/// Follower's verdict on one [`AppendEntriesRequest`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppendEntriesResponse {
    #[prost(uint64, tag = "1")]
    pub current_term: u64,
    #[prost(bool, tag = "2")]
    pub success: bool,
    /// Highest index present in the follower's log after this request.
    #[prost(uint64, tag = "3")]
    pub last_log_index: u64,
    #[prost(string, tag = "4")]
    pub source: ::prost::alloc::string::String,
    /// The node the responder believes is leader; meaningful when it
    /// reports a higher term.
    #[prost(string, tag = "5")]
    pub leader_id: ::prost::alloc::string::String,
}
