/// Position of a log entry: term plus index.
///
/// `LogId { term: 0, index: 0 }` is the zero entry that precedes the first
/// real log entry; it never exists in storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct LogId {
    #[prost(uint64, tag = "1")]
    pub term: u64,
    #[prost(uint64, tag = "2")]
    pub index: u64,
}

/// A single replicated log record.
///
/// Entries are produced by the persistent log; the leader only reads them.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogEntry {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(uint64, tag = "2")]
    pub term: u64,
    #[prost(enumeration = "EntryKind", tag = "3")]
    pub kind: i32,
    #[prost(bytes = "bytes", tag = "4")]
    pub payload: ::prost::bytes::Bytes,
}

/// What a log entry carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EntryKind {
    /// Empty record appended on leadership start to unlock current-term
    /// commits.
    Noop = 0,
    /// Application command submitted by a client.
    Command = 1,
    /// Cluster membership transition record.
    TopologyChange = 2,
}
