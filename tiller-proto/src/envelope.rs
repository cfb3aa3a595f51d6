use crate::election::RequestVoteRequest;
use crate::replication::AppendEntriesRequest;
use crate::snapshot::CanInstallSnapshotRequest;

/// The one message shape the transport carries point-to-point.
///
/// Snapshot data itself does not fit in an envelope; it follows an
/// [`crate::snapshot::InstallSnapshotRequest`] header over the transport's
/// streaming primitive.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    #[prost(oneof = "Payload", tags = "1, 2, 3")]
    pub payload: ::core::option::Option<Payload>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum Payload {
    #[prost(message, tag = "1")]
    AppendEntries(AppendEntriesRequest),
    #[prost(message, tag = "2")]
    CanInstallSnapshot(CanInstallSnapshotRequest),
    #[prost(message, tag = "3")]
    RequestVote(RequestVoteRequest),
}
