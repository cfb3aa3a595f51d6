use crate::election::RequestVoteRequest;
use crate::envelope::Envelope;
use crate::envelope::Payload;
use crate::replication::AppendEntriesRequest;
use crate::snapshot::CanInstallSnapshotRequest;

impl Envelope {
    /// Short payload name for logs and error messages.
    pub fn request_type(&self) -> &'static str {
        match &self.payload {
            Some(Payload::AppendEntries(_)) => "append_entries",
            Some(Payload::CanInstallSnapshot(_)) => "can_install_snapshot",
            Some(Payload::RequestVote(_)) => "request_vote",
            None => "empty",
        }
    }
}

impl From<AppendEntriesRequest> for Envelope {
    fn from(request: AppendEntriesRequest) -> Self {
        Envelope {
            payload: Some(Payload::AppendEntries(request)),
        }
    }
}

impl From<CanInstallSnapshotRequest> for Envelope {
    fn from(request: CanInstallSnapshotRequest) -> Self {
        Envelope {
            payload: Some(Payload::CanInstallSnapshot(request)),
        }
    }
}

impl From<RequestVoteRequest> for Envelope {
    fn from(request: RequestVoteRequest) -> Self {
        Envelope {
            payload: Some(Payload::RequestVote(request)),
        }
    }
}
