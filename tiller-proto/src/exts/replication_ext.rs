use crate::replication::AppendEntriesResponse;

impl AppendEntriesResponse {
    /// Follower accepted the entries; `last_log_index` is its new log tail.
    pub fn success(
        source: impl Into<String>,
        current_term: u64,
        last_log_index: u64,
    ) -> Self {
        Self {
            current_term,
            success: true,
            last_log_index,
            source: source.into(),
            leader_id: String::new(),
        }
    }

    /// Follower rejected the consistency check; the leader walks its
    /// next-index back one entry and retries.
    pub fn rejection(
        source: impl Into<String>,
        current_term: u64,
    ) -> Self {
        Self {
            current_term,
            success: false,
            last_log_index: 0,
            source: source.into(),
            leader_id: String::new(),
        }
    }

    /// Responder is on a newer term; `leader_id` names the leader it
    /// follows, when known.
    pub fn higher_term(
        source: impl Into<String>,
        current_term: u64,
        leader_id: impl Into<String>,
    ) -> Self {
        Self {
            current_term,
            success: false,
            last_log_index: 0,
            source: source.into(),
            leader_id: leader_id.into(),
        }
    }
}
