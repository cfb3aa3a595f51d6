use crate::snapshot::CanInstallSnapshotResponse;

impl CanInstallSnapshotResponse {
    /// Follower will take the snapshot; the leader may start streaming.
    pub fn accepted(
        from: impl Into<String>,
        index: u64,
        term: u64,
    ) -> Self {
        Self {
            from: from.into(),
            success: true,
            is_currently_installing: false,
            index,
            term,
        }
    }

    /// Follower has already progressed past the offered snapshot; `index`
    /// reports its actual log tail.
    pub fn refused(
        from: impl Into<String>,
        index: u64,
        term: u64,
    ) -> Self {
        Self {
            from: from.into(),
            success: false,
            is_currently_installing: false,
            index,
            term,
        }
    }

    /// Follower is still applying an earlier snapshot.
    pub fn busy(
        from: impl Into<String>,
        index: u64,
        term: u64,
    ) -> Self {
        Self {
            from: from.into(),
            success: true,
            is_currently_installing: true,
            index,
            term,
        }
    }
}
