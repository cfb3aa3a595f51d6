use crate::common::EntryKind;
use crate::common::LogEntry;
use crate::common::LogId;

impl LogId {
    /// The zero entry preceding the first real log index.
    pub fn zero() -> Self {
        LogId { term: 0, index: 0 }
    }

    pub fn new(
        term: u64,
        index: u64,
    ) -> Self {
        LogId { term, index }
    }
}

impl LogEntry {
    /// Position of this entry as a [`LogId`].
    pub fn log_id(&self) -> LogId {
        LogId {
            term: self.term,
            index: self.index,
        }
    }

    /// Decoded entry kind; unknown wire values read as `Noop`.
    pub fn entry_kind(&self) -> EntryKind {
        EntryKind::try_from(self.kind).unwrap_or(EntryKind::Noop)
    }

    pub fn is_noop(&self) -> bool {
        self.entry_kind() == EntryKind::Noop
    }
}
