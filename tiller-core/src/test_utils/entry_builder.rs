use std::ops::RangeInclusive;

use bytes::Bytes;

use tiller_proto::common::EntryKind;
use tiller_proto::common::LogEntry;

pub fn noop_entry(
    index: u64,
    term: u64,
) -> LogEntry {
    LogEntry {
        index,
        term,
        kind: EntryKind::Noop as i32,
        payload: Bytes::new(),
    }
}

pub fn command_entry(
    index: u64,
    term: u64,
    payload: &[u8],
) -> LogEntry {
    LogEntry {
        index,
        term,
        kind: EntryKind::Command as i32,
        payload: Bytes::copy_from_slice(payload),
    }
}

/// One command entry per index in `range`, all in `term`.
pub fn command_entries(
    range: RangeInclusive<u64>,
    term: u64,
) -> Vec<LogEntry> {
    range.map(|index| command_entry(index, term, b"payload")).collect()
}
