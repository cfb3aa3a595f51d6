use std::collections::VecDeque;

use nanoid::nanoid;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use tonic::Status;
use tracing::debug;
use tracing::warn;

/// Completion handle a client awaits; resolves to the committed log index.
pub type CommandCompletion = oneshot::Sender<std::result::Result<u64, Status>>;

/// A client submission waiting for its log position to commit.
///
/// Only created for submissions that carry a completion handle, and only
/// the leader that appended the command owns it.
pub struct PendingCommand {
    pub id: String,
    pub assigned_index: u64,
    completion: CommandCompletion,
}

impl PendingCommand {
    pub fn new(
        assigned_index: u64,
        completion: CommandCompletion,
    ) -> Self {
        Self {
            id: nanoid!(),
            assigned_index,
            completion,
        }
    }

    /// Resolves the client's handle. A gone client is not an error.
    pub fn complete(
        self,
        result: std::result::Result<u64, Status>,
    ) {
        if self.completion.send(result).is_err() {
            debug!(request_id = %self.id, index = self.assigned_index, "completion receiver dropped");
        }
    }
}

impl std::fmt::Debug for PendingCommand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PendingCommand")
            .field("id", &self.id)
            .field("assigned_index", &self.assigned_index)
            .finish()
    }
}

/// FIFO of commands awaiting commitment, ordered by assigned index.
///
/// Indexes are assigned at append time, so drainage in queue order equals
/// client submission order.
#[derive(Debug, Default)]
pub struct PendingCommands {
    queue: Mutex<VecDeque<PendingCommand>>,
}

impl PendingCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enqueue(
        &self,
        command: PendingCommand,
    ) {
        let mut queue = self.queue.lock().await;
        if let Some(tail) = queue.back() {
            if command.assigned_index <= tail.assigned_index {
                warn!(
                    tail = tail.assigned_index,
                    enqueued = command.assigned_index,
                    "pending command enqueued out of order"
                );
            }
        }
        queue.push_back(command);
    }

    /// Completes every queued command whose assigned index is now
    /// committed, strictly in queue order. Returns how many resolved.
    pub async fn complete_up_to(
        &self,
        commit_index: u64,
    ) -> usize {
        let mut queue = self.queue.lock().await;
        let mut completed = 0;
        while queue.front().is_some_and(|head| head.assigned_index <= commit_index) {
            if let Some(head) = queue.pop_front() {
                debug!(request_id = %head.id, index = head.assigned_index, "command committed");
                let index = head.assigned_index;
                head.complete(Ok(index));
                completed += 1;
            }
        }
        completed
    }

    /// Hands every unresolved command back to the caller. Used on leader
    /// disposal; their fate is the enclosing role machine's decision.
    pub async fn drain(&self) -> Vec<PendingCommand> {
        self.queue.lock().await.drain(..).collect()
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}
