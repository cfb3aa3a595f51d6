//! Collaborator contracts for persistent storage.
//!
//! The replication core never touches disk itself; it is programmed against
//! these traits and the enclosing engine supplies the implementations.

mod raft_log;
mod state_machine;

pub use raft_log::*;
pub use state_machine::*;
