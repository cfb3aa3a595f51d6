//! # tiller-proto
//!
//! Wire message definitions shared by the `tiller` replication core and any
//! transport implementation built on top of it.
//!
//! The message set is small and stable, so the types are maintained by hand
//! as prost derives instead of being generated from `.proto` sources. The
//! field tags are part of the wire contract; never renumber them.
//!
//! ## Modules
//!
//! - [`common`] - log identifiers and log entries
//! - [`replication`] - AppendEntries request/response pair
//! - [`snapshot`] - snapshot probe handshake and install header
//! - [`election`] - the vote request sharing the message envelope
//! - [`envelope`] - the single envelope carried by the transport

pub mod common;
pub mod election;
pub mod envelope;
pub mod replication;
pub mod snapshot;

pub mod exts;
