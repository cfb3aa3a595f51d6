//! Hand-written helpers layered over the wire types: constructors for the
//! common response shapes and small inspection methods. Pure sugar; nothing
//! here changes the encoded form.

mod common_ext;
mod envelope_ext;
mod replication_ext;
mod snapshot_ext;
