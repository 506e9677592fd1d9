//! Synchronization boundary
//!
//! Bridges the sequence CRDT and the outside world: editor events come in
//! as whole-text changes, transport traffic as JSON lines.

pub mod gateway;
pub mod session;

pub use gateway::{apply_remote, publish_edit, receive, snapshot_message, RemoteEffect};
pub use session::Session;
