//! lseq-text - Replicated plain text for collaborative editors
//!
//! This is the Rust core of a collaborative text editor, compiled to both
//! native and WASM. It implements:
//! - Dense, totally ordered position identifiers (Logoot/LSEQ style)
//! - A tombstoned character log with idempotent remote application
//! - Translation of whole-text edits into minimal insert/delete operations
//! - The JSON wire protocol for operations and snapshots
//!
//! # Examples
//!
//! ```rust
//! use lseq_text::{ReplicaConfig, Session};
//!
//! let mut alice = Session::new(ReplicaConfig::with_site("alice"));
//! let mut bob = Session::new(ReplicaConfig::with_site("bob"));
//!
//! for line in alice.local_edit("Hello", 5).unwrap() {
//!     bob.handle_line(&line);
//! }
//!
//! assert_eq!(bob.text(), "Hello");
//! ```

pub mod config;
pub mod crdt;
pub mod error;
pub mod protocol;
pub mod sync;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::ReplicaConfig;
pub use crdt::sequence::{CharRecord, OpId, Operation, PositionId, ReplicaDocument};
pub use error::{Result, SyncError};
pub use protocol::WireMessage;
pub use sync::{RemoteEffect, Session};

/// Replica (site) identifier type
pub type SiteID = String;
