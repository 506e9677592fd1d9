//! Sequence CRDT: collaborative plain text with dense position identifiers
//!
//! Every character carries a [`PositionId`] drawn from a dense, totally
//! ordered space, so all replicas sort the same characters the same way no
//! matter when or in which order operations arrive.
//!
//! # Features
//! - **Dense positions**: a fresh position always exists between two
//!   generated ones; saturated levels deepen the path by one digit
//! - **Biased allocation**: appends draw from the top of the free range,
//!   prepends from the bottom, leaving room for the common typing pattern
//! - **Tombstones**: deleted characters stay in the log so late operations
//!   can still find them
//! - **Idempotent merge**: inserts and deletes are deduplicated by operation
//!   identity, independently of each other
//!
//! # Example
//!
//! ```rust
//! use lseq_text::crdt::sequence::{apply_local_edit, Operation, ReplicaDocument};
//!
//! let mut alice = ReplicaDocument::new("alice".to_string());
//! let mut bob = ReplicaDocument::new("bob".to_string());
//!
//! for op in apply_local_edit(&mut alice, "", "hi") {
//!     if let Some(record) = op.to_record() {
//!         bob.apply_remote_insert(record);
//!     }
//! }
//!
//! assert_eq!(alice.visible_text(), bob.visible_text());
//! ```
//!
//! # References
//!
//! - "Logoot: A Scalable Optimistic Replication Algorithm for Collaborative
//!   Editing on P2P Networks" (Weiss, Urso, Molli)
//! - "LSEQ: an Adaptive Structure for Sequences in Distributed Collaborative
//!   Editing" (Nédelec, Molli, Mostefaoui, Desmontils)

mod clock;
mod diff;
mod document;
mod operation;
mod position;
mod record;
mod translate;

pub use clock::LamportClock;
pub use diff::{common_prefix_len, common_suffix_len};
pub use document::ReplicaDocument;
pub use operation::Operation;
pub use position::{
    generate_between, generate_between_with, OpId, PositionId, MAX_DIGIT, MIN_DIGIT, MIN_FREE_DIGITS,
};
pub use record::CharRecord;
pub use translate::{apply_local_edit, apply_local_edit_with};
