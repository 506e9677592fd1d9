//! CRDT (Conflict-free Replicated Data Types) implementations
//!
//! Replicas edit independently and exchange operations; merging is
//! deterministic, so every replica that has seen the same operations holds
//! the same state.
//!
//! # CRDTs Implemented
//!
//! - **Sequence:** Logoot/LSEQ-style ordered list of characters for
//!   collaborative plain text

pub mod sequence;

pub use sequence::{CharRecord, PositionId, ReplicaDocument};
