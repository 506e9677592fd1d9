//! Wire protocol for replica synchronization
//!
//! Three message types travel over the line-delimited JSON transport:
//! `insert` and `delete` carry single operations, `snapshot` carries the
//! whole document including tombstones.

pub mod message;
pub mod serialize;

pub use message::{DeleteMessage, InsertMessage, SerializableChar, SnapshotMessage, WireMessage};
pub use serialize::{decode_message, encode_message, operation_to_message};
