//! Wire message shapes
//!
//! Messages are JSON objects tagged by `"type"`, one per line on the
//! transport.

use crate::crdt::sequence::PositionId;
use crate::SiteID;
use serde::{Deserialize, Serialize};

/// Any message exchanged with the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    Insert(InsertMessage),
    Delete(DeleteMessage),
    Snapshot(SnapshotMessage),
}

impl WireMessage {
    /// Message type name as written in the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::Insert(_) => "insert",
            WireMessage::Delete(_) => "delete",
            WireMessage::Snapshot(_) => "snapshot",
        }
    }
}

/// A single inserted character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertMessage {
    /// The character, as a one-character string
    pub value: String,

    /// Position generated for the new character.
    ///
    /// Travels in the `left` slot: that is where existing peers put it and
    /// where they read it from. Only `path` is used on receipt; identity
    /// comes from `site` and `counter`.
    #[serde(rename = "left")]
    pub position: Option<PositionId>,

    /// Right neighbor when the character was generated
    pub right: Option<PositionId>,

    pub site: SiteID,
    pub counter: u64,
}

/// Deletion of one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMessage {
    /// Position of the deleted character
    pub id: PositionId,

    /// Site that issued the delete
    pub site: SiteID,

    /// Counter of the delete operation
    pub counter: u64,
}

/// Full document state, tombstones included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    /// Visible text, informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    pub chars: Vec<SerializableChar>,
}

/// Flattened character record used in snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableChar {
    pub path: Vec<u32>,

    /// The character, as a one-character string
    pub val: String,

    pub site: SiteID,
    pub counter: u64,

    /// Tombstone flag
    pub t: bool,
}
