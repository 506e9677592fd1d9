//! Serialization layer - Convert sequence operations to/from wire messages
//!
//! Incoming messages are validated here so malformed input never reaches the
//! CRDT.

use super::message::{DeleteMessage, InsertMessage, SerializableChar, SnapshotMessage, WireMessage};
use crate::crdt::sequence::{CharRecord, OpId, Operation, PositionId, ReplicaDocument};
use crate::error::{Result, SyncError};

/// Encode a message as a single JSON line (no trailing newline)
pub fn encode_message(msg: &WireMessage) -> Result<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode one JSON line into a message
pub fn decode_message(line: &str) -> Result<WireMessage> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Convert a local operation into its wire message
pub fn operation_to_message(op: &Operation) -> WireMessage {
    match op {
        Operation::Insert {
            value,
            position,
            right,
        } => WireMessage::Insert(InsertMessage {
            value: value.to_string(),
            position: Some(position.clone()),
            right: right.clone(),
            site: position.site.clone(),
            counter: position.counter,
        }),
        Operation::Delete { target, op } => WireMessage::Delete(DeleteMessage {
            id: target.clone(),
            site: op.site.clone(),
            counter: op.counter,
        }),
    }
}

/// Extract exactly one character from a wire string field
fn single_char(value: &str, kind: &'static str, field: &'static str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        (None, _) => Err(SyncError::MissingField { kind, field }),
        (Some(_), Some(_)) => Err(SyncError::Protocol(format!(
            "`{field}` in {kind} message must be a single character, got {value:?}"
        ))),
    }
}

fn validate_path(path: &[u32], context: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SyncError::InvalidPosition(format!("empty path in {context}")));
    }
    Ok(())
}

/// Validate an insert message and rebuild the operation it carries.
///
/// The character's identity is `{path: left.path, site, counter}`.
pub fn insert_from_message(msg: &InsertMessage) -> Result<Operation> {
    let value = single_char(&msg.value, "insert", "value")?;
    let position = msg.position.as_ref().ok_or(SyncError::MissingField {
        kind: "insert",
        field: "left",
    })?;
    validate_path(&position.path, "insert")?;

    Ok(Operation::Insert {
        value,
        position: PositionId::new(position.path.clone(), msg.site.clone(), msg.counter),
        right: msg.right.clone(),
    })
}

/// Validate a delete message and rebuild the operation it carries
pub fn delete_from_message(msg: &DeleteMessage) -> Result<Operation> {
    validate_path(&msg.id.path, "delete")?;

    Ok(Operation::Delete {
        target: msg.id.clone(),
        op: OpId::new(msg.site.clone(), msg.counter),
    })
}

/// Flatten a record for a snapshot
pub fn record_to_serializable(record: &CharRecord) -> SerializableChar {
    SerializableChar {
        path: record.id.path.clone(),
        val: record.value.to_string(),
        site: record.id.site.clone(),
        counter: record.id.counter,
        t: record.tombstone,
    }
}

/// Rebuild a record from its snapshot form
pub fn record_from_serializable(raw: &SerializableChar) -> Result<CharRecord> {
    validate_path(&raw.path, "snapshot")?;
    let value = single_char(&raw.val, "snapshot", "val")?;

    Ok(CharRecord {
        id: PositionId::new(raw.path.clone(), raw.site.clone(), raw.counter),
        value,
        tombstone: raw.t,
    })
}

/// Snapshot of every record in the document, tombstones included
pub fn snapshot_from_document(doc: &ReplicaDocument) -> SnapshotMessage {
    SnapshotMessage {
        content: Some(doc.visible_text()),
        chars: doc.records().iter().map(record_to_serializable).collect(),
    }
}

/// Decode every record of a snapshot; one bad record rejects the snapshot
pub fn records_from_snapshot(snapshot: &SnapshotMessage) -> Result<Vec<CharRecord>> {
    snapshot.chars.iter().map(record_from_serializable).collect()
}
