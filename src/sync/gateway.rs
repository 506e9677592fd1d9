//! SyncGateway: the boundary between the document and the transport
//!
//! Outgoing: local edits become wire messages. Incoming: wire messages are
//! validated, applied to the document, and the caret is moved so it stays
//! on the same character.

use crate::crdt::sequence::{apply_local_edit, CharRecord, Operation, ReplicaDocument};
use crate::error::Result;
use crate::protocol::serialize::{
    delete_from_message, insert_from_message, operation_to_message, records_from_snapshot,
    snapshot_from_document,
};
use crate::protocol::WireMessage;
use tracing::{debug, trace};

/// What the editor surface has to do after a remote message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEffect {
    /// Nothing visible changed (duplicate, or a buffered delete)
    Unchanged,

    /// Visible text changed; re-render and place the caret at `cursor`
    Rerender { cursor: usize },

    /// Whole document was replaced by a snapshot
    Reloaded { cursor: usize },
}

impl RemoteEffect {
    /// Whether the editor needs to re-render
    pub fn needs_render(&self) -> bool {
        !matches!(self, RemoteEffect::Unchanged)
    }

    /// Caret position after the message, given the caret before it
    pub fn cursor_or(&self, current: usize) -> usize {
        match self {
            RemoteEffect::Unchanged => current,
            RemoteEffect::Rerender { cursor } | RemoteEffect::Reloaded { cursor } => *cursor,
        }
    }
}

/// Apply a local edit and return the messages to send, in order
pub fn publish_edit(doc: &mut ReplicaDocument, old: &str, new: &str) -> Vec<WireMessage> {
    apply_local_edit(doc, old, new)
        .iter()
        .map(operation_to_message)
        .collect()
}

/// Full-state message for the document
pub fn snapshot_message(doc: &ReplicaDocument) -> WireMessage {
    WireMessage::Snapshot(snapshot_from_document(doc))
}

/// Apply an incoming message.
///
/// `cursor` is the caret's visible index before the message. A character
/// inserted or deleted before the caret shifts it by one; changes at or
/// after the caret leave it in place.
///
/// # Errors
///
/// Fails on messages that pass JSON decoding but carry invalid content; the
/// document is untouched in that case.
pub fn receive(doc: &mut ReplicaDocument, msg: WireMessage, cursor: usize) -> Result<RemoteEffect> {
    trace!(kind = msg.kind(), "Received message");

    match msg {
        WireMessage::Insert(insert) => {
            let op = insert_from_message(&insert)?;
            Ok(apply_remote(doc, op, cursor))
        }
        WireMessage::Delete(delete) => {
            let op = delete_from_message(&delete)?;
            Ok(apply_remote(doc, op, cursor))
        }
        WireMessage::Snapshot(snapshot) => {
            let records = records_from_snapshot(&snapshot)?;
            doc.load_snapshot(records);
            Ok(RemoteEffect::Reloaded {
                cursor: cursor.min(doc.len()),
            })
        }
    }
}

/// Apply an already validated remote operation
pub fn apply_remote(doc: &mut ReplicaDocument, op: Operation, cursor: usize) -> RemoteEffect {
    let id = op.affected().clone();

    let applied = match op {
        Operation::Insert {
            value, position, ..
        } => doc.apply_remote_insert(CharRecord::new(position, value)) && doc.is_visible(&id),
        Operation::Delete { target, op } => doc.apply_remote_delete(&target, op),
    };
    if !applied {
        return RemoteEffect::Unchanged;
    }

    // Tombstones are not counted, so the index is the same before and after
    let before_cursor = matches!(doc.visible_index_of(&id), Some(index) if index < cursor);
    let cursor = match (before_cursor, doc.is_visible(&id)) {
        (false, _) => cursor,
        (true, true) => cursor + 1,
        (true, false) => cursor.saturating_sub(1),
    };

    debug!(%id, cursor, "Applied remote operation");
    RemoteEffect::Rerender { cursor }
}
