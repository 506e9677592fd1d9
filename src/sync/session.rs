//! Session: one replica's document and caret, driven by lines of JSON
//!
//! The session is the single owner of its [`ReplicaDocument`]. Editor events
//! and transport messages are fed to it one at a time; nothing in here is
//! shared across sessions.

use super::gateway::{self, RemoteEffect};
use crate::config::ReplicaConfig;
use crate::crdt::sequence::ReplicaDocument;
use crate::error::Result;
use crate::protocol::{decode_message, encode_message, WireMessage};
use tracing::{info, warn};

/// A single editing session
#[derive(Debug, Clone)]
pub struct Session {
    doc: ReplicaDocument,
    cursor: usize,
}

impl Session {
    /// Start a session with an empty document
    pub fn new(config: ReplicaConfig) -> Self {
        info!(site = %config.site, "Starting replica session");
        Self {
            doc: ReplicaDocument::new(config.site),
            cursor: 0,
        }
    }

    /// The replicated document
    pub fn document(&self) -> &ReplicaDocument {
        &self.doc
    }

    /// Site identifier of this replica
    pub fn site(&self) -> &str {
        self.doc.site()
    }

    /// Visible text
    pub fn text(&self) -> String {
        self.doc.visible_text()
    }

    /// Caret position as a visible character index
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret (clamped to the text length)
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.doc.len());
    }

    /// The editor text changed to `new_text` with the caret at `cursor`.
    ///
    /// Returns the encoded lines to send, in order.
    pub fn local_edit(&mut self, new_text: &str, cursor: usize) -> Result<Vec<String>> {
        let old_text = self.doc.visible_text();
        let messages = gateway::publish_edit(&mut self.doc, &old_text, new_text);
        self.set_cursor(cursor);

        messages.iter().map(encode_message).collect()
    }

    /// Apply a decoded message from the transport
    pub fn receive(&mut self, msg: WireMessage) -> Result<RemoteEffect> {
        let effect = gateway::receive(&mut self.doc, msg, self.cursor)?;
        self.cursor = effect.cursor_or(self.cursor);
        Ok(effect)
    }

    /// Apply one line from the transport.
    ///
    /// Malformed lines are logged and dropped; they never reach the
    /// document.
    pub fn handle_line(&mut self, line: &str) -> RemoteEffect {
        match decode_message(line).and_then(|msg| self.receive(msg)) {
            Ok(effect) => effect,
            Err(err) => {
                warn!(site = self.doc.site(), error = %err, "Dropping malformed message");
                RemoteEffect::Unchanged
            }
        }
    }

    /// Encoded full-state snapshot of this replica
    pub fn snapshot_line(&self) -> Result<String> {
        encode_message(&gateway::snapshot_message(&self.doc))
    }
}
