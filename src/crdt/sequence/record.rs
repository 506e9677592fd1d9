//! CharRecord: one character of the replicated sequence
//!
//! Records are never removed from the log. Deleting a character flips its
//! tombstone flag so later operations can still resolve its position.

use super::position::PositionId;
use serde::{Deserialize, Serialize};

/// A single character in the sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRecord {
    /// Position of this character
    pub id: PositionId,

    /// The character itself
    pub value: char,

    /// Whether this character has been deleted
    pub tombstone: bool,
}

impl CharRecord {
    /// Create a live (not deleted) record
    pub fn new(id: PositionId, value: char) -> Self {
        Self {
            id,
            value,
            tombstone: false,
        }
    }

    /// Whether the record contributes to the visible text
    pub fn is_visible(&self) -> bool {
        !self.tombstone
    }

    /// Mark this record as deleted.
    ///
    /// Returns `true` if the record was visible before the call.
    pub fn delete(&mut self) -> bool {
        let was_visible = !self.tombstone;
        self.tombstone = true;
        was_visible
    }
}
