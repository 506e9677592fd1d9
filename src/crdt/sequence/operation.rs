//! Operations produced by local edits and shipped to other replicas

use super::position::{OpId, PositionId};
use super::record::CharRecord;

/// A single replicated edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A new character at `position`
    Insert {
        value: char,
        /// Position generated for the character; its `(site, counter)` is
        /// the operation identity
        position: PositionId,
        /// Right neighbor at generation time
        right: Option<PositionId>,
    },

    /// Tombstone the character at `target`
    Delete {
        target: PositionId,
        /// Identity of the delete operation itself
        op: OpId,
    },
}

impl Operation {
    /// Identity used for deduplication
    pub fn op_id(&self) -> OpId {
        match self {
            Operation::Insert { position, .. } => position.op_id(),
            Operation::Delete { op, .. } => op.clone(),
        }
    }

    /// Position of the character this operation affects
    pub fn affected(&self) -> &PositionId {
        match self {
            Operation::Insert { position, .. } => position,
            Operation::Delete { target, .. } => target,
        }
    }

    /// Record carried by an insert, `None` for deletes
    pub fn to_record(&self) -> Option<CharRecord> {
        match self {
            Operation::Insert {
                value, position, ..
            } => Some(CharRecord::new(position.clone(), *value)),
            Operation::Delete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_identity_comes_from_position() {
        let position = PositionId::new(vec![3], "a".to_string(), 7);
        let op = Operation::Insert {
            value: 'q',
            position: position.clone(),
            right: None,
        };

        assert_eq!(op.op_id(), OpId::new("a", 7));
        assert_eq!(op.affected(), &position);
        assert_eq!(op.to_record(), Some(CharRecord::new(position, 'q')));
    }

    #[test]
    fn test_delete_identity_is_its_own() {
        let target = PositionId::new(vec![3], "a".to_string(), 7);
        let op = Operation::Delete {
            target: target.clone(),
            op: OpId::new("b", 12),
        };

        assert_eq!(op.op_id(), OpId::new("b", 12));
        assert_eq!(op.affected(), &target);
        assert!(op.to_record().is_none());
    }
}
