//! Turning a whole-text change into sequence operations
//!
//! Editors report edits as "the text was `old`, now it is `new`". The
//! translator trims the common prefix and suffix, deletes what is left of
//! `old` right-to-left and inserts what is left of `new` left-to-right.
//! Each operation is applied to the document as it is produced, so later
//! operations see the effect of earlier ones.

use super::diff::{common_prefix_len, common_suffix_len};
use super::document::ReplicaDocument;
use super::operation::Operation;
use super::position::{generate_between_with, OpId};
use super::record::CharRecord;
use rand::Rng;
use tracing::{trace, warn};

/// Apply a local edit using the thread-local RNG for new positions.
///
/// See [`apply_local_edit_with`].
pub fn apply_local_edit(doc: &mut ReplicaDocument, old: &str, new: &str) -> Vec<Operation> {
    apply_local_edit_with(doc, old, new, &mut rand::thread_rng())
}

/// Apply the edit `old -> new` to `doc` and return the operations to ship.
///
/// Only the span between the common prefix and the common suffix is
/// touched. Applying the returned operations in order to a copy of the
/// pre-edit document reproduces `new`.
///
/// # Example
///
/// ```rust
/// use lseq_text::crdt::sequence::{apply_local_edit, ReplicaDocument};
///
/// let mut doc = ReplicaDocument::new("a".to_string());
/// apply_local_edit(&mut doc, "", "hello world");
///
/// let ops = apply_local_edit(&mut doc, "hello world", "hello there");
///
/// assert_eq!(doc.visible_text(), "hello there");
/// assert_eq!(ops.len(), 10);  // 5 deletes + 5 inserts
/// ```
pub fn apply_local_edit_with<R: Rng + ?Sized>(
    doc: &mut ReplicaDocument,
    old: &str,
    new: &str,
    rng: &mut R,
) -> Vec<Operation> {
    if tracing::enabled!(tracing::Level::WARN) && doc.visible_text() != old {
        warn!(site = doc.site(), "Edit base text differs from document text");
    }

    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    let prefix = common_prefix_len(&old[..], 0..old.len(), &new[..], 0..new.len());
    let suffix = common_suffix_len(&old[..], prefix..old.len(), &new[..], prefix..new.len());

    let deleted = old.len() - prefix - suffix;
    let inserted = &new[prefix..new.len() - suffix];

    trace!(prefix, suffix, deleted, inserted = inserted.len(), "Translating edit");

    let mut ops = Vec::with_capacity(deleted + inserted.len());

    // Right-to-left keeps the lower visible indices stable
    for index in (prefix..prefix + deleted).rev() {
        let Some(target) = doc.record_at_visible_index(index).map(|r| r.id.clone()) else {
            continue;
        };
        let counter = doc.tick();
        let op = OpId::new(doc.site(), counter);

        doc.delete_local(&target);
        doc.remember_local_delete(op.clone());
        ops.push(Operation::Delete { target, op });
    }

    for (offset, &value) in inserted.iter().enumerate() {
        let (left, right) = doc.neighbors_at_visible_index(prefix + offset);
        let counter = doc.tick();
        let position = generate_between_with(rng, left.as_ref(), right.as_ref(), doc.site(), counter);

        doc.insert_local(CharRecord::new(position.clone(), value));
        ops.push(Operation::Insert {
            value,
            position,
            right,
        });
    }

    ops
}
