//! ReplicaDocument: the per-replica state of the sequence CRDT
//!
//! Holds the character log sorted by [`PositionId`] order, the replica's
//! Lamport clock, and the dedup sets that make remote application
//! idempotent. Insert and delete operations are deduplicated separately:
//! an insert is keyed by the new character's `(site, counter)`, a delete by
//! the delete operation's own `(site, counter)`, so the two never shadow
//! each other.

use super::clock::LamportClock;
use super::position::{OpId, PositionId};
use super::record::CharRecord;
use crate::SiteID;
use std::collections::HashSet;
use tracing::debug;

/// Replicated plain-text document
///
/// # Example
///
/// ```rust
/// use lseq_text::crdt::sequence::{generate_between, CharRecord, ReplicaDocument};
///
/// let mut doc = ReplicaDocument::new("a".to_string());
/// let counter = doc.tick();
/// let id = generate_between(None, None, doc.site(), counter);
/// doc.insert_local(CharRecord::new(id.clone(), 'h'));
///
/// assert_eq!(doc.visible_text(), "h");
/// assert_eq!(doc.visible_index_of(&id), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct ReplicaDocument {
    /// Site identifier of this replica
    site: SiteID,

    /// All records, live and tombstoned, sorted by position
    log: Vec<CharRecord>,

    /// Local operation counter
    clock: LamportClock,

    /// Insert operations already applied
    seen_inserts: HashSet<OpId>,

    /// Delete operations already applied
    seen_deletes: HashSet<OpId>,

    /// Delete targets received before their insert
    pending_deletes: HashSet<PositionId>,
}

impl ReplicaDocument {
    /// Create an empty document for the given site
    pub fn new(site: SiteID) -> Self {
        Self {
            site,
            log: Vec::new(),
            clock: LamportClock::new(),
            seen_inserts: HashSet::new(),
            seen_deletes: HashSet::new(),
            pending_deletes: HashSet::new(),
        }
    }

    /// Site identifier of this replica
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Current clock value
    pub fn clock(&self) -> u64 {
        self.clock.value()
    }

    /// Allocate the counter for a new local operation
    pub fn tick(&mut self) -> u64 {
        self.clock.tick()
    }

    /// Advance the clock past a counter observed from another replica
    pub fn merge_clock(&mut self, remote_counter: u64) {
        self.clock.merge(remote_counter);
    }

    /// All records in position order, tombstones included
    pub fn records(&self) -> &[CharRecord] {
        &self.log
    }

    /// Number of visible characters
    pub fn len(&self) -> usize {
        self.visible().count()
    }

    /// Whether the visible text is empty
    pub fn is_empty(&self) -> bool {
        self.visible().next().is_none()
    }

    fn visible(&self) -> impl Iterator<Item = &CharRecord> {
        self.log.iter().filter(|record| record.is_visible())
    }

    fn find(&self, id: &PositionId) -> Option<usize> {
        self.log.binary_search_by(|record| record.id.cmp(id)).ok()
    }

    /// Insert a record without an identity check, keeping the log sorted.
    ///
    /// The caller guarantees a fresh id (counter from [`tick`](Self::tick)).
    /// The insert's identity is remembered so a rebroadcast of this same
    /// operation is ignored when it comes back.
    pub fn insert_local(&mut self, record: CharRecord) {
        self.seen_inserts.insert(record.id.op_id());
        self.insert_sorted(record);
    }

    fn insert_sorted(&mut self, record: CharRecord) {
        let index = self.log.partition_point(|existing| existing.id <= record.id);
        self.log.insert(index, record);
    }

    /// Tombstone the record matching `id`.
    ///
    /// Returns `true` if a visible record was deleted. A missing or already
    /// deleted record is a no-op.
    pub fn delete_local(&mut self, id: &PositionId) -> bool {
        match self.find(id) {
            Some(index) => self.log[index].delete(),
            None => false,
        }
    }

    /// Remember a delete operation emitted by this replica
    pub fn remember_local_delete(&mut self, op: OpId) {
        self.seen_deletes.insert(op);
    }

    /// Apply an insert received from another replica.
    ///
    /// Returns `false` without touching the document if this insert was
    /// already applied.
    pub fn apply_remote_insert(&mut self, mut record: CharRecord) -> bool {
        let op = record.id.op_id();
        if self.seen_inserts.contains(&op) {
            debug!(%op, "Ignoring duplicate insert");
            return false;
        }
        self.seen_inserts.insert(op);
        self.merge_clock(record.id.counter);

        if self.pending_deletes.remove(&record.id) {
            debug!(id = %record.id, "Insert arrived after its delete");
            record.tombstone = true;
        }

        self.insert_sorted(record);
        true
    }

    /// Apply a delete of `target` issued by operation `op`.
    ///
    /// Returns `true` only when a visible character was tombstoned. A
    /// duplicate delivery returns `false`. A delete whose target has not
    /// arrived yet is buffered and applied when the insert shows up.
    pub fn apply_remote_delete(&mut self, target: &PositionId, op: OpId) -> bool {
        if self.seen_deletes.contains(&op) {
            debug!(%op, "Ignoring duplicate delete");
            return false;
        }
        self.merge_clock(op.counter.max(target.counter));
        self.seen_deletes.insert(op);

        match self.find(target) {
            Some(index) => self.log[index].delete(),
            None => {
                debug!(id = %target, "Buffering delete for unknown character");
                self.pending_deletes.insert(target.clone());
                false
            }
        }
    }

    /// Visible text: live records concatenated in position order
    pub fn visible_text(&self) -> String {
        self.visible().map(|record| record.value).collect()
    }

    /// Number of visible characters preceding the record matching `id`.
    ///
    /// The record itself may be tombstoned. Returns `None` if no record
    /// matches.
    pub fn visible_index_of(&self, id: &PositionId) -> Option<usize> {
        let index = self.find(id)?;
        Some(self.log[..index].iter().filter(|r| r.is_visible()).count())
    }

    /// Whether a record with `id` exists and is not tombstoned
    pub fn is_visible(&self, id: &PositionId) -> bool {
        self.find(id)
            .map(|index| self.log[index].is_visible())
            .unwrap_or(false)
    }

    /// The `index`-th visible record
    pub fn record_at_visible_index(&self, index: usize) -> Option<&CharRecord> {
        self.visible().nth(index)
    }

    /// Ids of the visible characters on either side of visible index `index`.
    ///
    /// Left is the `index - 1`-th visible record (`None` at the start), right
    /// is the `index`-th (`None` past the end).
    pub fn neighbors_at_visible_index(
        &self,
        index: usize,
    ) -> (Option<PositionId>, Option<PositionId>) {
        let mut visible = self.visible();

        let left = match index.checked_sub(1) {
            Some(before) => visible.nth(before).map(|record| record.id.clone()),
            None => None,
        };
        let right = if index == 0 || left.is_some() {
            visible.next().map(|record| record.id.clone())
        } else {
            None
        };

        (left, right)
    }

    /// Replace the whole document with a snapshot.
    ///
    /// Discards local state not contained in the snapshot, so this belongs at
    /// session start or on resynchronization. The snapshot's tombstone flags
    /// win over anything applied locally before.
    pub fn load_snapshot(&mut self, records: Vec<CharRecord>) {
        let mut log = records;
        log.sort_by(|a, b| a.id.cmp(&b.id));

        self.seen_inserts = log.iter().map(|record| record.id.op_id()).collect();
        self.seen_deletes.clear();
        self.pending_deletes.clear();

        let max_counter = log.iter().map(|record| record.id.counter).max().unwrap_or(0);
        self.clock.advance_to(max_counter);

        debug!(records = log.len(), clock = self.clock.value(), "Loaded snapshot");
        self.log = log;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(path: &[u32], site: &str, counter: u64) -> PositionId {
        PositionId::new(path.to_vec(), site.to_string(), counter)
    }

    fn record(path: &[u32], site: &str, counter: u64, value: char) -> CharRecord {
        CharRecord::new(pos(path, site, counter), value)
    }

    fn doc_with(site: &str, chars: &[(&[u32], char)]) -> ReplicaDocument {
        let mut doc = ReplicaDocument::new(site.to_string());
        for (path, value) in chars {
            let counter = doc.tick();
            doc.insert_local(record(path, site, counter, *value));
        }
        doc
    }

    #[test]
    fn test_new() {
        let doc = ReplicaDocument::new("a".to_string());
        assert_eq!(doc.site(), "a");
        assert_eq!(doc.clock(), 0);
        assert_eq!(doc.visible_text(), "");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_insert_local_keeps_order() {
        let doc = doc_with("a", &[(&[30], 'c'), (&[10], 'a'), (&[20], 'b')]);

        assert_eq!(doc.visible_text(), "abc");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.clock(), 3);
    }

    #[test]
    fn test_delete_local() {
        let mut doc = doc_with("a", &[(&[10], 'a'), (&[20], 'b')]);

        assert!(doc.delete_local(&pos(&[10], "a", 1)));
        assert_eq!(doc.visible_text(), "b");

        // Already deleted, and unknown ids, are no-ops
        assert!(!doc.delete_local(&pos(&[10], "a", 1)));
        assert!(!doc.delete_local(&pos(&[99], "a", 1)));
        assert_eq!(doc.records().len(), 2);
    }

    #[test]
    fn test_delete_matches_all_components() {
        let mut doc = doc_with("a", &[(&[10], 'a')]);

        assert!(!doc.delete_local(&pos(&[10], "b", 1)));
        assert!(!doc.delete_local(&pos(&[10], "a", 2)));
        assert_eq!(doc.visible_text(), "a");
    }

    #[test]
    fn test_apply_remote_insert_merges_clock() {
        let mut doc = ReplicaDocument::new("a".to_string());

        assert!(doc.apply_remote_insert(record(&[10], "b", 7, 'x')));
        assert_eq!(doc.visible_text(), "x");
        assert_eq!(doc.clock(), 8);
        assert_eq!(doc.tick(), 9);
    }

    #[test]
    fn test_apply_remote_insert_is_idempotent() {
        let mut doc = ReplicaDocument::new("a".to_string());

        assert!(doc.apply_remote_insert(record(&[10], "b", 1, 'x')));
        let clock = doc.clock();
        assert!(!doc.apply_remote_insert(record(&[10], "b", 1, 'x')));

        assert_eq!(doc.visible_text(), "x");
        assert_eq!(doc.records().len(), 1);
        assert_eq!(doc.clock(), clock);
    }

    #[test]
    fn test_local_insert_echo_is_ignored() {
        let mut doc = doc_with("a", &[(&[10], 'x')]);

        assert!(!doc.apply_remote_insert(record(&[10], "a", 1, 'x')));
        assert_eq!(doc.visible_text(), "x");
    }

    #[test]
    fn test_apply_remote_delete() {
        let mut doc = doc_with("a", &[(&[10], 'x'), (&[20], 'y')]);

        assert!(doc.apply_remote_delete(&pos(&[10], "a", 1), OpId::new("b", 5)));
        assert_eq!(doc.visible_text(), "y");
        assert_eq!(doc.clock(), 6);

        // Same delete delivered again
        assert!(!doc.apply_remote_delete(&pos(&[10], "a", 1), OpId::new("b", 5)));
    }

    #[test]
    fn test_delete_dedup_does_not_collide_with_insert_dedup() {
        let mut doc = ReplicaDocument::new("a".to_string());
        doc.apply_remote_insert(record(&[10], "b", 1, 'x'));

        // The delete op happens to reuse the target's (site, counter) pair
        assert!(doc.apply_remote_delete(&pos(&[10], "b", 1), OpId::new("b", 1)));
        assert_eq!(doc.visible_text(), "");
    }

    #[test]
    fn test_concurrent_deletes_of_same_character() {
        let mut doc = doc_with("a", &[(&[10], 'x')]);

        assert!(doc.apply_remote_delete(&pos(&[10], "a", 1), OpId::new("b", 2)));
        assert!(!doc.apply_remote_delete(&pos(&[10], "a", 1), OpId::new("c", 2)));
        assert_eq!(doc.visible_text(), "");
    }

    #[test]
    fn test_delete_before_insert_is_buffered() {
        let mut doc = ReplicaDocument::new("a".to_string());
        let target = pos(&[10], "b", 1);

        assert!(!doc.apply_remote_delete(&target, OpId::new("c", 4)));
        assert!(doc.apply_remote_insert(CharRecord::new(target.clone(), 'x')));

        assert_eq!(doc.visible_text(), "");
        assert!(!doc.is_visible(&target));
        assert_eq!(doc.records().len(), 1);
    }

    #[test]
    fn test_local_delete_echo_is_ignored() {
        let mut doc = doc_with("a", &[(&[10], 'x')]);
        let counter = doc.tick();
        doc.delete_local(&pos(&[10], "a", 1));
        doc.remember_local_delete(OpId::new("a", counter));

        assert!(!doc.apply_remote_delete(&pos(&[10], "a", 1), OpId::new("a", counter)));
    }

    #[test]
    fn test_visible_index_of() {
        let mut doc = doc_with("a", &[(&[10], 'a'), (&[20], 'b'), (&[30], 'c')]);
        doc.delete_local(&pos(&[20], "a", 2));

        assert_eq!(doc.visible_index_of(&pos(&[10], "a", 1)), Some(0));
        // Tombstoned record still reports its rank among preceding visible chars
        assert_eq!(doc.visible_index_of(&pos(&[20], "a", 2)), Some(1));
        assert_eq!(doc.visible_index_of(&pos(&[30], "a", 3)), Some(1));
        assert_eq!(doc.visible_index_of(&pos(&[40], "a", 4)), None);
    }

    #[test]
    fn test_neighbors_at_visible_index() {
        let mut doc = doc_with("a", &[(&[10], 'a'), (&[20], 'b'), (&[30], 'c')]);
        doc.delete_local(&pos(&[20], "a", 2));

        assert_eq!(
            doc.neighbors_at_visible_index(0),
            (None, Some(pos(&[10], "a", 1)))
        );
        assert_eq!(
            doc.neighbors_at_visible_index(1),
            (Some(pos(&[10], "a", 1)), Some(pos(&[30], "a", 3)))
        );
        assert_eq!(
            doc.neighbors_at_visible_index(2),
            (Some(pos(&[30], "a", 3)), None)
        );
        assert_eq!(doc.neighbors_at_visible_index(5), (None, None));
    }

    #[test]
    fn test_neighbors_in_empty_document() {
        let doc = ReplicaDocument::new("a".to_string());
        assert_eq!(doc.neighbors_at_visible_index(0), (None, None));
    }

    #[test]
    fn test_record_at_visible_index() {
        let mut doc = doc_with("a", &[(&[10], 'a'), (&[20], 'b')]);
        doc.delete_local(&pos(&[10], "a", 1));

        assert_eq!(doc.record_at_visible_index(0).map(|r| r.value), Some('b'));
        assert!(doc.record_at_visible_index(1).is_none());
    }

    #[test]
    fn test_load_snapshot() {
        let mut doc = ReplicaDocument::new("a".to_string());
        let mut deleted = record(&[20], "b", 9, 'y');
        deleted.tombstone = true;

        doc.load_snapshot(vec![deleted, record(&[30], "c", 4, 'z'), record(&[10], "b", 2, 'x')]);

        assert_eq!(doc.visible_text(), "xz");
        assert_eq!(doc.records().len(), 3);
        assert_eq!(doc.clock(), 9);
        assert!(!doc.apply_remote_insert(record(&[30], "c", 4, 'z')));
    }

    #[test]
    fn test_snapshot_overrides_local_tombstone() {
        let mut doc = ReplicaDocument::new("a".to_string());
        doc.apply_remote_insert(record(&[10], "b", 1, 'x'));
        doc.apply_remote_delete(&pos(&[10], "b", 1), OpId::new("b", 2));
        assert_eq!(doc.visible_text(), "");

        doc.load_snapshot(vec![record(&[10], "b", 1, 'x')]);

        assert_eq!(doc.visible_text(), "x");
    }

    #[test]
    fn test_snapshot_does_not_lower_clock() {
        let mut doc = ReplicaDocument::new("a".to_string());
        for _ in 0..20 {
            doc.tick();
        }

        doc.load_snapshot(vec![record(&[10], "b", 3, 'x')]);
        assert_eq!(doc.clock(), 20);
    }
}
