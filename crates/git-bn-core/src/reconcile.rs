//! Reconciliation of the note store against the live branch list.
//!
//! A sweep only ever does two things: tombstone active entries whose branch
//! is gone, and add empty entries for branches the store has never seen.
//! Tombstones are never resurrected here; only an explicit note write does
//! that.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::time::now_timestamp;
use crate::types::{BranchRecord, MergedBranch, NoteStore};

/// Mutations applied by one reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Branches tombstoned because they disappeared.
    pub marked_deleted: Vec<String>,
    /// Branches recorded for the first time with an empty note.
    pub added: Vec<String>,
}

impl ReconcileOutcome {
    /// Whether the store must be written.
    pub fn changed(&self) -> bool {
        !self.marked_deleted.is_empty() || !self.added.is_empty()
    }
}

/// Align the store with the live branches.
pub fn reconcile(store: &mut NoteStore, live: &[BranchRecord]) -> ReconcileOutcome {
    reconcile_at(store, live, &now_timestamp())
}

pub fn reconcile_at(store: &mut NoteStore, live: &[BranchRecord], timestamp: &str) -> ReconcileOutcome {
    let live_names: HashSet<&str> = live.iter().map(|b| b.name.as_str()).collect();
    let mut outcome = ReconcileOutcome::default();

    let vanished: Vec<String> = store
        .notes
        .iter()
        .filter(|e| e.is_active() && !live_names.contains(e.branch_name.as_str()))
        .map(|e| e.branch_name.clone())
        .collect();
    for name in vanished {
        if store.mark_deleted_at(&name, timestamp) {
            outcome.marked_deleted.push(name);
        }
    }

    // Local and remote branches can share a name; record each name once.
    let mut seen = HashSet::new();
    for branch in live {
        if !seen.insert(branch.name.as_str()) {
            continue;
        }
        if store.insert_missing_at(&branch.name, timestamp) {
            outcome.added.push(branch.name.clone());
        }
    }

    debug!(
        "Reconciled {} live branches: {} tombstoned, {} added",
        live.len(),
        outcome.marked_deleted.len(),
        outcome.added.len()
    );
    outcome
}

/// Build a fresh store with one empty entry per distinct branch name.
pub fn initialize(branches: &[BranchRecord]) -> NoteStore {
    initialize_at(branches, &now_timestamp())
}

pub fn initialize_at(branches: &[BranchRecord], timestamp: &str) -> NoteStore {
    let mut store = NoteStore::new_at(timestamp);
    for branch in branches {
        store.insert_missing_at(&branch.name, timestamp);
    }
    store
}

/// Join live branches with their active notes. Tombstones are ignored.
pub fn merge_view(live: &[BranchRecord], store: &NoteStore) -> Vec<MergedBranch> {
    let active: HashMap<&str, _> = store
        .notes
        .iter()
        .filter(|e| e.is_active())
        .map(|e| (e.branch_name.as_str(), e))
        .collect();

    live.iter()
        .map(|branch| {
            let entry = active.get(branch.name.as_str());
            MergedBranch {
                branch: branch.clone(),
                note: entry.map(|e| e.note.clone()),
                note_timestamp: entry.map(|e| e.timestamp.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoteStatus;

    const T0: &str = "2024-05-01 09:00:00";
    const T1: &str = "2024-05-01 10:00:00";
    const T2: &str = "2024-05-01 11:00:00";

    fn branch(name: &str, is_remote: bool) -> BranchRecord {
        BranchRecord {
            name: name.to_string(),
            is_current: false,
            is_remote,
            commit_hash: "0123456789abcdef".to_string(),
            commit_date: String::new(),
            commit_author: String::new(),
        }
    }

    #[test]
    fn test_initialize_creates_empty_active_entries() {
        let store = initialize_at(&[branch("main", false), branch("feature/x", false)], T0);

        assert_eq!(store.notes.len(), 2);
        assert!(store.notes.iter().all(|e| e.is_active() && e.note.is_empty()));
        assert_eq!(store.last_updated, T0);
    }

    #[test]
    fn test_initialize_shares_entry_between_same_named_branches() {
        let store = initialize_at(&[branch("main", false), branch("main", true)], T0);
        assert_eq!(store.notes.len(), 1);
    }

    #[test]
    fn test_reconcile_tombstones_vanished_branches() {
        let mut store = initialize_at(&[branch("main", false), branch("feature/x", false)], T0);
        store.upsert_at("feature/x", "wip", T0);

        let outcome = reconcile_at(&mut store, &[branch("main", false)], T1);

        assert_eq!(outcome.marked_deleted, vec!["feature/x".to_string()]);
        assert!(outcome.added.is_empty());
        let entry = store.lookup("feature/x").expect("tombstone retained");
        assert_eq!(entry.status, NoteStatus::Deleted);
        assert_eq!(entry.note, "wip");
        assert_eq!(entry.timestamp, T1);
    }

    #[test]
    fn test_reconcile_adds_new_branches() {
        let mut store = initialize_at(&[branch("main", false)], T0);

        let outcome = reconcile_at(
            &mut store,
            &[branch("main", false), branch("feature/y", false)],
            T1,
        );

        assert_eq!(outcome.added, vec!["feature/y".to_string()]);
        assert_eq!(store.lookup("feature/y").unwrap().note, "");
        assert_eq!(store.last_updated, T1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let live = [branch("main", false), branch("origin/main", true)];
        let mut store = initialize_at(&[branch("main", false), branch("gone", false)], T0);

        assert!(reconcile_at(&mut store, &live, T1).changed());
        let after_first = store.clone();

        let second = reconcile_at(&mut store, &live, T2);
        assert!(!second.changed());
        assert_eq!(store, after_first);
    }

    #[test]
    fn test_reconcile_does_not_resurrect_recreated_branch() {
        let mut store = initialize_at(&[branch("feature/x", false)], T0);
        store.upsert_at("feature/x", "wip", T0);
        reconcile_at(&mut store, &[], T1);

        let outcome = reconcile_at(&mut store, &[branch("feature/x", false)], T2);

        assert!(!outcome.changed());
        assert_eq!(store.lookup("feature/x").unwrap().status, NoteStatus::Deleted);
        assert_eq!(store.notes.len(), 1);
    }

    #[test]
    fn test_merge_view_attaches_active_notes_only() {
        let mut store = initialize_at(&[branch("main", false), branch("old", false)], T0);
        store.upsert_at("main", "trunk", T1);
        store.upsert_at("old", "stale", T1);
        store.mark_deleted_at("old", T2);

        let live = [branch("main", false), branch("main", true), branch("old", false), branch("new", false)];
        let view = merge_view(&live, &store);

        assert_eq!(view.len(), 4);
        assert_eq!(view[0].note.as_deref(), Some("trunk"));
        assert_eq!(view[0].note_timestamp.as_deref(), Some(T1));
        assert_eq!(view[1].note.as_deref(), Some("trunk"));
        assert_eq!(view[2].note, None);
        assert_eq!(view[3].note, None);
        assert!(view[0].has_note() && !view[2].has_note());
    }

    #[test]
    fn test_uniqueness_after_mixed_operations() {
        let mut store = initialize_at(&[branch("a", false), branch("b", false)], T0);
        store.upsert_at("a", "one", T0);
        store.upsert_at("c", "three", T0);
        reconcile_at(&mut store, &[branch("a", false), branch("c", false)], T1);
        store.upsert_at("b", "back", T1);
        reconcile_at(&mut store, &[branch("a", false), branch("b", false), branch("b", true)], T2);
        store.upsert_at("a", "again", T2);

        let mut names: Vec<_> = store.notes.iter().map(|e| e.branch_name.clone()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(store.notes.iter().all(|e| store.last_updated >= e.timestamp));
    }
}
