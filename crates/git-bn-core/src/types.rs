//! Shared types for git-bn-core.
//!
//! `BranchRecord` is rebuilt from git on every query; `NoteStore` is the
//! persisted aggregate written to the repository.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::time::now_timestamp;

/// Schema version written to new store files.
pub const STORE_VERSION: &str = "1.0";

// ─────────────────────────────────────────────────────────────────────────────
// Live Branches
// ─────────────────────────────────────────────────────────────────────────────

/// Which branch namespaces a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchScope {
    Local,
    #[default]
    Remote,
    All,
}

impl BranchScope {
    /// Whether a branch from the given namespace falls inside this scope.
    pub fn includes(&self, is_remote: bool) -> bool {
        match self {
            BranchScope::Local => !is_remote,
            BranchScope::Remote => is_remote,
            BranchScope::All => true,
        }
    }
}

impl std::fmt::Display for BranchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchScope::Local => write!(f, "local"),
            BranchScope::Remote => write!(f, "remote"),
            BranchScope::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for BranchScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(BranchScope::Local),
            "remote" => Ok(BranchScope::Remote),
            "all" => Ok(BranchScope::All),
            _ => Err(format!("Invalid branch scope: {}", s)),
        }
    }
}

/// A branch as reported by git for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    /// Short name; remote branches keep their remote prefix (`origin/main`).
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub commit_hash: String,
    /// Tip commit date, empty when the lookup failed.
    pub commit_date: String,
    /// Tip commit author, empty when the lookup failed.
    pub commit_author: String,
}

impl BranchRecord {
    /// Abbreviated tip commit for display.
    pub fn short_hash(&self) -> &str {
        &self.commit_hash[..8.min(self.commit_hash.len())]
    }
}

/// A live branch joined with its active note, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedBranch {
    #[serde(flatten)]
    pub branch: BranchRecord,
    pub note: Option<String>,
    pub note_timestamp: Option<String>,
}

impl MergedBranch {
    /// True when the branch carries non-empty note text.
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Note Store
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of a note entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Active,
    Deleted,
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteStatus::Active => write!(f, "active"),
            NoteStatus::Deleted => write!(f, "deleted"),
        }
    }
}

/// The annotation recorded for one branch name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    pub branch_name: String,
    /// Empty means "no annotation yet".
    #[serde(default)]
    pub note: String,
    pub timestamp: String,
    #[serde(default)]
    pub status: NoteStatus,
}

impl NoteEntry {
    pub fn is_active(&self) -> bool {
        self.status == NoteStatus::Active
    }
}

/// Persisted aggregate of all branch notes, live and tombstoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStore {
    pub version: String,
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
    pub last_updated: String,
}

impl NoteStore {
    /// An empty store stamped with the current time.
    pub fn new() -> Self {
        Self::new_at(now_timestamp())
    }

    pub fn new_at(timestamp: impl Into<String>) -> Self {
        Self {
            version: STORE_VERSION.to_string(),
            notes: Vec::new(),
            last_updated: timestamp.into(),
        }
    }

    pub fn lookup(&self, branch_name: &str) -> Option<&NoteEntry> {
        self.notes.iter().find(|e| e.branch_name == branch_name)
    }

    fn lookup_mut(&mut self, branch_name: &str) -> Option<&mut NoteEntry> {
        self.notes.iter_mut().find(|e| e.branch_name == branch_name)
    }

    /// The entry for a branch only while it is active.
    pub fn active(&self, branch_name: &str) -> Option<&NoteEntry> {
        self.lookup(branch_name).filter(|e| e.is_active())
    }

    /// Set a branch's note, resurrecting a tombstoned entry.
    pub fn upsert(&mut self, branch_name: &str, note: &str) {
        self.upsert_at(branch_name, note, &now_timestamp());
    }

    pub fn upsert_at(&mut self, branch_name: &str, note: &str, timestamp: &str) {
        match self.lookup_mut(branch_name) {
            Some(entry) => {
                entry.note = note.to_string();
                entry.timestamp = timestamp.to_string();
                entry.status = NoteStatus::Active;
            }
            None => self.push_entry(branch_name, note, timestamp),
        }
        self.touch(timestamp);
    }

    /// Tombstone a branch. Returns false when nothing changed.
    pub fn mark_deleted(&mut self, branch_name: &str) -> bool {
        self.mark_deleted_at(branch_name, &now_timestamp())
    }

    pub fn mark_deleted_at(&mut self, branch_name: &str, timestamp: &str) -> bool {
        let Some(entry) = self.lookup_mut(branch_name) else {
            return false;
        };
        if entry.status == NoteStatus::Deleted {
            return false;
        }
        entry.status = NoteStatus::Deleted;
        entry.timestamp = timestamp.to_string();
        self.touch(timestamp);
        true
    }

    /// Record a branch with an empty note if it is unknown.
    /// Existing entries, tombstoned or not, are left alone.
    pub fn insert_missing_at(&mut self, branch_name: &str, timestamp: &str) -> bool {
        if self.lookup(branch_name).is_some() {
            return false;
        }
        self.push_entry(branch_name, "", timestamp);
        self.touch(timestamp);
        true
    }

    fn push_entry(&mut self, branch_name: &str, note: &str, timestamp: &str) {
        self.notes.push(NoteEntry {
            branch_name: branch_name.to_string(),
            note: note.to_string(),
            timestamp: timestamp.to_string(),
            status: NoteStatus::Active,
        });
    }

    // Keeps last_updated >= every entry timestamp even if the clock steps back.
    fn touch(&mut self, timestamp: &str) {
        if timestamp > self.last_updated.as_str() {
            self.last_updated = timestamp.to_string();
        }
    }

    /// Collapse duplicate entries for the same branch, keeping the last one.
    ///
    /// Files merged by git or written by older tools can carry duplicates.
    /// Returns the number of entries dropped.
    pub fn dedup(&mut self) -> usize {
        let before = self.notes.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<NoteEntry> = self
            .notes
            .drain(..)
            .rev()
            .filter(|e| seen.insert(e.branch_name.clone()))
            .collect();
        kept.reverse();
        self.notes = kept;

        if let Some(latest) = self.notes.iter().map(|e| e.timestamp.clone()).max() {
            self.touch(&latest);
        }
        before - self.notes.len()
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

/// Full note history, tombstones included, sorted by branch name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingReport {
    pub entries: Vec<NoteEntry>,
    pub last_updated: String,
}

impl MappingReport {
    pub fn from_store(store: &NoteStore) -> Self {
        let mut entries = store.notes.clone();
        entries.sort_by(|a, b| a.branch_name.cmp(&b.branch_name));
        Self {
            entries,
            last_updated: store.last_updated.clone(),
        }
    }

    /// Entries that carry note text.
    pub fn effective(&self) -> impl Iterator<Item = &NoteEntry> {
        self.entries.iter().filter(|e| !e.note.is_empty())
    }

    pub fn effective_count(&self) -> usize {
        self.effective().count()
    }
}

/// Where `get` found a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLookup {
    /// Entry from the note store (may be tombstoned).
    Stored(NoteEntry),
    /// No store entry, but a git note is attached to the branch tip.
    GitNote(String),
    NotFound,
}

/// Outcome of staging and committing the store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
}

/// One git note under the notes ref and the branches that contain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitNoteMapping {
    pub commit: String,
    pub branches: Vec<String>,
    /// None when the note object could not be read.
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: &str = "2024-05-01 09:00:00";
    const T2: &str = "2024-05-01 10:00:00";
    const T3: &str = "2024-05-02 08:00:00";

    #[test]
    fn test_upsert_appends_then_replaces() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("feature/x", "wip", T2);
        store.upsert_at("feature/x", "ready", T3);

        assert_eq!(store.notes.len(), 1);
        let entry = store.lookup("feature/x").unwrap();
        assert_eq!(entry.note, "ready");
        assert_eq!(entry.timestamp, T3);
        assert_eq!(store.last_updated, T3);
    }

    #[test]
    fn test_upsert_resurrects_tombstone() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("feature/x", "wip", T1);
        assert!(store.mark_deleted_at("feature/x", T2));

        store.upsert_at("feature/x", "back", T3);

        let entry = store.lookup("feature/x").unwrap();
        assert_eq!(entry.status, NoteStatus::Active);
        assert_eq!(entry.timestamp, T3);
    }

    #[test]
    fn test_mark_deleted_is_idempotent() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("old", "x", T1);

        assert!(store.mark_deleted_at("old", T2));
        assert!(!store.mark_deleted_at("old", T3));

        let entry = store.lookup("old").unwrap();
        assert_eq!(entry.timestamp, T2);
        assert_eq!(store.last_updated, T2);
        assert!(!store.mark_deleted_at("missing", T3));
    }

    #[test]
    fn test_insert_missing_skips_tombstones() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("gone", "x", T1);
        store.mark_deleted_at("gone", T2);

        assert!(!store.insert_missing_at("gone", T3));
        assert!(store.insert_missing_at("new", T3));
        assert_eq!(store.lookup("gone").unwrap().status, NoteStatus::Deleted);
        assert_eq!(store.lookup("new").unwrap().note, "");
        assert!(store.active("gone").is_none());
    }

    #[test]
    fn test_last_updated_never_moves_backwards() {
        let mut store = NoteStore::new_at(T3);
        store.upsert_at("a", "x", T1);
        assert_eq!(store.last_updated, T3);
        assert!(store.notes.iter().all(|e| store.last_updated >= e.timestamp));
    }

    #[test]
    fn test_dedup_keeps_last_occurrence() {
        let json = r#"{
            "version": "1.0",
            "notes": [
                {"branchName": "a", "note": "first", "timestamp": "2024-05-01 09:00:00"},
                {"branchName": "b", "note": "", "timestamp": "2024-05-01 09:00:00"},
                {"branchName": "a", "note": "second", "timestamp": "2024-05-03 09:00:00", "status": "deleted"}
            ],
            "lastUpdated": "2024-05-01 09:00:00"
        }"#;
        let mut store: NoteStore = serde_json::from_str(json).unwrap();

        assert_eq!(store.dedup(), 1);
        assert_eq!(store.notes.len(), 2);
        assert_eq!(store.notes[0].branch_name, "b");
        assert_eq!(store.lookup("a").unwrap().note, "second");
        assert_eq!(store.last_updated, "2024-05-03 09:00:00");
    }

    #[test]
    fn test_status_defaults_to_active() {
        let json = r#"{"branchName": "main", "note": "trunk", "timestamp": "2024-05-01 09:00:00"}"#;
        let entry: NoteEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_active());
    }

    #[test]
    fn test_store_serializes_camel_case() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("main", "trunk", T2);
        store.mark_deleted_at("main", T3);

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["lastUpdated"], T3);
        assert_eq!(value["notes"][0]["branchName"], "main");
        assert_eq!(value["notes"][0]["status"], "deleted");
    }

    #[test]
    fn test_mapping_report_sorted_with_effective_count() {
        let mut store = NoteStore::new_at(T1);
        store.upsert_at("zeta", "z", T1);
        store.insert_missing_at("alpha", T1);
        store.upsert_at("mid", "m", T1);
        store.mark_deleted_at("mid", T2);

        let report = MappingReport::from_store(&store);
        let names: Vec<_> = report.entries.iter().map(|e| e.branch_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(report.effective_count(), 2);
    }

    #[test]
    fn test_branch_scope_includes() {
        assert!(BranchScope::Local.includes(false));
        assert!(!BranchScope::Local.includes(true));
        assert!(BranchScope::Remote.includes(true));
        assert!(BranchScope::All.includes(true) && BranchScope::All.includes(false));
        assert_eq!(BranchScope::default(), BranchScope::Remote);
        assert_eq!("all".parse::<BranchScope>().unwrap(), BranchScope::All);
        assert!("everything".parse::<BranchScope>().is_err());
    }
}
