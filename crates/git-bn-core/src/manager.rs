//! Note manager façade.
//!
//! Composes the git adapter, the store file and the reconciliation engine
//! into the operations the CLI exposes. Every read path reconciles first so
//! listings never show notes for branches that no longer exist.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::git::VcsAdapter;
use crate::reconcile::{ReconcileOutcome, initialize, merge_view, reconcile};
use crate::store::{DEFAULT_STORE_FILE, NoteFile};
use crate::types::{
    BranchRecord, BranchScope, CommitOutcome, GitNoteMapping, MappingReport, MergedBranch,
    NoteLookup, NoteStore,
};

/// Result of mirroring the store into git notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitNotesSync {
    /// Whether the remote notes ref was fetched first.
    pub fetched: bool,
    /// Branches whose git note was (re)written.
    pub written: Vec<String>,
    /// Whether the notes ref was pushed to the remote.
    pub pushed: bool,
}

/// Entry point for every branch note operation.
pub struct NoteManager<V> {
    vcs: V,
    store_file_name: String,
}

impl<V: VcsAdapter> NoteManager<V> {
    pub fn new(vcs: V) -> Self {
        Self {
            vcs,
            store_file_name: DEFAULT_STORE_FILE.to_string(),
        }
    }

    /// Use a different store file name at the repository root.
    pub fn with_store_file(mut self, file_name: impl Into<String>) -> Self {
        self.store_file_name = file_name.into();
        self
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    async fn note_file(&self) -> Result<NoteFile> {
        let root = self.vcs.repo_root().await?;
        Ok(NoteFile::in_repo(&root, &self.store_file_name))
    }

    /// Absolute path of the store file.
    pub async fn store_path(&self) -> Result<PathBuf> {
        Ok(self.note_file().await?.path().to_path_buf())
    }

    /// Whether a store file exists at the repository root.
    pub async fn is_initialized(&self) -> Result<bool> {
        Ok(self.note_file().await?.exists())
    }

    /// Reset the store to one empty entry per branch in `scope`.
    ///
    /// Destructive: any existing store is replaced, not merged.
    pub async fn init(&self, scope: BranchScope) -> Result<NoteStore> {
        let file = self.note_file().await?;
        let branches = self.vcs.list_branches(scope).await?;
        let store = initialize(&branches);
        file.save(&store)?;

        info!("Initialized note store with {} {} branches", store.notes.len(), scope);
        Ok(store)
    }

    /// Load and reconcile the store against every live branch, writing it
    /// back only when something changed.
    async fn refresh(&self) -> Result<Option<(NoteStore, Vec<BranchRecord>, ReconcileOutcome)>> {
        let file = self.note_file().await?;
        let Some(mut store) = file.load()? else {
            return Ok(None);
        };

        // Always the full set: a scoped listing must not tombstone the rest.
        let live = self.vcs.list_branches(BranchScope::All).await?;
        let outcome = reconcile(&mut store, &live);
        if outcome.changed() {
            for name in &outcome.marked_deleted {
                info!("Branch {} no longer exists; note marked deleted", name);
            }
            file.save(&store)?;
        }

        Ok(Some((store, live, outcome)))
    }

    /// Live branches in `scope` joined with their notes.
    ///
    /// Returns `None` when no store exists yet.
    pub async fn list_with_notes(
        &self,
        scope: BranchScope,
        include_noteless: bool,
    ) -> Result<Option<Vec<MergedBranch>>> {
        let Some((store, live, _)) = self.refresh().await? else {
            return Ok(None);
        };

        let view = merge_view(&live, &store)
            .into_iter()
            .filter(|m| scope.includes(m.branch.is_remote))
            .filter(|m| include_noteless || m.has_note())
            .collect();
        Ok(Some(view))
    }

    /// Resolve an optional branch argument to a name.
    pub async fn resolve_branch(&self, branch: Option<&str>) -> Result<String> {
        match branch {
            Some(name) => Ok(name.to_string()),
            None => self.vcs.current_branch_name().await,
        }
    }

    /// Annotate a branch (default: current). Creates the store if needed.
    /// Returns the branch that was annotated.
    pub async fn set_note(&self, branch: Option<&str>, note: &str) -> Result<String> {
        let branch = self.resolve_branch(branch).await?;
        let file = self.note_file().await?;
        let mut store = file.load()?.unwrap_or_default();

        store.upsert(&branch, note);
        file.save(&store)?;

        info!("Set note for branch {}", branch);
        Ok(branch)
    }

    /// Look up a branch's note (default: current), falling back to a git note
    /// on the branch tip when the store has no text for it.
    pub async fn get_note(&self, branch: Option<&str>) -> Result<(String, NoteLookup)> {
        let branch = self.resolve_branch(branch).await?;
        let file = self.note_file().await?;
        let entry = file.load()?.and_then(|s| s.lookup(&branch).cloned());

        if let Some(entry) = &entry {
            if !entry.note.is_empty() {
                return Ok((branch, NoteLookup::Stored(entry.clone())));
            }
        }

        if let Some(note) = self.vcs.read_git_note(&branch).await? {
            return Ok((branch, NoteLookup::GitNote(note)));
        }

        let lookup = match entry {
            Some(entry) => NoteLookup::Stored(entry),
            None => NoteLookup::NotFound,
        };
        Ok((branch, lookup))
    }

    /// Commit the store file and push. "Nothing to commit" still pushes.
    ///
    /// Returns `None` when no store exists yet.
    pub async fn sync_to_remote(&self, message: &str) -> Result<Option<CommitOutcome>> {
        let file = self.note_file().await?;
        if !file.exists() {
            return Ok(None);
        }

        let outcome = self
            .vcs
            .stage_and_commit(&[file.path().to_path_buf()], message)
            .await?;
        if outcome == CommitOutcome::NothingToCommit {
            info!("Note store unchanged; nothing to commit");
        }

        self.vcs.push().await?;
        Ok(Some(outcome))
    }

    /// Pull the current branch, bringing in collaborators' notes.
    pub async fn pull_from_remote(&self) -> Result<()> {
        self.vcs.pull().await
    }

    /// Full note history, tombstones included, sorted by branch name.
    ///
    /// Returns `None` when no store exists yet.
    pub async fn mapping_report(&self) -> Result<Option<MappingReport>> {
        Ok(self
            .refresh()
            .await?
            .map(|(store, _, _)| MappingReport::from_store(&store)))
    }

    /// Mirror annotated live branches into git notes and exchange the notes
    /// ref with `remote`.
    ///
    /// Returns `None` when no store exists yet.
    pub async fn sync_git_notes(&self, remote: &str) -> Result<Option<GitNotesSync>> {
        let Some((store, live, _)) = self.refresh().await? else {
            return Ok(None);
        };

        let mut result = GitNotesSync::default();
        if self.vcs.remote_has_notes(remote).await? {
            self.vcs.fetch_notes(remote).await?;
            result.fetched = true;
        } else {
            info!("No branch notes found on {}", remote);
        }

        let mut seen = HashSet::new();
        for merged in merge_view(&live, &store) {
            if !merged.has_note() || !seen.insert(merged.branch.name.clone()) {
                continue;
            }
            let note = merged.note.unwrap_or_default();
            let current = self.vcs.read_git_note(&merged.branch.name).await?;
            if current.as_deref() == Some(note.as_str()) {
                continue;
            }
            self.vcs.write_git_note(&merged.branch.name, &note).await?;
            result.written.push(merged.branch.name);
        }

        if self.vcs.has_local_notes().await? {
            self.vcs.push_notes(remote).await?;
            result.pushed = true;
        } else {
            info!("No local branch notes to push");
        }
        Ok(Some(result))
    }

    /// Every git note under the notes ref with the branches containing it.
    pub async fn git_notes_mapping(&self) -> Result<Vec<GitNoteMapping>> {
        let mut mappings = Vec::new();
        for (commit, _note_object) in self.vcs.list_git_notes().await? {
            let branches = match self.vcs.branches_containing(&commit).await {
                Ok(branches) => branches,
                Err(e) => {
                    warn!("Could not resolve branches for {}: {}", commit, e);
                    Vec::new()
                }
            };
            let note = match self.vcs.read_git_note(&commit).await {
                Ok(note) => note,
                Err(e) => {
                    warn!("Could not read note on {}: {}", commit, e);
                    None
                }
            };
            mappings.push(GitNoteMapping {
                commit,
                branches,
                note,
            });
        }
        Ok(mappings)
    }
}
