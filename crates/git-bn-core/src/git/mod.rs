//! Git adapter.
//!
//! Provides the repository operations the note manager needs:
//! - Enumerate local/remote branches with tip commit metadata
//! - Resolve the current branch and repository root
//! - Stage, commit, push and pull the note store file
//! - Read, write, fetch and push git notes under a dedicated notes ref

mod parse;

pub use parse::*;

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{BranchRecord, BranchScope, CommitOutcome};

/// Default notes ref used for the git-notes mirror.
pub const DEFAULT_NOTES_REF: &str = "branch-notes";

/// Default remote for notes sync.
pub const DEFAULT_REMOTE: &str = "origin";

/// Upper bound on concurrent `git log` processes while listing branches.
const MAX_METADATA_LOOKUPS: usize = 16;

/// Version-control operations consumed by the note manager.
///
/// `GitCli` is the production implementation; tests substitute an in-memory
/// repository.
#[async_trait]
pub trait VcsAdapter: Send + Sync {
    /// Top-level directory of the working tree.
    async fn repo_root(&self) -> Result<PathBuf>;

    /// Branches in the given scope, with best-effort commit metadata.
    async fn list_branches(&self, scope: BranchScope) -> Result<Vec<BranchRecord>>;

    /// Name of the checked-out branch.
    async fn current_branch_name(&self) -> Result<String>;

    /// Stage the paths and commit only them.
    async fn stage_and_commit(&self, paths: &[PathBuf], message: &str) -> Result<CommitOutcome>;

    /// Push the current branch to its upstream.
    async fn push(&self) -> Result<()>;

    /// Pull the current branch from its upstream.
    async fn pull(&self) -> Result<()>;

    /// Note attached to a branch tip (or any commit) under the notes ref.
    async fn read_git_note(&self, target: &str) -> Result<Option<String>>;

    /// Attach (or replace) a note on a branch tip.
    async fn write_git_note(&self, branch: &str, note: &str) -> Result<()>;

    /// Whether the remote advertises the notes ref.
    async fn remote_has_notes(&self, remote: &str) -> Result<bool>;

    /// Fetch the notes ref from the remote, overwriting the local one.
    async fn fetch_notes(&self, remote: &str) -> Result<()>;

    /// Push the notes ref to the remote.
    async fn push_notes(&self, remote: &str) -> Result<()>;

    /// Whether the notes ref exists locally.
    async fn has_local_notes(&self) -> Result<bool>;

    /// (annotated commit, note object) pairs under the notes ref.
    async fn list_git_notes(&self) -> Result<Vec<(String, String)>>;

    /// Local branches whose history contains the commit.
    async fn branches_containing(&self, commit: &str) -> Result<Vec<String>>;
}

/// Check if git is installed and available.
pub fn check_git() -> Result<PathBuf> {
    match which::which("git") {
        Ok(path) => {
            debug!("Found git at: {:?}", path);
            Ok(path)
        }
        Err(_) => Err(Error::GitNotFound),
    }
}

/// `VcsAdapter` backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
    notes_ref: String,
}

impl GitCli {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            notes_ref: DEFAULT_NOTES_REF.to_string(),
        }
    }

    /// Use a different notes ref for the git-notes mirror.
    pub fn with_notes_ref(mut self, notes_ref: impl Into<String>) -> Self {
        self.notes_ref = notes_ref.into();
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn notes_ref(&self) -> &str {
        &self.notes_ref
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        run_git(&self.repo_path, args).await
    }

    /// Run git and return stdout, mapping failures to `CommandFailed`
    /// (or `NotAGitRepository` when git says so).
    async fn run_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(self.classify_failure(args, &stderr))
    }

    /// Run a network command; failures are surfaced verbatim.
    async fn run_transport(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args).await?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_a_repo(&stderr) {
            return Err(self.not_a_repo());
        }
        Err(Error::TransportFailure(stderr.trim().to_string()))
    }

    fn classify_failure(&self, args: &[&str], stderr: &str) -> Error {
        if is_not_a_repo(stderr) {
            self.not_a_repo()
        } else {
            Error::command_failed(format!("git {}", args.join(" ")), stderr.trim())
        }
    }

    fn not_a_repo(&self) -> Error {
        Error::NotAGitRepository(self.repo_path.to_string_lossy().to_string())
    }
}

async fn run_git(repo_path: &Path, args: &[&str]) -> Result<Output> {
    debug!("git -C {:?} {}", repo_path, args.join(" "));
    Command::new("git")
        .arg("-C")
        .arg(repo_path)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::GitNotFound
            } else {
                Error::Io(e)
            }
        })
}

fn is_not_a_repo(stderr: &str) -> bool {
    stderr.contains("not a git repository") || stderr.contains("cannot change to")
}

async fn lookup_commit_metadata(repo_path: &Path, commit: &str) -> Result<(String, String)> {
    let output = run_git(repo_path, &["log", "-1", COMMIT_META_FORMAT, commit]).await?;
    if !output.status.success() {
        return Err(Error::MetadataLookupFailed {
            commit: commit.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_commit_meta(&stdout).ok_or_else(|| Error::MetadataLookupFailed {
        commit: commit.to_string(),
        reason: format!("unexpected log output: {}", stdout.trim()),
    })
}

/// Join branches with their metadata lookups. A failed lookup leaves the
/// date and author empty; the branch is still listed.
fn branch_records(
    raw: Vec<RawBranch>,
    metadata: Vec<Result<(String, String)>>,
) -> Vec<BranchRecord> {
    raw.into_iter()
        .zip(metadata)
        .map(|(branch, meta)| {
            let (commit_date, commit_author) = meta.unwrap_or_else(|e| {
                warn!("Branch {}: {}", branch.name, e);
                (String::new(), String::new())
            });
            BranchRecord {
                name: branch.name,
                is_current: branch.is_current,
                is_remote: branch.is_remote,
                commit_hash: branch.commit,
                commit_date,
                commit_author,
            }
        })
        .collect()
}

#[async_trait]
impl VcsAdapter for GitCli {
    async fn repo_root(&self) -> Result<PathBuf> {
        let output = self.run(&["rev-parse", "--show-toplevel"]).await?;
        if !output.status.success() {
            return Err(self.not_a_repo());
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }

    async fn list_branches(&self, scope: BranchScope) -> Result<Vec<BranchRecord>> {
        let mut args = vec!["for-each-ref", BRANCH_FORMAT];
        args.extend_from_slice(scope_ref_patterns(scope));
        let stdout = self.run_ok(&args).await?;
        let raw = parse_branch_list(&stdout);

        debug!("Found {} {} branches", raw.len(), scope);

        // Metadata lookups are independent; run them concurrently, bounded.
        let limit = Arc::new(Semaphore::new(MAX_METADATA_LOOKUPS));
        let mut lookups = JoinSet::new();
        for (idx, branch) in raw.iter().enumerate() {
            let repo = self.repo_path.clone();
            let commit = branch.commit.clone();
            let limit = Arc::clone(&limit);
            lookups.spawn(async move {
                let _permit = limit.acquire_owned().await.ok();
                (idx, lookup_commit_metadata(&repo, &commit).await)
            });
        }

        let mut metadata: Vec<Result<(String, String)>> = raw
            .iter()
            .map(|b| {
                Err(Error::MetadataLookupFailed {
                    commit: b.commit.clone(),
                    reason: "lookup did not complete".to_string(),
                })
            })
            .collect();
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((idx, result)) => metadata[idx] = result,
                Err(e) => warn!("Commit metadata task failed: {}", e),
            }
        }

        Ok(branch_records(raw, metadata))
    }

    async fn current_branch_name(&self) -> Result<String> {
        let output = self.run(&["symbolic-ref", "--short", "-q", "HEAD"]).await?;
        if output.status.success() {
            let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !branch.is_empty() {
                return Ok(branch);
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_a_repo(&stderr) {
            return Err(self.not_a_repo());
        }
        // symbolic-ref -q exits 1 silently when HEAD is detached
        Err(Error::DetachedHead)
    }

    async fn stage_and_commit(&self, paths: &[PathBuf], message: &str) -> Result<CommitOutcome> {
        let path_args: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let mut add = vec!["add", "--"];
        add.extend(path_args.iter().map(String::as_str));
        self.run_ok(&add).await?;

        // Exit status 0 means the index has no changes for these paths.
        let mut diff = vec!["diff", "--cached", "--quiet", "--"];
        diff.extend(path_args.iter().map(String::as_str));
        if self.run(&diff).await?.status.success() {
            debug!("Nothing staged for {:?}", paths);
            return Ok(CommitOutcome::NothingToCommit);
        }

        let mut commit = vec!["commit", "-m", message, "--"];
        commit.extend(path_args.iter().map(String::as_str));
        let output = self.run(&commit).await?;
        if output.status.success() {
            return Ok(CommitOutcome::Committed);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_nothing_to_commit(&stdout) || is_nothing_to_commit(&stderr) {
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(self.classify_failure(&commit, &stderr))
    }

    async fn push(&self) -> Result<()> {
        self.run_transport(&["push"]).await
    }

    async fn pull(&self) -> Result<()> {
        self.run_transport(&["pull"]).await
    }

    async fn read_git_note(&self, target: &str) -> Result<Option<String>> {
        let ref_arg = format!("--ref={}", self.notes_ref);
        let output = self.run(&["notes", &ref_arg, "show", target]).await?;
        if !output.status.success() {
            return Ok(None);
        }
        let note = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(note).filter(|n| !n.is_empty()))
    }

    async fn write_git_note(&self, branch: &str, note: &str) -> Result<()> {
        let ref_arg = format!("--ref={}", self.notes_ref);
        self.run_ok(&["notes", &ref_arg, "add", "-f", "-m", note, branch])
            .await
            .map(|_| ())
    }

    async fn remote_has_notes(&self, remote: &str) -> Result<bool> {
        let full_ref = full_notes_ref(&self.notes_ref);
        let output = self.run(&["ls-remote", remote, &full_ref]).await?;
        if !output.status.success() {
            debug!(
                "ls-remote {} failed: {}",
                remote,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(false);
        }
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    async fn fetch_notes(&self, remote: &str) -> Result<()> {
        let full_ref = full_notes_ref(&self.notes_ref);
        let refspec = format!("+{0}:{0}", full_ref);
        self.run_transport(&["fetch", remote, &refspec]).await
    }

    async fn push_notes(&self, remote: &str) -> Result<()> {
        let full_ref = full_notes_ref(&self.notes_ref);
        self.run_transport(&["push", remote, &full_ref]).await
    }

    async fn has_local_notes(&self) -> Result<bool> {
        let full_ref = full_notes_ref(&self.notes_ref);
        let output = self.run(&["rev-parse", "--verify", "-q", &full_ref]).await?;
        if output.status.success() {
            return Ok(true);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_a_repo(&stderr) {
            return Err(self.not_a_repo());
        }
        Ok(false)
    }

    async fn list_git_notes(&self) -> Result<Vec<(String, String)>> {
        let ref_arg = format!("--ref={}", self.notes_ref);
        let output = self.run(&["notes", &ref_arg, "list"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_a_repo(&stderr) {
                return Err(self.not_a_repo());
            }
            // Unknown notes ref: nothing recorded yet
            return Ok(Vec::new());
        }
        Ok(parse_notes_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn branches_containing(&self, commit: &str) -> Result<Vec<String>> {
        let stdout = self
            .run_ok(&["branch", "--contains", commit, "--format=%(refname:short)"])
            .await?;
        Ok(parse_branch_names(&stdout))
    }
}
