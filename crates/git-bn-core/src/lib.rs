//! git-bn-core - Core library for git-bn
//!
//! This crate keeps human-readable notes attached to git branches:
//!
//! - **git**: Git adapter (branches, commits, push/pull, git notes)
//! - **store**: JSON note store at the repository root
//! - **reconcile**: Aligning stored notes with the live branch list
//! - **manager**: Façade used by the CLI
//! - **time**: Timestamp formatting

pub mod error;
pub mod git;
pub mod manager;
pub mod reconcile;
pub mod store;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use git::{GitCli, VcsAdapter};
pub use manager::NoteManager;
pub use store::NoteFile;
pub use types::{BranchRecord, BranchScope, MergedBranch, NoteEntry, NoteStatus, NoteStore};
