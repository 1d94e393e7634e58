//! Command implementations for git-bn CLI.
//!
//! Each submodule implements the logic for one subcommand.

pub mod get;
pub mod init;
pub mod list;
pub mod mapping;
pub mod notes_mapping;
pub mod pull;
pub mod push;
pub mod set;
pub mod sync;

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use git_bn_core::git::{GitCli, check_git};
use git_bn_core::NoteManager;

use crate::config::Config;

/// Build the note manager for the repository at `repo`.
pub fn manager(repo: &Path, config: &Config) -> Result<NoteManager<GitCli>> {
    check_git()?;
    let git = GitCli::new(repo).with_notes_ref(config.git.notes_ref.clone());
    Ok(NoteManager::new(git).with_store_file(config.store.file_name.clone()))
}

/// Guidance shown when a command needs a store that does not exist yet.
pub fn print_not_initialized() {
    println!("{} No branch notes found in this repository", "ℹ".blue());
    println!("  Run {} to create the note store.", "git-bn init".cyan());
}
