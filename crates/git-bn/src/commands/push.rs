//! Commit the note store and push.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::types::CommitOutcome;
use git_bn_core::{NoteManager, VcsAdapter};

use super::print_not_initialized;
use crate::config::Config;

/// Execute push command.
pub async fn execute<V: VcsAdapter>(
    manager: &NoteManager<V>,
    config: &Config,
    message: Option<&str>,
) -> Result<()> {
    let message = message.unwrap_or(config.git.commit_message.as_str());

    println!("{} Pushing branch notes...", "🔄".cyan());
    match manager.sync_to_remote(message).await? {
        None => print_not_initialized(),
        Some(CommitOutcome::Committed) => {
            println!("{} Committed note store", "✓".green());
            println!("{} Pushed to remote", "✓".green());
        }
        Some(CommitOutcome::NothingToCommit) => {
            println!("{} Nothing to commit, note store unchanged", "ℹ".blue());
            println!("{} Pushed to remote", "✓".green());
        }
    }

    Ok(())
}
