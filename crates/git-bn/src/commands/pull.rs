//! Pull shared notes.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::{NoteManager, VcsAdapter};

/// Execute pull command.
pub async fn execute<V: VcsAdapter>(manager: &NoteManager<V>) -> Result<()> {
    println!("{} Pulling branch notes...", "🔄".cyan());
    manager.pull_from_remote().await?;
    println!("{} Pulled latest notes from remote", "✓".green());
    Ok(())
}
