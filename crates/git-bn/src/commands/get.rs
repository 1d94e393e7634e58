//! Show a branch note.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::types::NoteLookup;
use git_bn_core::{NoteManager, VcsAdapter};

/// Execute get command.
pub async fn execute<V: VcsAdapter>(manager: &NoteManager<V>, branch: Option<&str>) -> Result<()> {
    let (target, lookup) = manager.get_note(branch).await?;
    if branch.is_none() {
        println!("No branch specified, using current branch: {}", target.cyan());
    }

    match lookup {
        NoteLookup::Stored(entry) if !entry.note.is_empty() => {
            println!("📝 Note for {}: {}", target.cyan(), entry.note.green());
            println!("  Updated: {}", entry.timestamp.dimmed());
            if !entry.is_active() {
                println!("  Status: {} (branch no longer exists)", "[DELETED]".red());
            }
        }
        NoteLookup::GitNote(note) => {
            println!("📝 Note for {}: {}", target.cyan(), note.green());
            println!("  Source: {}", "git notes".dimmed());
        }
        NoteLookup::Stored(_) | NoteLookup::NotFound => {
            println!("{} No note found for branch: {}", "ℹ".blue(), target);
        }
    }

    Ok(())
}
