//! Exchange notes through git notes.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::{NoteManager, VcsAdapter};

use super::print_not_initialized;

/// Execute sync command.
pub async fn execute<V: VcsAdapter>(manager: &NoteManager<V>, remote: &str) -> Result<()> {
    println!("{} Syncing git notes with {}...", "🔄".cyan(), remote);

    let Some(result) = manager.sync_git_notes(remote).await? else {
        print_not_initialized();
        return Ok(());
    };

    if result.fetched {
        println!("{} Fetched branch notes from {}", "✓".green(), remote);
    } else {
        println!("{} No branch notes on {} yet", "ℹ".blue(), remote);
    }

    if result.written.is_empty() {
        println!("{} Git notes already up to date", "ℹ".blue());
    } else {
        println!("{} Updated {} git note(s):", "✓".green(), result.written.len());
        for branch in &result.written {
            println!("  • {}", branch.cyan());
        }
    }

    if result.pushed {
        println!("{} Pushed branch notes to {}", "✓".green(), remote);
    } else {
        println!("{} No branch notes to push", "ℹ".blue());
    }

    println!("{} Notes synchronization completed", "✓".green());
    Ok(())
}
