//! Initialize the note store.

use std::io::IsTerminal;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use git_bn_core::{BranchScope, NoteManager, VcsAdapter};

/// Execute init command.
pub async fn execute<V: VcsAdapter>(
    manager: &NoteManager<V>,
    scope: BranchScope,
    yes: bool,
) -> Result<()> {
    let path = manager.store_path().await?;

    if manager.is_initialized().await? && !yes {
        println!(
            "{} {} already exists. Re-initializing discards every note in it.",
            "⚠".yellow(),
            path.display()
        );

        if !std::io::stdin().is_terminal() {
            println!("  Re-run with {} to reset it.", "--yes".cyan());
            return Ok(());
        }

        let proceed = Confirm::new()
            .with_prompt("Reset the branch note store?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    let store = manager.init(scope).await?;

    println!(
        "{} Initialized notes for {} {} branch(es)",
        "✓".green(),
        store.notes.len(),
        scope
    );
    println!("  Store: {}", path.display().to_string().dimmed());
    println!(
        "  Commit it with {} to share notes with collaborators.",
        "git-bn push".cyan()
    );

    Ok(())
}
