//! Set a branch note.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::{NoteManager, VcsAdapter};

use crate::config::Config;

/// Execute set command.
pub async fn execute<V: VcsAdapter>(
    manager: &NoteManager<V>,
    config: &Config,
    note: &str,
    branch: Option<&str>,
    sync: bool,
) -> Result<()> {
    let target = manager.set_note(branch, note).await?;
    if branch.is_none() {
        println!("No branch specified, using current branch: {}", target.cyan());
    }

    println!("{} Set note for branch {}", "✓".green(), target.cyan());

    if sync {
        super::push::execute(manager, config, None).await?;
    } else {
        println!(
            "{} Note is stored locally. Use {} to share it.",
            "💡".yellow(),
            "git-bn push".cyan()
        );
    }

    Ok(())
}
