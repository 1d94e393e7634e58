//! List branches with their notes.

use anyhow::Result;
use colored::Colorize;
use git_bn_core::{BranchScope, MergedBranch, NoteManager, VcsAdapter};
use tracing::info;

use super::print_not_initialized;

const HEADERS: [&str; 5] = ["Branch", "Commit", "Author", "Date", "Note"];

/// Execute list command.
pub async fn execute<V: VcsAdapter>(
    manager: &NoteManager<V>,
    scope: BranchScope,
    include_empty: bool,
) -> Result<()> {
    info!("Fetching {} branches...", scope);

    let Some(branches) = manager.list_with_notes(scope, include_empty).await? else {
        print_not_initialized();
        return Ok(());
    };

    if branches.is_empty() {
        println!("{} No branches with notes found", "ℹ".blue());
        if !include_empty {
            println!("  Use {} to include branches without notes.", "--all".cyan());
        }
        return Ok(());
    }

    print!("{}", render_table(&branches));
    println!(
        "{}",
        "* Indicates current branch; [remote] Indicates remote branch".yellow()
    );

    Ok(())
}

/// One table row per branch.
fn row(branch: &MergedBranch) -> [String; 5] {
    let prefix = if branch.branch.is_current { "* " } else { "  " };
    let remote = if branch.branch.is_remote { "[remote] " } else { "" };
    [
        format!("{}{}{}", prefix, remote, branch.branch.name),
        branch.branch.short_hash().to_string(),
        branch.branch.commit_author.clone(),
        branch.branch.commit_date.clone(),
        branch.note.clone().unwrap_or_default(),
    ]
}

/// Render branches as an aligned plain-text table.
pub fn render_table(branches: &[MergedBranch]) -> String {
    let rows: Vec<[String; 5]> = branches.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| -> String {
        let mut line = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ");
        line.truncate(line.trim_end().len());
        line.push('\n');
        line
    };

    let mut out = format_line(&HEADERS[..]);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format_line(&rule.iter().map(String::as_str).collect::<Vec<_>>()));
    for r in &rows {
        out.push_str(&format_line(&r.iter().map(String::as_str).collect::<Vec<_>>()));
    }
    out
}
