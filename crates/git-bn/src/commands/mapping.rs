//! Note history report, tombstones included.

use anyhow::Result;
use git_bn_core::types::MappingReport;
use git_bn_core::{NoteManager, VcsAdapter};

use super::print_not_initialized;

/// Execute mapping command.
pub async fn execute<V: VcsAdapter>(manager: &NoteManager<V>, all: bool) -> Result<()> {
    match manager.mapping_report().await? {
        Some(report) => print!("{}", render_report(&report, all)),
        None => print_not_initialized(),
    }
    Ok(())
}

/// Render the report; without `all`, entries without note text are skipped.
pub fn render_report(report: &MappingReport, all: bool) -> String {
    let mut out = String::from("=== Branch Notes Mapping ===\n\n");

    let deleted = report.entries.iter().filter(|e| !e.is_active()).count();
    out.push_str(&format!(
        "Found {} note(s) across {} branch(es), {} deleted. Last updated: {}\n\n",
        report.effective_count(),
        report.entries.len(),
        deleted,
        report.last_updated
    ));

    let shown: Vec<_> = if all {
        report.entries.iter().collect()
    } else {
        report.effective().collect()
    };

    if shown.is_empty() {
        out.push_str("No notes found\n");
        return out;
    }

    for entry in shown {
        let marker = if entry.is_active() { "" } else { " [DELETED]" };
        out.push_str(&format!("Branch: {}{}\n", entry.branch_name, marker));
        if entry.note.is_empty() {
            out.push_str("Note: (none)\n");
        } else {
            out.push_str(&format!("Note: {}\n", entry.note));
        }
        out.push_str(&format!("Updated: {}\n", entry.timestamp));
        out.push_str(&"─".repeat(50));
        out.push_str("\n\n");
    }

    out
}
