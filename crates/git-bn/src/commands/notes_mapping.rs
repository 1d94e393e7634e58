//! Report of git notes under the notes ref.

use anyhow::Result;
use git_bn_core::types::GitNoteMapping;
use git_bn_core::{NoteManager, VcsAdapter};

/// Execute notes-mapping command.
pub async fn execute<V: VcsAdapter>(manager: &NoteManager<V>) -> Result<()> {
    let mappings = manager.git_notes_mapping().await?;
    print!("{}", render_mappings(&mappings));
    Ok(())
}

pub fn render_mappings(mappings: &[GitNoteMapping]) -> String {
    let mut out = String::from("=== Notes Mapping ===\n\n");
    if mappings.is_empty() {
        out.push_str("No notes found\n");
        return out;
    }

    out.push_str(&format!("Found {} notes:\n\n", mappings.len()));
    for mapping in mappings {
        let short = &mapping.commit[..8.min(mapping.commit.len())];
        match &mapping.note {
            Some(note) => {
                out.push_str(&format!("Commit: {}\n", short));
                out.push_str(&format!("Branches: {}\n", mapping.branches.join(", ")));
                out.push_str(&format!("Note: {}\n", note));
                out.push_str(&"─".repeat(50));
                out.push_str("\n\n");
            }
            None => out.push_str(&format!("Commit: {} - Error reading note\n", short)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mappings() {
        let text = render_mappings(&[
            GitNoteMapping {
                commit: "0123456789abcdef".to_string(),
                branches: vec!["main".to_string(), "release".to_string()],
                note: Some("trunk".to_string()),
            },
            GitNoteMapping {
                commit: "fedcba98".to_string(),
                branches: Vec::new(),
                note: None,
            },
        ]);

        assert!(text.contains("Found 2 notes:"));
        assert!(text.contains("Commit: 01234567\nBranches: main, release\nNote: trunk\n"));
        assert!(text.contains("Commit: fedcba98 - Error reading note\n"));
    }

    #[test]
    fn test_render_no_mappings() {
        assert_eq!(render_mappings(&[]), "=== Notes Mapping ===\n\nNo notes found\n");
    }
}
