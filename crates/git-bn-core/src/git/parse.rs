//! Parsers for git plumbing output.

use crate::time::parse_commit_date;
use crate::types::BranchScope;

/// Format passed to `git for-each-ref`: HEAD marker, refname, tip, symref.
pub const BRANCH_FORMAT: &str = "--format=%(HEAD)%09%(refname)%09%(objectname)%09%(symref)";

/// Format passed to `git log -1` for commit metadata.
pub const COMMIT_META_FORMAT: &str = "--format=%ci;%an";

const LOCAL_PREFIX: &str = "refs/heads/";
const REMOTE_PREFIX: &str = "refs/remotes/";

/// Branch line before metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBranch {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub commit: String,
}

/// Ref namespaces to enumerate for a scope.
pub fn scope_ref_patterns(scope: BranchScope) -> &'static [&'static str] {
    match scope {
        BranchScope::Local => &["refs/heads"],
        BranchScope::Remote => &["refs/remotes"],
        BranchScope::All => &["refs/heads", "refs/remotes"],
    }
}

/// Parse one line of `git for-each-ref` output produced with [`BRANCH_FORMAT`].
///
/// Symbolic refs (`origin/HEAD`) and malformed lines yield `None`.
pub fn parse_branch_line(line: &str) -> Option<RawBranch> {
    let mut parts = line.split('\t');
    let head = parts.next()?;
    let refname = parts.next()?;
    let commit = parts.next()?;
    let symref = parts.next().unwrap_or("");

    if !symref.trim().is_empty() || commit.is_empty() {
        return None;
    }

    let (name, is_remote) = if let Some(name) = refname.strip_prefix(LOCAL_PREFIX) {
        (name, false)
    } else if let Some(name) = refname.strip_prefix(REMOTE_PREFIX) {
        (name, true)
    } else {
        return None;
    };

    if name.is_empty() {
        return None;
    }

    Some(RawBranch {
        name: name.to_string(),
        is_current: head.trim() == "*",
        is_remote,
        commit: commit.to_string(),
    })
}

/// Parse all branch lines, skipping anything unrecognized.
pub fn parse_branch_list(output: &str) -> Vec<RawBranch> {
    output.lines().filter_map(parse_branch_line).collect()
}

/// Parse `git log -1 --format=%ci;%an` into (UTC date, author).
pub fn parse_commit_meta(output: &str) -> Option<(String, String)> {
    let (raw_date, author) = output.trim().split_once(';')?;
    let date = parse_commit_date(raw_date)?;
    Some((date, author.trim().to_string()))
}

/// Parse `git notes list`: each line is `<note object> <annotated object>`.
/// Returns (annotated object, note object) pairs.
pub fn parse_notes_list(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let (note, target) = line.trim().split_once(' ')?;
            Some((target.trim().to_string(), note.to_string()))
        })
        .collect()
}

/// Parse `git branch --format=%(refname:short)` output.
pub fn parse_branch_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Whether git's commit output says there was nothing to commit.
pub fn is_nothing_to_commit(text: &str) -> bool {
    text.contains("nothing to commit")
        || text.contains("nothing added to commit")
        || text.contains("no changes added to commit")
}

/// Expand a short notes ref (`branch-notes`) to its full name.
pub fn full_notes_ref(notes_ref: &str) -> String {
    if notes_ref.starts_with("refs/") {
        notes_ref.to_string()
    } else {
        format!("refs/notes/{}", notes_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOR_EACH_REF: &str = "*\trefs/heads/feature/x\t1111111111111111111111111111111111111111\t\n \trefs/heads/main\t2222222222222222222222222222222222222222\t\n \trefs/remotes/origin/HEAD\t2222222222222222222222222222222222222222\trefs/remotes/origin/main\n \trefs/remotes/origin/main\t2222222222222222222222222222222222222222\t\n";

    #[test]
    fn test_parse_branch_list() {
        let branches = parse_branch_list(FOR_EACH_REF);
        assert_eq!(branches.len(), 3);

        assert_eq!(branches[0].name, "feature/x");
        assert!(branches[0].is_current);
        assert!(!branches[0].is_remote);

        assert_eq!(branches[1].name, "main");
        assert!(!branches[1].is_current);

        assert_eq!(branches[2].name, "origin/main");
        assert!(branches[2].is_remote);
        assert_eq!(branches[2].commit, "2222222222222222222222222222222222222222");
    }

    #[test]
    fn test_parse_branch_line_rejects_garbage() {
        assert!(parse_branch_line("").is_none());
        assert!(parse_branch_line(" \trefs/tags/v1\tabc\t").is_none());
        assert!(parse_branch_line(" \trefs/heads/main\t\t").is_none());
    }

    #[test]
    fn test_parse_commit_meta() {
        let (date, author) =
            parse_commit_meta("2024-01-15 10:30:00 +0000;Ada Lovelace\n").unwrap();
        assert_eq!(date, "2024-01-15 10:30:00");
        assert_eq!(author, "Ada Lovelace");

        assert!(parse_commit_meta("").is_none());
        assert!(parse_commit_meta("garbage;someone").is_none());
    }

    #[test]
    fn test_parse_commit_meta_author_with_semicolon() {
        let (_, author) = parse_commit_meta("2024-01-15 10:30:00 +0000;Doe; Jane").unwrap();
        assert_eq!(author, "Doe; Jane");
    }

    #[test]
    fn test_parse_notes_list() {
        let out = "aaaa1111 bbbb2222\ncccc3333 dddd4444\n";
        assert_eq!(
            parse_notes_list(out),
            vec![
                ("bbbb2222".to_string(), "aaaa1111".to_string()),
                ("dddd4444".to_string(), "cccc3333".to_string()),
            ]
        );
        assert!(parse_notes_list("").is_empty());
    }

    #[test]
    fn test_parse_branch_names() {
        assert_eq!(
            parse_branch_names("* main\n  feature/x\n\n"),
            vec!["main".to_string(), "feature/x".to_string()]
        );
    }

    #[test]
    fn test_nothing_to_commit_detection() {
        assert!(is_nothing_to_commit("On branch main\nnothing to commit, working tree clean"));
        assert!(!is_nothing_to_commit("[main abc123] chore: update branch notes"));
    }

    #[test]
    fn test_full_notes_ref() {
        assert_eq!(full_notes_ref("branch-notes"), "refs/notes/branch-notes");
        assert_eq!(full_notes_ref("refs/notes/custom"), "refs/notes/custom");
    }
}
