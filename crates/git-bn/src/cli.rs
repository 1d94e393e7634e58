//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use git_bn_core::BranchScope;

/// Git Branch Notes
///
/// Attach notes to branches and keep them in step with the branch list.
#[derive(Parser, Debug)]
#[command(name = "git-bn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if git-bn was started in <path>
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the note store with one empty entry per branch (destructive)
    Init {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Overwrite an existing store without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// List branches with their notes
    List {
        #[command(flatten)]
        filter: ListFilter,

        /// Show all branches, including those without notes
        #[arg(short, long, visible_alias = "empty")]
        all: bool,
    },

    /// Set the note for a branch (default: current branch)
    Set {
        /// Note text
        note: String,

        /// Branch name (defaults to the current branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Commit and push the note store afterwards
        #[arg(short, long)]
        sync: bool,
    },

    /// Show the note for a branch (default: current branch)
    Get {
        /// Branch name (defaults to the current branch)
        branch: Option<String>,
    },

    /// Commit the note store and push
    Push {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Pull the current branch to pick up shared notes
    Pull,

    /// Show note history, including deleted branches
    Mapping {
        /// Include entries without note text
        #[arg(short, long)]
        all: bool,
    },

    /// Mirror notes into git notes and exchange them with a remote
    Sync {
        /// Remote name (defaults to the configured remote)
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Show which commits and branches carry git notes
    NotesMapping,

    /// Show version
    Version,
}

/// Branch namespace selection for `init`.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct ScopeArgs {
    /// Remote branches only
    #[arg(short, long)]
    pub remote: bool,

    /// Local branches only
    #[arg(short, long)]
    pub local: bool,

    /// Local and remote branches
    #[arg(short, long)]
    pub all: bool,
}

impl ScopeArgs {
    /// Selected scope, or `default` when no flag was given.
    pub fn scope_or(&self, default: BranchScope) -> BranchScope {
        if self.all {
            BranchScope::All
        } else if self.local {
            BranchScope::Local
        } else if self.remote {
            BranchScope::Remote
        } else {
            default
        }
    }
}

/// Namespace filter for `list`; both namespaces when no flag is given.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct ListFilter {
    /// Only remote branches
    #[arg(short, long)]
    pub remote: bool,

    /// Only local branches
    #[arg(short, long)]
    pub local: bool,
}

impl ListFilter {
    pub fn scope(&self) -> BranchScope {
        if self.local {
            BranchScope::Local
        } else if self.remote {
            BranchScope::Remote
        } else {
            BranchScope::All
        }
    }
}
