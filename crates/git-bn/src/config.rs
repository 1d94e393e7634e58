//! Configuration management for git-bn.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (GIT_BN_*)
//! 2. Config file (GIT_BN_CONFIG, or the platform config dir)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use git_bn_core::git::{DEFAULT_NOTES_REF, DEFAULT_REMOTE};
use git_bn_core::store::DEFAULT_STORE_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Note store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Git settings
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file name at the repository root
    #[serde(default = "default_store_file")]
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote used for git notes sync
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Notes ref for the git notes mirror (short name or full ref)
    #[serde(default = "default_notes_ref")]
    pub notes_ref: String,

    /// Commit message used by `push`
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

// Default value functions
fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_notes_ref() -> String {
    DEFAULT_NOTES_REF.to_string()
}

fn default_commit_message() -> String {
    "chore: update branch notes".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_name: default_store_file(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            notes_ref: default_notes_ref(),
            commit_message: default_commit_message(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Apply GIT_BN_* overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(file_name) = lookup("GIT_BN_STORE_FILE").filter(|v| !v.is_empty()) {
            self.store.file_name = file_name;
        }
        if let Some(remote) = lookup("GIT_BN_REMOTE").filter(|v| !v.is_empty()) {
            self.git.remote = remote;
        }
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("GIT_BN_CONFIG") {
            PathBuf::from(path)
        } else if let Some(proj_dirs) = ProjectDirs::from("dev", "git-bn", "git-bn") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".git-bn")
                .join("config.toml")
        }
    }
}
