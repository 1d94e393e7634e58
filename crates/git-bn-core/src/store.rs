//! File-backed note store.
//!
//! The store is a single pretty-printed JSON document at the repository root,
//! committed alongside the code so collaborators share it through git.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::NoteStore;

/// Default store file name at the repository root.
pub const DEFAULT_STORE_FILE: &str = ".branch-notes.json";

/// Mode of a freshly created store file.
#[cfg(unix)]
const NEW_STORE_MODE: u32 = 0o644;

/// Location of the persisted note store.
#[derive(Debug, Clone)]
pub struct NoteFile {
    path: PathBuf,
}

impl NoteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside a repository root.
    pub fn in_repo(repo_root: &Path, file_name: &str) -> Self {
        Self::new(repo_root.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the store, reporting a corrupt file as an error.
    pub fn try_load(&self) -> Result<Option<NoteStore>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut store: NoteStore =
            serde_json::from_str(&content).map_err(|e| Error::StorageCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let dropped = store.dedup();
        if dropped > 0 {
            warn!(
                "Dropped {} duplicate note entries while loading {:?}",
                dropped, self.path
            );
        }

        Ok(Some(store))
    }

    /// Read the store; a missing or unparseable file is treated as absent.
    pub fn load(&self) -> Result<Option<NoteStore>> {
        match self.try_load() {
            Err(e @ Error::StorageCorrupt { .. }) => {
                warn!("{}; treating the store as uninitialized", e);
                Ok(None)
            }
            other => other,
        }
    }

    /// Write the store atomically: a temp file in the same directory is
    /// renamed over the target.
    pub fn save(&self, store: &NoteStore) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(Error::StorageUnavailable(dir.to_path_buf()));
        }

        let mut content = serde_json::to_string_pretty(store)?;
        content.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().set_permissions(self.target_permissions(tmp.as_file())?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Wrote {} note entries to {:?}", store.notes.len(), self.path);
        info!("Note store saved");
        Ok(())
    }

    /// Permissions the saved file should carry: those of the file being
    /// replaced, or world-readable for a new store (temp files are 0600).
    fn target_permissions(&self, tmp: &fs::File) -> Result<fs::Permissions> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.permissions()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                #[allow(unused_mut)]
                let mut perms = tmp.metadata()?.permissions();
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    perms.set_mode(NEW_STORE_MODE);
                }
                Ok(perms)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}
