//! Scoped temporary files for audio artifacts.
//!
//! Every artifact a pipeline creates is claimed as a [`ScratchFile`] before
//! anything is written to it. The guard deletes the file when released, or
//! on drop if the owner bailed out early, so no artifact outlives the
//! invocation that created it.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory that holds in-flight audio artifacts. Created on demand.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Path for `<key>.<extension>` inside the directory.
    ///
    /// The key comes from the chat platform, so anything outside
    /// `[A-Za-z0-9_-]` is replaced to keep the path inside the root.
    pub fn path_for(&self, key: &str, extension: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.{}", safe, extension))
    }

    /// Claims the artifact path for `key`; the file itself is written by the caller.
    pub fn claim(&self, key: &str, extension: &str) -> ScratchFile {
        ScratchFile::new(self.path_for(key, extension))
    }
}

/// Owning guard for one temporary file.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    released: bool,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Deletes the file. Calling it again, or on a file that was never
    /// written, is a no-op.
    pub async fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        remove_if_exists(&self.path).await?;
        self.released = true;
        debug!(path = %self.path.display(), "scratch file released");
        Ok(())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "scratch file removed on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove scratch file"),
        }
    }
}

/// Removes `path`, treating an already-missing file as success.
pub async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
