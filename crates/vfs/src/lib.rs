// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mf-vfs`: the confined virtual filesystem (§4.1).
//!
//! Every file operation the driver exposes to content takes a logical path
//! starting with `/`, rooted at a single configured mudlib directory. Paths
//! are normalized lexically (so a not-yet-existing target path can still be
//! checked) and rejected if the result would escape the root, even via a
//! string of `..` segments that lexically cancel back inside — the check
//! runs on the final normalized path, not on each segment.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod error;

pub use error::VfsError;

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

/// Metadata about one virtual-filesystem entry.
#[derive(Debug, Clone)]
pub struct Stat {
    pub is_dir: bool,
    pub is_file: bool,
    pub len: u64,
    pub modified: Option<std::time::SystemTime>,
}

/// One directory entry returned by [`Vfs::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// A filesystem confined to a single root directory (the mudlib root).
#[derive(Debug, Clone)]
pub struct Vfs {
    root: PathBuf,
}

impl Vfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path (e.g. `/areas/forest/wolf.ts`) to a real path
    /// inside the root, rejecting any result that would escape it.
    pub fn resolve(&self, logical: &str) -> Result<PathBuf, VfsError> {
        if !logical.starts_with('/') {
            return Err(VfsError::NotAbsolute(logical.to_string()));
        }
        let mut normalized = PathBuf::new();
        for component in Path::new(logical.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::ParentDir => {
                    if !normalized.pop() {
                        // Already at root and popping further would escape.
                        return Err(VfsError::PathTraversal(logical.to_string()));
                    }
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        let resolved = self.root.join(&normalized);
        if !resolved.starts_with(&self.root) {
            warn!(logical, "rejected path traversal");
            return Err(VfsError::PathTraversal(logical.to_string()));
        }
        Ok(resolved)
    }

    pub async fn read(&self, logical: &str) -> Result<Vec<u8>, VfsError> {
        let path = self.resolve(logical)?;
        fs::read(&path).await.map_err(|e| self.io_err(logical, e))
    }

    pub async fn read_to_string(&self, logical: &str) -> Result<String, VfsError> {
        let path = self.resolve(logical)?;
        fs::read_to_string(&path).await.map_err(|e| self.io_err(logical, e))
    }

    /// Atomic per-file write: write to a sibling temp file, then rename.
    pub async fn write(&self, logical: &str, contents: &[u8]) -> Result<(), VfsError> {
        let path = self.resolve(logical)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(logical, e))?;
        }
        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        let mut tmp = fs::File::create(&tmp_path).await.map_err(|e| self.io_err(logical, e))?;
        tmp.write_all(contents).await.map_err(|e| self.io_err(logical, e))?;
        tmp.flush().await.map_err(|e| self.io_err(logical, e))?;
        drop(tmp);
        fs::rename(&tmp_path, &path).await.map_err(|e| self.io_err(logical, e))?;
        debug!(logical, bytes = contents.len(), "wrote file");
        Ok(())
    }

    pub async fn exists(&self, logical: &str) -> Result<bool, VfsError> {
        let path = self.resolve(logical)?;
        Ok(fs::metadata(&path).await.is_ok())
    }

    pub async fn stat(&self, logical: &str) -> Result<Stat, VfsError> {
        let path = self.resolve(logical)?;
        let meta = fs::metadata(&path).await.map_err(|e| self.io_err(logical, e))?;
        Ok(Stat {
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    pub async fn read_dir(&self, logical: &str) -> Result<Vec<DirEntry>, VfsError> {
        let path = self.resolve(logical)?;
        let mut rd = fs::read_dir(&path).await.map_err(|e| self.io_err(logical, e))?;
        let mut out = Vec::new();
        while let Some(entry) = rd.next_entry().await.map_err(|e| self.io_err(logical, e))? {
            let file_type = entry.file_type().await.map_err(|e| self.io_err(logical, e))?;
            out.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub async fn make_dir(&self, logical: &str, recursive: bool) -> Result<(), VfsError> {
        let path = self.resolve(logical)?;
        let result = if recursive { fs::create_dir_all(&path).await } else { fs::create_dir(&path).await };
        result.map_err(|e| self.io_err(logical, e))
    }

    pub async fn remove_file(&self, logical: &str) -> Result<(), VfsError> {
        let path = self.resolve(logical)?;
        fs::remove_file(&path).await.map_err(|e| self.io_err(logical, e))
    }

    pub async fn remove_dir(&self, logical: &str, recursive: bool) -> Result<(), VfsError> {
        let path = self.resolve(logical)?;
        if recursive {
            fs::remove_dir_all(&path).await.map_err(|e| self.io_err(logical, e))
        } else {
            fs::remove_dir(&path).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::Other | std::io::ErrorKind::DirectoryNotEmpty => {
                    VfsError::DirectoryNotEmpty(logical.to_string())
                }
                _ => self.io_err(logical, e),
            })
        }
    }

    pub async fn move_path(&self, from: &str, to: &str) -> Result<(), VfsError> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(to, e))?;
        }
        fs::rename(&from_path, &to_path).await.map_err(|e| self.io_err(from, e))
    }

    pub async fn copy_path(&self, from: &str, to: &str) -> Result<u64, VfsError> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(to, e))?;
        }
        fs::copy(&from_path, &to_path).await.map_err(|e| self.io_err(from, e))
    }

    fn io_err(&self, logical: &str, source: std::io::Error) -> VfsError {
        if source.kind() == std::io::ErrorKind::NotFound {
            return VfsError::NotFound(logical.to_string());
        }
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            return VfsError::AlreadyExists(logical.to_string());
        }
        error!(logical, error = %source, "vfs io error");
        VfsError::io(logical, source)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "confinement_proptests.rs"]
mod proptests;
