use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AppError;
use crate::storage::sanitize_filename;

/// Local-disk asset store: one flat directory of uploaded files.
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write bytes under a sanitized version of `desired_name` and return the
    /// filename actually used. Existing files are never overwritten; a
    /// numeric suffix resolves collisions.
    pub async fn store(&self, bytes: &[u8], desired_name: &str) -> Result<String, AppError> {
        let name = sanitize_filename(desired_name)
            .ok_or_else(|| AppError::Validation("unusable file name".to_string()))?;
        let name = self.unique_name(name).await?;
        let path = self.resolve(&name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(file = %name, size = bytes.len(), "asset stored");
        Ok(name)
    }

    pub async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, AppError> {
        let name = sanitize_filename(reference).ok_or(AppError::NotFound)?;
        let path = self.resolve(&name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the file. An already-missing file counts as done, which keeps
    /// repeated deletes of the same project idempotent.
    pub async fn destroy(&self, reference: &str) -> Result<(), AppError> {
        let name = sanitize_filename(reference).ok_or(AppError::NotFound)?;
        let path = self.resolve(&name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file = %name, "asset already absent on destroy");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Join a sanitized name to the root, refusing anything that would land
    /// outside it.
    fn resolve(&self, name: &str) -> Result<PathBuf, AppError> {
        let path = self.root.join(name);
        if path.parent() != Some(self.root.as_path()) {
            return Err(AppError::Validation("file name escapes the upload root".to_string()));
        }
        Ok(path)
    }

    async fn unique_name(&self, name: String) -> Result<String, AppError> {
        if !tokio::fs::try_exists(self.root.join(&name)).await? {
            return Ok(name);
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{ext}")),
            _ => (name.clone(), String::new()),
        };
        let mut n = 1u32;
        loop {
            let candidate = format!("{stem}-{n}{ext}");
            if !tokio::fs::try_exists(self.root.join(&candidate)).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
