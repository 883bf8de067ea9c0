//! Asset storage: where uploaded bytes live.
//!
//! Two backends behind one dispatch type, selected by configuration:
//! - `local`: files under a single upload directory, served by this process
//! - `object`: an S3-compatible object store, served via a public base URL

pub mod local;
pub mod object;

use std::path::Path;

use url::Url;

use crate::db::ProjectKind;
use crate::error::AppError;
pub use local::LocalAssetStore;
pub use object::ObjectAssetStore;

/// Classification the backend uses to pick an upload pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Raw,
}

impl AssetKind {
    /// Key prefix in the object store.
    pub fn prefix(self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::Raw => "raw",
        }
    }
}

impl From<ProjectKind> for AssetKind {
    fn from(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Image => AssetKind::Image,
            ProjectKind::Model => AssetKind::Raw,
        }
    }
}

/// Result of a successful store: the reference recorded on the project row
/// and, for remote backends, the key needed to destroy the asset later.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub reference: String,
    pub external_id: Option<String>,
}

pub enum AssetStore {
    Local(LocalAssetStore),
    Object(ObjectAssetStore),
}

impl AssetStore {
    /// Build the backend selected by configuration: an object-store URL when
    /// one is set, the local upload directory otherwise.
    pub fn from_settings(
        store_url: Option<&str>,
        public_base: Option<&Url>,
        upload_dir: &Path,
    ) -> Result<Self, AppError> {
        match store_url {
            Some(url) if !url.is_empty() => {
                let base = public_base.ok_or_else(|| {
                    AppError::Config(
                        "asset_public_base is required with an object store backend".to_string(),
                    )
                })?;
                Ok(AssetStore::Object(ObjectAssetStore::from_url(url, base.clone())?))
            }
            _ => Ok(AssetStore::Local(LocalAssetStore::new(upload_dir)?)),
        }
    }

    pub async fn store(
        &self,
        bytes: &[u8],
        desired_name: &str,
        kind: AssetKind,
    ) -> Result<StoredAsset, AppError> {
        match self {
            AssetStore::Local(store) => {
                let name = store.store(bytes, desired_name).await?;
                Ok(StoredAsset {
                    reference: name,
                    external_id: None,
                })
            }
            AssetStore::Object(store) => store.store(bytes, desired_name, kind).await,
        }
    }

    /// Fetch stored bytes. Only the local backend serves bytes itself; the
    /// object backend hands out public URLs, so lookups here are NotFound.
    pub async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, AppError> {
        match self {
            AssetStore::Local(store) => store.retrieve(reference).await,
            AssetStore::Object(_) => Err(AppError::NotFound),
        }
    }

    pub async fn destroy(
        &self,
        reference: &str,
        external_id: Option<&str>,
    ) -> Result<(), AppError> {
        match self {
            AssetStore::Local(store) => store.destroy(reference).await,
            AssetStore::Object(store) => {
                let key = external_id.unwrap_or(reference);
                store.destroy(key).await
            }
        }
    }

    /// URL the asset is reachable at from a browser.
    pub fn public_url(&self, reference: &str) -> String {
        match self {
            AssetStore::Local(_) => format!("/uploads/{reference}"),
            AssetStore::Object(_) => reference.to_string(),
        }
    }
}

/// Reduce a client-supplied filename to a single safe path component:
/// drop any directory part, map whitespace to `_`, keep only
/// `[A-Za-z0-9._-]`, and strip leading dots. `None` when nothing usable
/// remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}
