use std::sync::Arc;

use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use tracing::{debug, warn};
use url::Url;

use crate::error::AppError;
use crate::storage::{AssetKind, StoredAsset, sanitize_filename};

/// Remote asset store over any S3-compatible service. References handed out
/// are public URLs; deletion goes through the stored key.
pub struct ObjectAssetStore {
    store: Arc<dyn ObjectStore>,
    public_base: Url,
}

impl ObjectAssetStore {
    /// Parse a store URL and build the backend.
    ///
    /// Supported shapes:
    /// - `s3://bucket?region=eu-west-1`
    /// - `s3://bucket?endpoint=http://minio:9000&region=us-east-1`
    /// - `file:///var/lib/arstage/assets` (self-hosted dev escape hatch)
    pub fn from_url(url: &str, public_base: Url) -> Result<Self, AppError> {
        let store = build_object_store(url)?;
        let public_base = with_trailing_slash(public_base)?;
        Ok(Self {
            store: Arc::from(store),
            public_base,
        })
    }

    pub async fn store(
        &self,
        bytes: &[u8],
        desired_name: &str,
        kind: AssetKind,
    ) -> Result<StoredAsset, AppError> {
        let name = sanitize_filename(desired_name)
            .ok_or_else(|| AppError::Validation("unusable file name".to_string()))?;
        let key = format!("{}/{}", kind.prefix(), name);

        self.store
            .put(&ObjectPath::from(key.clone()), bytes.to_vec().into())
            .await?;
        debug!(key = %key, size = bytes.len(), "asset uploaded to object store");

        let reference = self.public_base.join(&key)?;
        Ok(StoredAsset {
            reference: reference.to_string(),
            external_id: Some(key),
        })
    }

    pub async fn destroy(&self, key: &str) -> Result<(), AppError> {
        match self.store.delete(&ObjectPath::from(key)).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => {
                warn!(key = %key, "remote asset already absent on destroy");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn build_object_store(url: &str) -> Result<Box<dyn ObjectStore>, AppError> {
    if let Some(path) = url.strip_prefix("file://") {
        let store = object_store::local::LocalFileSystem::new_with_prefix(path)?;
        return Ok(Box::new(store));
    }

    if let Some(without_scheme) = url.strip_prefix("s3://") {
        let bucket = without_scheme.split('?').next().unwrap_or(without_scheme);

        let endpoint = parse_query_param(url, "endpoint");
        let region = parse_query_param(url, "region").unwrap_or_else(|| "us-east-1".to_string());

        let mut builder = object_store::aws::AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&region);

        if let Some(ep) = endpoint {
            builder = builder.with_endpoint(&ep).with_allow_http(true);
        }

        // Credentials from env: AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY
        // (or instance metadata / IAM role in production)
        if let Ok(key) = std::env::var("AWS_ACCESS_KEY_ID")
            && let Ok(secret) = std::env::var("AWS_SECRET_ACCESS_KEY")
        {
            builder = builder.with_access_key_id(key).with_secret_access_key(secret);
        }

        let store = builder.build()?;
        return Ok(Box::new(store));
    }

    Err(AppError::Config(format!(
        "unsupported asset store URL scheme: {url}"
    )))
}

fn parse_query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split('?').nth(1)?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// `Url::join` treats a base without a trailing slash as a file, dropping
/// its last segment.
fn with_trailing_slash(base: Url) -> Result<Url, AppError> {
    if base.path().ends_with('/') {
        return Ok(base);
    }
    let joined = format!("{}/", base);
    Ok(Url::parse(&joined)?)
}
