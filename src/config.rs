//! Process configuration, merged from environment variables over built-in
//! defaults. All variables use the `ARSTAGE_` prefix, e.g. `ARSTAGE_PORT`.

use std::path::PathBuf;
use std::sync::LazyLock;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub loglevel: String,
    pub port: u16,
    pub database_url: String,
    /// Secret the session cookie key is derived from.
    pub secret_key: String,
    /// PIN seeded into the credential row on first start.
    pub admin_pin: String,
    pub admin_email: String,
    /// Root directory of the local asset store.
    pub upload_dir: PathBuf,
    /// When set (`s3://bucket?endpoint=...&region=...`), assets go to an
    /// S3-compatible object store instead of the local disk.
    pub asset_store_url: Option<String>,
    /// Public base URL assets are served from (object store backend only).
    pub asset_public_base: Option<Url>,
    pub mail_relay_url: Option<Url>,
    pub mail_relay_token: Option<String>,
    pub mail_from: String,
    /// Lifetime of a PIN-reset code, in seconds.
    pub otp_ttl_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            port: 10000,
            database_url: "sqlite:projects.db?mode=rwc".to_string(),
            secret_key: "secret123".to_string(),
            admin_pin: "1234".to_string(),
            admin_email: "admin@email.com".to_string(),
            upload_dir: PathBuf::from("uploads"),
            asset_store_url: None,
            asset_public_base: None,
            mail_relay_url: None,
            mail_relay_token: None,
            mail_from: "no-reply@arstage.local".to_string(),
            otp_ttl_secs: 600,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("ARSTAGE_"))
        .extract()
        .expect("invalid ARSTAGE_* configuration")
});
