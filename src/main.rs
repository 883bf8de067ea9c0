use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arstage::db::{CredentialStore, ProjectStore};
use arstage::router::AppState;
use arstage::service::mailer::MailRelay;
use arstage::service::pin;
use arstage::storage::AssetStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &arstage::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        upload_dir = %cfg.upload_dir.display(),
        asset_store = %cfg.asset_store_url.as_deref().unwrap_or("<local disk>"),
        loglevel = %cfg.loglevel,
    );

    let db = ProjectStore::connect(&cfg.database_url).await?;
    db.init_schema().await?;

    let creds = CredentialStore::new(db.pool().clone());
    creds
        .seed(&pin::hash_pin(&cfg.admin_pin), Some(&cfg.admin_email))
        .await?;

    let assets = AssetStore::from_settings(
        cfg.asset_store_url.as_deref(),
        cfg.asset_public_base.as_ref(),
        &cfg.upload_dir,
    )?;
    let mailer = MailRelay::new(
        cfg.mail_relay_url.clone(),
        cfg.mail_relay_token.clone(),
        cfg.mail_from.clone(),
    )?;

    let state = AppState::new(
        db,
        creds,
        Arc::new(assets),
        Arc::new(mailer),
        pin::cookie_key(&cfg.secret_key),
        cfg.otp_ttl_secs,
    );
    let app = arstage::app_router(state);

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
