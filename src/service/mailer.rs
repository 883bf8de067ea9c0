use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::error::AppError;

/// Client for the external mail relay: a JSON POST per message, bearer
/// token auth, bounded timeout, a single attempt. Delivery failures surface
/// to the caller; nothing is retried.
pub struct MailRelay {
    client: reqwest::Client,
    endpoint: Option<Url>,
    token: Option<String>,
    from: String,
}

impl MailRelay {
    pub fn new(
        endpoint: Option<Url>,
        token: Option<String>,
        from: String,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            token,
            from,
        })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(AppError::Upstream("mail relay is not configured".to_string()));
        };

        let mut req = self.client.post(endpoint.clone()).json(&json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "body": body,
        }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("mail relay request failed: {e}")))?;

        if !resp.status().is_success() {
            warn!(to, status = %resp.status(), "mail relay rejected the message");
            return Err(AppError::Upstream(format!(
                "mail relay returned {}",
                resp.status()
            )));
        }

        info!(to, "mail dispatched");
        Ok(())
    }
}
