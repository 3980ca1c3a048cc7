use tracing::{debug, warn};

use super::WorkflowEvent;
use crate::config::PushConfig;

/// Best-effort push-notification sender. Constructed only when both
/// provider keys are configured; otherwise push delivery is skipped
/// entirely.
#[derive(Clone)]
pub struct PushSender {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PushSender {
    pub fn from_config(config: &PushConfig) -> Option<Self> {
        match (&config.endpoint, &config.api_key) {
            (Some(endpoint), Some(api_key)) => Some(Self {
                client: reqwest::Client::new(),
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
            }),
            _ => {
                debug!("Push provider keys unset; push notifications disabled");
                None
            }
        }
    }

    /// Fires one push request. Failures are logged and swallowed.
    pub async fn send(&self, event: &WorkflowEvent) {
        let result = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(event)
            .send()
            .await;

        match result {
            Ok(resp) if !resp.status().is_success() => {
                warn!(
                    status = %resp.status(),
                    kind = event.kind.as_str(),
                    "Push provider rejected notification"
                );
            }
            Err(e) => {
                warn!(error = %e, kind = event.kind.as_str(), "Push delivery failed");
            }
            Ok(_) => {}
        }
    }
}
