use async_trait::async_trait;
use gloo::net::http::Request;
use serde_json::Value;
use shared::{SyncClient, SyncError, SyncTransport, TrackerConfig};

/// Sync client used by the tracker element
pub type TrackerClient = SyncClient<ApiClient>;

/// API client for communicating with the maintenance server
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    config: TrackerConfig,
}

impl ApiClient {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Wrap in the sync client that applies the "OK" response contract
    pub fn into_sync_client(self) -> TrackerClient {
        SyncClient::new(self)
    }
}

#[async_trait(?Send)]
impl SyncTransport for ApiClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, SyncError> {
        let url = self.config.endpoint_url(path);

        let response = Request::post(&url)
            .json(body)
            .map_err(|e| SyncError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SyncError::Rejected(format!("Server error {}: {}", status, error_text)));
        }

        response
            .text()
            .await
            .map_err(|e| SyncError::Transport(format!("Failed to read response: {}", e)))
    }
}
