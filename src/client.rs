use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::dispatcher::ContainerAction;
use crate::error::{DashboardError, Result};
use crate::model::{RowId, Snapshot};

/// Wrapper around the inventory service's HTTP API.
#[derive(Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogsResponse {
    #[serde(default)]
    success: bool,
    logs: Option<String>,
    error: Option<String>,
}

impl DashboardClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /data`. Non-2xx statuses map onto the operator message table.
    pub async fn fetch_inventory(&self) -> Result<Snapshot> {
        let url = format!("{}/data", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DashboardError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "inventory fetch rejected");
            return Err(DashboardError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
            ));
        }

        resp.json::<Snapshot>()
            .await
            .map_err(|e| DashboardError::Decode(e.to_string()))
    }

    /// `POST /container/{server}/{name}/{action}`. Returns the service's
    /// success message.
    pub async fn perform_action(&self, id: &RowId, action: ContainerAction) -> Result<String> {
        let url = self.container_url(id, action.as_str());
        debug!(%id, action = action.as_str(), "dispatching container action");

        let transport = |e: reqwest::Error| {
            DashboardError::ActionFailure(format!("Failed to {} container: {}", action.as_str(), e))
        };

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(transport)?;
        let body: ActionResponse = resp.json().await.map_err(transport)?;

        if body.success {
            Ok(body
                .message
                .unwrap_or_else(|| format!("Container {} {}", id.name, action.past_tense())))
        } else {
            Err(DashboardError::ActionFailure(
                body.error.unwrap_or_else(|| format!("Failed to {} container", action.as_str())),
            ))
        }
    }

    /// `GET /container/{server}/{name}/logs?tail={n}`.
    pub async fn fetch_logs(&self, id: &RowId, tail: u32) -> Result<String> {
        let url = format!("{}?tail={}", self.container_url(id, "logs"), tail);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DashboardError::LogFetchFailure(e.to_string()))?;
        let body: LogsResponse = resp
            .json()
            .await
            .map_err(|e| DashboardError::LogFetchFailure(e.to_string()))?;

        if body.success {
            Ok(body.logs.unwrap_or_default())
        } else {
            Err(DashboardError::LogFetchFailure(
                body.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }

    fn container_url(&self, id: &RowId, tail_segment: &str) -> String {
        format!(
            "{}/container/{}/{}/{}",
            self.base_url,
            urlencoding::encode(&id.server),
            urlencoding::encode(&id.name),
            tail_segment
        )
    }
}
