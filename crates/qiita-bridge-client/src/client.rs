//! Session client for the control-plane RPC endpoint.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use qiita_bridge_core::{Error, Result, RpcEnvelope, RpcRequest};

/// Bound on how long the liveness probe may block.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(5000);

/// Client for one remote monitoring/publishing session.
///
/// Holds the immutable server base address and an advisory cache of the
/// last-known server monitoring state. The cache flips `true` only after a
/// successful `start_monitoring` response and `false` only after a successful
/// `stop_monitoring` response; it never blocks a request from being sent -
/// the server remains the source of truth.
///
/// Every RPC operation performs a single attempt and reports failure as data:
/// a transport error comes back as the same envelope shape as a
/// server-reported error, never as `Err`.
#[derive(Debug)]
pub struct RemoteSessionClient {
    base_url: String,
    http: reqwest::Client,
    monitoring: AtomicBool,
}

impl RemoteSessionClient {
    /// Create a client for the given base address.
    ///
    /// The address must be an absolute http/https URL; a trailing slash is
    /// stripped so endpoint paths can be appended uniformly.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| Error::InvalidServerUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::InvalidServerUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            monitoring: AtomicBool::new(false),
        })
    }

    /// The server base address, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Initialize the remote session for a workspace.
    pub async fn initialize(&self, workspace_path: &Path) -> RpcEnvelope {
        self.call(
            "initialize",
            json!({ "workspace_path": workspace_path.display().to_string() }),
            "Failed to initialize",
        )
        .await
    }

    /// Ask the server to start watching the workspace.
    ///
    /// The local monitoring cache is updated only on a success envelope; a
    /// transport failure leaves it unchanged.
    pub async fn start_monitoring(&self) -> RpcEnvelope {
        let envelope = self
            .call("start_monitoring", json!({}), "Failed to start monitoring")
            .await;
        if !envelope.is_error() {
            self.monitoring.store(true, Ordering::SeqCst);
        }
        envelope
    }

    /// Ask the server to stop watching the workspace.
    pub async fn stop_monitoring(&self) -> RpcEnvelope {
        let envelope = self
            .call("stop_monitoring", json!({}), "Failed to stop monitoring")
            .await;
        if !envelope.is_error() {
            self.monitoring.store(false, Ordering::SeqCst);
        }
        envelope
    }

    /// Publish one file to Qiita through the server.
    pub async fn publish_file(&self, file_path: &Path) -> RpcEnvelope {
        self.call(
            "save_to_qiita",
            json!({ "file_path": file_path.display().to_string() }),
            "Failed to save to Qiita",
        )
        .await
    }

    /// Fetch the server's monitoring status report.
    pub async fn get_status(&self) -> RpcEnvelope {
        self.call("get_status", json!({}), "Failed to get status").await
    }

    /// Probe the server's liveness endpoint.
    ///
    /// Returns `true` only for an HTTP 200 within the fixed timeout; any
    /// other status, a network error or a timeout yields `false`. This is the
    /// one operation with a plain boolean contract instead of an envelope.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .http
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(error) => {
                debug!("Health probe failed: {error}");
                false
            }
        }
    }

    /// Last-known monitoring state. Pure read of the local cache, no I/O.
    pub fn monitoring_status(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    /// Single-attempt RPC round-trip.
    ///
    /// A non-2xx status counts as a transport-kind failure with the status in
    /// the cause string; both that and connection errors come back as an
    /// error envelope prefixed with `failure_context`.
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
        failure_context: &str,
    ) -> RpcEnvelope {
        let request_id = Uuid::new_v4();
        let url = format!("{}/mcp/request", self.base_url);
        let request = RpcRequest::new(method, params);
        debug!(%request_id, method, "Sending RPC request");

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%request_id, method, "RPC transport failure: {error}");
                return RpcEnvelope::from_error(format!("{failure_context}: {error}"));
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(error) => {
                warn!(%request_id, method, "RPC request rejected: {error}");
                return RpcEnvelope::from_error(format!("{failure_context}: {error}"));
            }
        };

        match response.json::<RpcEnvelope>().await {
            Ok(envelope) => {
                if let Some(error) = &envelope.error {
                    debug!(%request_id, method, "Server reported error: {error}");
                }
                envelope
            }
            Err(error) => {
                warn!(%request_id, method, "RPC response unreadable: {error}");
                RpcEnvelope::from_error(format!("{failure_context}: {error}"))
            }
        }
    }
}
