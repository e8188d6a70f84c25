//! Session controller orchestrating the bridge lifecycle against the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use qiita_bridge_client::RemoteSessionClient;
use qiita_bridge_core::{InitializeReport, PublishReport, StatusLabel, StatusReport};

use crate::host::EditorHost;

/// Configuration for the session controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Start monitoring automatically after activation
    pub auto_start: bool,

    /// Delay before the automatic start, leaving the server time to come up
    pub auto_start_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            auto_start_delay: Duration::from_millis(2000),
        }
    }
}

/// Sequences the lifecycle actions and keeps the status label consistent
/// with the last known outcome.
///
/// One controller is constructed at startup and handed to every action entry
/// point by `Arc` handle; there are no process-wide globals. Start/stop are
/// serialized through a single-slot guard so overlapping invocations cannot
/// race on the client's monitoring flag - a second lifecycle request while
/// one is in flight is rejected with a warning.
pub struct SessionController {
    client: Arc<RemoteSessionClient>,
    host: Arc<dyn EditorHost>,
    config: ControllerConfig,
    lifecycle_slot: AtomicBool,
}

impl SessionController {
    /// Create a controller over the given client and host.
    pub fn new(
        client: Arc<RemoteSessionClient>,
        host: Arc<dyn EditorHost>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            client,
            host,
            config,
            lifecycle_slot: AtomicBool::new(false),
        }
    }

    /// Run the activation sequence: health probe, workspace resolution,
    /// session initialization, optional deferred auto-start.
    ///
    /// A failed health probe short-circuits the whole sequence; a missing
    /// workspace stops before any session call is made. Takes the `Arc`
    /// handle so the deferred auto-start task can outlive the caller.
    pub async fn activate(self: Arc<Self>) {
        self.host.set_status(StatusLabel::Disconnected);

        if !self.client.check_health().await {
            self.host.show_warning(
                "The Qiita bridge server is not responding. Please start the server.",
            );
            self.host.set_status(StatusLabel::ServerOffline);
            return;
        }

        let Some(workspace) = self.host.workspace_root() else {
            self.host
                .show_error("No workspace folder found. Please open a workspace.");
            return;
        };

        let envelope = self.client.initialize(&workspace).await;
        if let Some(error) = &envelope.error {
            self.host.show_error(&format!("Failed to initialize: {error}"));
            self.host.set_status(StatusLabel::Error);
        } else {
            match envelope.decode_result::<InitializeReport>() {
                Ok(report) => {
                    debug!(capabilities = ?report.capabilities, "Session initialized")
                }
                Err(error) => debug!("Initialize result undecodable: {error}"),
            }
            self.host.set_status(StatusLabel::Ready);
            info!("Qiita bridge initialized for {}", workspace.display());
        }

        if self.config.auto_start {
            // One-shot deferred task; the server may still be starting up
            // when activation runs. There is no cancellation path - if the
            // controller goes away first, the task dies with the process.
            let controller = Arc::clone(&self);
            let delay = self.config.auto_start_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                controller.start_monitoring().await;
            });
        }
    }

    /// Start server-side monitoring.
    pub async fn start_monitoring(&self) {
        if !self.try_acquire_lifecycle_slot() {
            self.host
                .show_warning("Another monitoring request is still in flight");
            return;
        }

        self.host.set_status(StatusLabel::Starting);
        let envelope = self.client.start_monitoring().await;
        match &envelope.error {
            Some(error) => {
                self.host
                    .show_error(&format!("Failed to start monitoring: {error}"));
                self.host.set_status(StatusLabel::Error);
            }
            None => {
                self.host.set_status(StatusLabel::Monitoring);
                self.host.show_info("Qiita monitoring started");
            }
        }

        self.release_lifecycle_slot();
    }

    /// Stop server-side monitoring.
    ///
    /// A failed stop moves the label to `Error`, symmetrically with start.
    pub async fn stop_monitoring(&self) {
        if !self.try_acquire_lifecycle_slot() {
            self.host
                .show_warning("Another monitoring request is still in flight");
            return;
        }

        self.host.set_status(StatusLabel::Stopping);
        let envelope = self.client.stop_monitoring().await;
        match &envelope.error {
            Some(error) => {
                self.host
                    .show_error(&format!("Failed to stop monitoring: {error}"));
                self.host.set_status(StatusLabel::Error);
            }
            None => {
                self.host.set_status(StatusLabel::Ready);
                self.host.show_info("Qiita monitoring stopped");
            }
        }

        self.release_lifecycle_slot();
    }

    /// Publish the active document to Qiita.
    ///
    /// Aborts without touching the network when no document is active. The
    /// document is flushed to disk first so the server reads current content.
    pub async fn publish_active_document(&self) {
        let Some(document) = self.host.active_document() else {
            self.host.show_warning("No active file to publish");
            return;
        };

        if let Err(error) = self.host.flush_active_document().await {
            self.host
                .show_error(&format!("Failed to save the active file: {error}"));
            return;
        }

        self.host.show_info("Saving to Qiita...");
        let envelope = self.client.publish_file(&document).await;
        if let Some(error) = &envelope.error {
            self.host.show_error(&format!("Failed to save to Qiita: {error}"));
            return;
        }

        let report = match envelope.decode_result::<PublishReport>() {
            Ok(report) => report,
            Err(error) => {
                self.host
                    .show_error(&format!("Failed to decode publish response: {error}"));
                return;
            }
        };

        if report.blocked {
            let message = report
                .message
                .as_deref()
                .unwrap_or("Upload was blocked by the server");
            self.host.show_warning(message);
            return;
        }

        let title = report.title.as_deref().unwrap_or("Unknown");
        let message = format!("Saved \"{title}\" to Qiita");
        match report.url {
            Some(url) => {
                if self
                    .host
                    .show_info_with_action(&message, "Open in Browser")
                    .await
                {
                    self.host.open_external(&url);
                }
            }
            None => self.host.show_info(&message),
        }
    }

    /// Fetch and display the server's status summary.
    pub async fn show_status(&self) {
        let envelope = self.client.get_status().await;
        if let Some(error) = &envelope.error {
            self.host.show_error(&format!("Failed to get status: {error}"));
            return;
        }

        match envelope.decode_result::<StatusReport>() {
            Ok(report) => self.host.show_info(&status_summary(&report)),
            Err(error) => {
                self.host
                    .show_error(&format!("Failed to decode status response: {error}"));
            }
        }
    }

    /// Best-effort teardown at host shutdown.
    ///
    /// If the client still believes monitoring is active, a stop is fired on
    /// a detached task; the result is discarded and shutdown is never
    /// delayed.
    pub fn shutdown(&self) {
        if self.client.monitoring_status() {
            warn!("Shutting down while monitoring; sending best-effort stop");
            let client = Arc::clone(&self.client);
            tokio::spawn(async move {
                let _ = client.stop_monitoring().await;
            });
        }
    }

    fn try_acquire_lifecycle_slot(&self) -> bool {
        self.lifecycle_slot
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release_lifecycle_slot(&self) {
        self.lifecycle_slot.store(false, Ordering::SeqCst);
    }
}

/// Render the multi-line status summary shown by the show-status action.
fn status_summary(report: &StatusReport) -> String {
    let monitoring = if report.monitoring { "Active" } else { "Inactive" };
    let workspace = report.workspace_path.as_deref().unwrap_or("Unknown");
    let extensions = report
        .watched_extensions
        .as_ref()
        .filter(|extensions| !extensions.is_empty())
        .map(|extensions| extensions.join(", "))
        .unwrap_or_else(|| "Unknown".to_string());

    let mut summary = format!(
        "Qiita Bridge Status:\nMonitoring: {monitoring}\nWorkspace: {workspace}\nWatched Extensions: {extensions}"
    );
    if let Some(connected) = report.qiita_connected {
        summary.push_str(if connected {
            "\nQiita: Connected"
        } else {
            "\nQiita: Not Connected"
        });
    }
    summary
}
