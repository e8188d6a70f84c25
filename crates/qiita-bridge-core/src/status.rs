//! Status labels shown by the editor host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Connection/monitoring status as rendered in the host's status indicator.
///
/// Set to [`StatusLabel::Disconnected`] once at activation; every later
/// transition is driven by the outcome of a lifecycle operation or the
/// initial health/workspace checks. Nothing persists across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum StatusLabel {
    /// No contact with the server yet
    Disconnected,
    /// Health probe failed at activation
    ServerOffline,
    /// Initialized, monitoring not active
    Ready,
    /// Start request in flight
    Starting,
    /// Server-side monitoring is active
    Monitoring,
    /// Stop request in flight
    Stopping,
    /// Last operation failed
    Error,
}

impl StatusLabel {
    /// The display string rendered next to the status indicator.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Disconnected => "Disconnected",
            StatusLabel::ServerOffline => "Server Offline",
            StatusLabel::Ready => "Ready",
            StatusLabel::Starting => "Starting...",
            StatusLabel::Monitoring => "Monitoring",
            StatusLabel::Stopping => "Stopping...",
            StatusLabel::Error => "Error",
        }
    }

    /// Whether the label should be rendered with error emphasis.
    pub fn is_error(&self) -> bool {
        matches!(self, StatusLabel::Error | StatusLabel::ServerOffline)
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
