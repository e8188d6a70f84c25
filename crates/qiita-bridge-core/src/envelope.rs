//! Wire types for the control-plane RPC contract.
//!
//! Every POST-based operation shares one request shape and one response
//! wrapper: a method name plus a parameter object going out, and an envelope
//! carrying either a result payload or an error string coming back. The
//! liveness probe is the only operation outside this contract.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Request / envelope
// =============================================================================

/// Body of a `POST /mcp/request` call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RpcRequest {
    /// Remote method name (e.g. "initialize", "start_monitoring")
    pub method: String,

    /// Method parameters; an empty object for parameterless methods
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    /// Build a request for the given method.
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Uniform response wrapper for all POST-based operations.
///
/// Exactly one of `result`/`error` is meaningfully populated. Transport
/// failures are converted into the `error` side by the client, so callers see
/// a single failure shape regardless of cause.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RpcEnvelope {
    /// Opaque result payload; decode with [`RpcEnvelope::decode_result`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Server-reported (or synthesized transport) error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcEnvelope {
    /// Wrap a failure cause in the envelope's error side.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Whether the envelope carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode the result payload into the typed schema for its method.
    ///
    /// A missing `result` decodes as an empty object, so per-field
    /// `#[serde(default)]` attributes decide what absence means. A payload
    /// that does not match the schema is an error - it is never silently
    /// defaulted wholesale.
    pub fn decode_result<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        let value = self
            .result
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        serde_json::from_value(value)
            .map_err(|e| crate::Error::MalformedPayload(e.to_string()))
    }
}

// =============================================================================
// Typed result payloads, one per method
// =============================================================================

/// Result payload of `initialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InitializeReport {
    /// Capability flags advertised by the server
    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,

    /// Workspace path the server settled on
    #[serde(default)]
    pub workspace_path: Option<String>,
}

/// Result payload of `start_monitoring` and `stop_monitoring`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LifecycleAck {
    /// Server-side outcome: "started", "already_running" or "stopped"
    #[serde(default)]
    pub status: Option<String>,
}

/// Result payload of `save_to_qiita`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PublishReport {
    /// Whether the publish went through
    #[serde(default = "default_true")]
    pub success: bool,

    /// File the server processed
    #[serde(default)]
    pub file_path: Option<String>,

    /// Identifier of the Qiita draft
    #[serde(default)]
    pub qiita_id: Option<String>,

    /// Title extracted from the document
    #[serde(default)]
    pub title: Option<String>,

    /// Browser URL of the draft, when available
    #[serde(default)]
    pub url: Option<String>,

    /// Upload was refused by the server's security scan
    #[serde(default)]
    pub blocked: bool,

    /// Human-readable explanation accompanying a blocked upload
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for PublishReport {
    fn default() -> Self {
        Self {
            success: true,
            file_path: None,
            qiita_id: None,
            title: None,
            url: None,
            blocked: false,
            message: None,
        }
    }
}

/// Result payload of `get_status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatusReport {
    /// Whether server-side monitoring is active
    #[serde(default)]
    pub monitoring: bool,

    /// Workspace path the server is watching
    #[serde(default)]
    pub workspace_path: Option<String>,

    /// File extensions the monitor reacts to, in server order
    #[serde(default)]
    pub watched_extensions: Option<Vec<String>>,

    /// Whether the server holds Qiita credentials
    #[serde(default)]
    pub qiita_connected: Option<bool>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = RpcRequest::new("initialize", json!({"workspace_path": "/proj"}));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["method"], "initialize");
        assert_eq!(body["params"]["workspace_path"], "/proj");
    }

    #[test]
    fn test_envelope_from_error() {
        let envelope = RpcEnvelope::from_error("Failed to initialize: connection refused");
        assert!(envelope.is_error());
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_envelope_result_side() {
        let envelope: RpcEnvelope =
            serde_json::from_value(json!({"result": {"status": "started"}})).unwrap();
        assert!(!envelope.is_error());
        let ack: LifecycleAck = envelope.decode_result().unwrap();
        assert_eq!(ack.status.as_deref(), Some("started"));
    }

    #[test]
    fn test_decode_missing_result_uses_field_defaults() {
        let envelope = RpcEnvelope::default();
        let report: StatusReport = envelope.decode_result().unwrap();
        assert!(!report.monitoring);
        assert_eq!(report.workspace_path, None);
        assert_eq!(report.watched_extensions, None);
    }

    #[test]
    fn test_decode_status_report() {
        let envelope: RpcEnvelope = serde_json::from_value(json!({
            "result": {
                "monitoring": true,
                "workspace_path": "/proj",
                "watched_extensions": ["md", "txt"],
                "qiita_connected": true
            }
        }))
        .unwrap();

        let report: StatusReport = envelope.decode_result().unwrap();
        assert!(report.monitoring);
        assert_eq!(report.workspace_path.as_deref(), Some("/proj"));
        assert_eq!(
            report.watched_extensions,
            Some(vec!["md".to_string(), "txt".to_string()])
        );
        assert_eq!(report.qiita_connected, Some(true));
    }

    #[test]
    fn test_decode_rejects_mismatched_schema() {
        let envelope: RpcEnvelope =
            serde_json::from_value(json!({"result": {"monitoring": "yes"}})).unwrap();
        let decoded = envelope.decode_result::<StatusReport>();
        assert!(decoded.is_err());
        assert!(matches!(
            decoded.unwrap_err(),
            crate::Error::MalformedPayload(_)
        ));
    }

    #[test]
    fn test_decode_publish_report_defaults() {
        let envelope: RpcEnvelope =
            serde_json::from_value(json!({"result": {"title": "My Post"}})).unwrap();
        let report: PublishReport = envelope.decode_result().unwrap();
        assert!(report.success);
        assert!(!report.blocked);
        assert_eq!(report.title.as_deref(), Some("My Post"));
        assert_eq!(report.url, None);
    }

    #[test]
    fn test_decode_blocked_publish_report() {
        let envelope: RpcEnvelope = serde_json::from_value(json!({
            "result": {
                "success": false,
                "blocked": true,
                "title": "My Post",
                "message": "Upload blocked by security scan"
            }
        }))
        .unwrap();

        let report: PublishReport = envelope.decode_result().unwrap();
        assert!(!report.success);
        assert!(report.blocked);
        assert_eq!(
            report.message.as_deref(),
            Some("Upload blocked by security scan")
        );
    }

    #[test]
    fn test_decode_initialize_report() {
        let envelope: RpcEnvelope = serde_json::from_value(json!({
            "result": {
                "capabilities": {
                    "file_monitoring": true,
                    "qiita_integration": true
                },
                "workspace_path": "/proj"
            }
        }))
        .unwrap();

        let report: InitializeReport = envelope.decode_result().unwrap();
        assert_eq!(report.capabilities.get("file_monitoring"), Some(&true));
        assert_eq!(report.workspace_path.as_deref(), Some("/proj"));
    }
}
