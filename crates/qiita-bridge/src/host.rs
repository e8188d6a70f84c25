//! The seam between the session controller and the editor's UI surface.

use std::path::PathBuf;

use async_trait::async_trait;

use qiita_bridge_core::{Result, StatusLabel};

/// Everything the controller needs from the hosting editor.
///
/// The host owns the status indicator, notifications, workspace resolution
/// and document access; the controller only ever talks to this trait. The
/// binary ships a CLI host, tests ship a recording mock, and an editor
/// integration supplies its own implementation.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Root path of the active workspace, if one is open.
    fn workspace_root(&self) -> Option<PathBuf>;

    /// Path of the currently focused document, if any.
    fn active_document(&self) -> Option<PathBuf>;

    /// Persist any unsaved edits of the active document to disk.
    async fn flush_active_document(&self) -> Result<()>;

    /// Update the status indicator.
    fn set_status(&self, label: StatusLabel);

    /// Show an informational notification.
    fn show_info(&self, message: &str);

    /// Show a warning notification.
    fn show_warning(&self, message: &str);

    /// Show an error notification.
    fn show_error(&self, message: &str);

    /// Show an informational notification with one action button.
    ///
    /// Returns `true` if the user chose the action.
    async fn show_info_with_action(&self, message: &str, action: &str) -> bool;

    /// Open a URL in the host's external browser.
    fn open_external(&self, url: &str);
}
