//! Qiita Bridge Library
//!
//! This library contains the session controller and the editor-host seam.
//! The actual CLI binary is in main.rs.

pub mod controller;
pub mod host;

// Re-export commonly used types
pub use controller::{ControllerConfig, SessionController};
pub use host::EditorHost;
