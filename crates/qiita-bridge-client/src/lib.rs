//! # qiita-bridge-client
//!
//! HTTP session client for Qiita Bridge.
//!
//! This crate owns the single point of contact with the control-plane server:
//! the shared `POST /mcp/request` call shape for all lifecycle operations and
//! the boolean-only `GET /health` liveness probe. RPC operations never return
//! `Err` - every transport failure is folded into the same envelope shape as
//! a server-reported error, so callers have one branch to handle.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;

// Re-export commonly used types
pub use client::RemoteSessionClient;
