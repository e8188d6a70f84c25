//! # Qiita Bridge
//!
//! Editor-side bridge client for the AutoQiita MCP control plane: start and
//! stop the server's file-monitoring session and publish documents to Qiita
//! from a host environment.
//!
//! ## Overview
//!
//! The binary is a CLI host for the session controller. Commands:
//! - `start` / `stop` - toggle server-side monitoring
//! - `publish <file>` - publish one document to Qiita
//! - `status` - show the server's status summary
//! - `run` - stay attached like an editor session until Ctrl-C
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary ties together:
//! - qiita-bridge-core: Wire, status and config types
//! - qiita-bridge-client: HTTP session client
//! - the controller and host seam from this crate's library

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use qiita_bridge::controller::{ControllerConfig, SessionController};
use qiita_bridge::host::EditorHost;
use qiita_bridge_client::RemoteSessionClient;
use qiita_bridge_core::{BridgeConfig, Result, StatusLabel};

/// Host implementation for terminal use.
///
/// The workspace is the current directory, the "active document" is the file
/// named on the command line, and notifications go to stdout/stderr. There
/// are no notification buttons in a terminal, so an offered action is taken
/// directly.
struct CliHost {
    document: Option<PathBuf>,
}

impl CliHost {
    fn new(document: Option<PathBuf>) -> Self {
        Self { document }
    }
}

#[async_trait]
impl EditorHost for CliHost {
    fn workspace_root(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn active_document(&self) -> Option<PathBuf> {
        self.document.clone()
    }

    async fn flush_active_document(&self) -> Result<()> {
        // CLI documents are already on disk.
        Ok(())
    }

    fn set_status(&self, label: StatusLabel) {
        tracing::info!("Status: {label}");
    }

    fn show_info(&self, message: &str) {
        println!("{message}");
    }

    fn show_warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    async fn show_info_with_action(&self, message: &str, action: &str) -> bool {
        println!("{message}");
        debug!("Taking offered action directly: {action}");
        true
    }

    fn open_external(&self, url: &str) {
        if let Err(error) = open::that(url) {
            eprintln!("error: Failed to open {url}: {error}");
        }
    }
}

const DEFAULT_CONFIG_FILE: &str = "qiita-bridge.yaml";

fn print_usage() {
    eprintln!("Usage: qiita-bridge [--config <path>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  start            Start server-side monitoring");
    eprintln!("  stop             Stop server-side monitoring");
    eprintln!("  publish <file>   Publish one document to Qiita");
    eprintln!("  status           Show the server's status summary");
    eprintln!("  run              Stay attached until Ctrl-C (default)");
}

fn load_config(explicit_path: Option<&PathBuf>) -> Result<BridgeConfig> {
    match explicit_path {
        Some(path) => BridgeConfig::from_file(path),
        None if std::path::Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            BridgeConfig::from_file(DEFAULT_CONFIG_FILE)
        }
        None => Ok(BridgeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let config = load_config(config_path.as_ref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let command = positional.first().map(String::as_str).unwrap_or("run");
    let document = match command {
        "publish" => Some(PathBuf::from(positional.get(1).ok_or_else(|| {
            anyhow::anyhow!("publish requires a file argument")
        })?)),
        _ => None,
    };

    tracing::info!(
        "Qiita Bridge v0.1.0 connecting to {}...",
        config.server.url
    );

    let client = Arc::new(RemoteSessionClient::new(&config.server.url)?);
    let host: Arc<dyn EditorHost> = Arc::new(CliHost::new(document));
    let controller = Arc::new(SessionController::new(
        client,
        host,
        ControllerConfig {
            auto_start: config.monitoring.auto_start,
            ..Default::default()
        },
    ));

    Arc::clone(&controller).activate().await;

    match command {
        "start" => controller.start_monitoring().await,
        "stop" => controller.stop_monitoring().await,
        "publish" => controller.publish_active_document().await,
        "status" => controller.show_status().await,
        "run" => {
            tracing::info!("Qiita Bridge attached; press Ctrl-C to exit");
            tokio::signal::ctrl_c().await?;
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(2);
        }
    }

    // Best-effort teardown; never waits for the stop to complete.
    controller.shutdown();

    tracing::info!("Qiita Bridge shutting down");

    Ok(())
}
