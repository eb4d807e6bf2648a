//! Bootstrap for the session bridge binary (spec §11, ambient/expanded).
//!
//! Parses CLI flags, resolves [`BridgeConfig`] from environment + CLI,
//! initializes `tracing`, short-circuits when the subsystem is disabled
//! (`session_id == 0`), then builds and runs the [`SessionBridge`] to
//! completion — an init-then-run bootstrap shape for a single-session
//! process rather than a multi-user listener.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rdp_capture::StaticScreenSource;

use rdp_session::bridge::SessionBridge;
use rdp_session::cli::Cli;
use rdp_session::config::BridgeConfig;
use rdp_session::facade::{LoggingRdpFacade, LoggingSpoolerFacade};
use rdp_session::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BridgeConfig::resolve(&cli);

    let _log_guard = init_tracing(&config)?;

    if !config.is_enabled() {
        tracing::info!("MyrtilleSessionId is 0, bridge disabled");
        return Ok(());
    }

    tracing::info!(session_id = config.session_id, "starting session bridge");

    let session = Arc::new(Session::new(config.session_id));
    let facade = Arc::new(LoggingRdpFacade);
    // Real screen acquisition is out of scope for this core (spec §1); a
    // solid-color source stands in until one is wired up.
    let screen = Arc::new(StaticScreenSource::new(1920, 1080, [0, 0, 0x80, 0xFF]));

    let spooler = LoggingSpoolerFacade;
    match session.printers.enum_printers(&spooler).await {
        Ok(printers) => tracing::info!(count = printers.len(), "printer registry populated"),
        Err(e) => tracing::warn!(error = %e, "failed to enumerate printers"),
    }

    let bridge = SessionBridge::new(session, facade, screen);
    bridge.run().await.context("session bridge terminated with an error")?;

    Ok(())
}

/// Initialize `tracing`: an `EnvFilter`-driven stderr subscriber, plus a
/// rolling file writer under `config.log_dir` when debug logging is
/// requested (spec §6).
fn init_tracing(config: &BridgeConfig) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if !config.debug_log {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        return Ok(None);
    }

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir: {}", config.log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&config.log_dir, format!("wfreerdp.{}.log", std::process::id()));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(non_blocking)
        .init();

    Ok(Some(guard))
}
