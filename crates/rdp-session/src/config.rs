//! `BridgeConfig` (spec §6, expanded): process-level configuration
//! assembled from the `MyrtilleSessionId`/`MyrtilleDebugLog` environment
//! knobs, then overridden by CLI flags. There is no persisted TOML file
//! of its own (spec §6 names only environment knobs), so the layering
//! stops at env-then-CLI.

use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Non-zero enables the subsystem; zero disables it entirely (every
    /// entry point short-circuits, spec §6).
    pub session_id: u32,
    pub debug_log: bool,
    pub log_dir: PathBuf,
    pub save_frames: bool,
    pub frame_dir: Option<PathBuf>,
}

impl BridgeConfig {
    /// Resolve from environment, then apply CLI overrides (spec §6/§11).
    #[must_use]
    pub fn resolve(cli: &Cli) -> Self {
        let env_session_id = std::env::var("MyrtilleSessionId")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let session_id = cli.session_id.unwrap_or(env_session_id);

        let env_debug_log = std::env::var("MyrtilleDebugLog").is_ok();
        let debug_log = cli.debug_log || env_debug_log;

        let log_dir = cli
            .log_dir
            .clone()
            .unwrap_or_else(|| default_log_dir(session_id));

        let frame_dir = cli.frame_dir.clone().or_else(|| {
            cli.save_frames.then(|| {
                dirs::cache_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("rdp-session-bridge")
                    .join(format!("remotesession_{session_id}"))
            })
        });

        Self {
            session_id,
            debug_log,
            log_dir,
            save_frames: cli.save_frames,
            frame_dir,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.session_id != 0
    }
}

/// `<module-parent>/log/remotesession_<session_id>.<pid>/` (spec §6).
fn default_log_dir(session_id: u32) -> PathBuf {
    let parent = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    parent
        .join("log")
        .join(format!("remotesession_{session_id}.{}", std::process::id()))
}
