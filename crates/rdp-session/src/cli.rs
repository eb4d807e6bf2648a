//! Command-line flags, layered over the `MyrtilleSessionId`/
//! `MyrtilleDebugLog` environment knobs by [`crate::config::BridgeConfig`]
//! (spec §6/§11).

use std::path::PathBuf;

use clap::Parser;

/// Headless RDP-to-browser bridge session process.
///
/// One instance per RDP session: couples a native RDP client instance to
/// a web-facing gateway over a pair of named local IPC channels.
#[derive(Parser, Debug)]
#[command(name = "rdp-session", version, about)]
pub struct Cli {
    /// Session id; overrides `MyrtilleSessionId`. Zero disables the
    /// bridge entirely.
    #[arg(long)]
    pub session_id: Option<u32>,

    /// Redirect stdout/stderr to a per-process debug log file; overrides
    /// `MyrtilleDebugLog`.
    #[arg(long)]
    pub debug_log: bool,

    /// Directory for the debug log file. Defaults to
    /// `<exe-parent>/log/remotesession_<id>.<pid>/`.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Save every captured frame to disk (debug aid, disabled by default
    /// per spec §6 "Persisted state").
    #[arg(long)]
    pub save_frames: bool,

    /// Directory for saved frames, required if `--save-frames` is set.
    #[arg(long)]
    pub frame_dir: Option<PathBuf>,
}
