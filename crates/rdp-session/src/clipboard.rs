//! `ClipboardState` (spec §3): last known remote clipboard text.
//!
//! Ordering between an echoed clipboard update and a pending `CLP` request
//! is explicitly unspecified (spec §9 open question — "last writer wins,
//! undefined relative order", resolved and recorded in DESIGN.md rather
//! than left ambiguous in code).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Wire prefix every clipboard text message carries (spec §3).
pub const CLIPBOARD_PREFIX: &str = "clipboard|";

#[derive(Default)]
pub struct ClipboardState {
    text: Mutex<String>,
    updated: AtomicBool,
}

impl ClipboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote clipboard content changed (e.g. an RDP-facade clipboard
    /// callback fired). Overwrites whatever was there, last writer wins.
    pub fn set(&self, text: String) {
        *self.text.lock().unwrap() = text;
        self.updated.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_updated(&self) -> bool {
        self.updated.load(Ordering::Relaxed)
    }

    /// `CLP` (spec §4.6): format the cached text as a wire message and
    /// clear the `updated` flag.
    #[must_use]
    pub fn take_wire_text(&self) -> String {
        self.updated.store(false, Ordering::Relaxed);
        format!("{CLIPBOARD_PREFIX}{}", self.text.lock().unwrap())
    }
}
