//! `Session` (spec §3): the per-process singleton bundling policy state,
//! connection parameters, the clipboard, the printer registry, and the
//! rate controller.
//!
//! Created once at bridge start; torn down on `CLO`, on IPC failure, or
//! when the RDP facade signals disconnect (spec §3, §4.7).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rdp_printer::PrinterRegistry;

use crate::clipboard::ClipboardState;
use crate::policy::ImagePolicy;
use crate::rate::RateController;

/// Connection parameters accumulated from `SRV`/`VMG`/`DOM`/`USR`/`PWD`/
/// `PRG` before `CON` is received (spec §4.6).
#[derive(Debug, Default, Clone)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub vm_guid: Option<String>,
    pub domain: Option<String>,
    pub username: Option<String>,
    pub alternate_shell: Option<String>,
}

pub struct Session {
    pub session_id: u32,
    pub policy: ImagePolicy,
    pub clipboard: ClipboardState,
    pub printers: PrinterRegistry,
    pub rate: RateController,
    connection: Mutex<ConnectionParams>,
    /// Cleared by `CLO`, an IPC failure, or RDP-facade disconnect; checked
    /// by the input reader between iterations (spec §5 "cancellation is
    /// cooperative via the `process_inputs` flag").
    process_inputs: AtomicBool,
}

impl Session {
    #[must_use]
    pub fn new(session_id: u32) -> Self {
        Self {
            session_id,
            policy: ImagePolicy::default(),
            clipboard: ClipboardState::new(),
            printers: PrinterRegistry::new(),
            rate: RateController::new(),
            connection: Mutex::new(ConnectionParams::default()),
            process_inputs: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn should_process_inputs(&self) -> bool {
        self.process_inputs.load(Ordering::Relaxed)
    }

    /// `CLO`, an IPC write failure, or a facade disconnect all funnel
    /// through here (spec §4.6/§4.7/§7).
    pub fn terminate(&self) {
        self.process_inputs.store(false, Ordering::Relaxed);
    }

    pub fn with_connection<R>(&self, f: impl FnOnce(&mut ConnectionParams) -> R) -> R {
        f(&mut self.connection.lock().unwrap())
    }

    #[must_use]
    pub fn connection_snapshot(&self) -> ConnectionParams {
        self.connection.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminate_clears_process_inputs() {
        let session = Session::new(1);
        assert!(session.should_process_inputs());
        session.terminate();
        assert!(!session.should_process_inputs());
    }

    #[test]
    fn connection_params_accumulate() {
        let session = Session::new(1);
        session.with_connection(|c| c.host = Some("example.com".to_string()));
        session.with_connection(|c| c.username = Some("alice".to_string()));
        let snapshot = session.connection_snapshot();
        assert_eq!(snapshot.host.as_deref(), Some("example.com"));
        assert_eq!(snapshot.username.as_deref(), Some("alice"));
    }
}
