//! The out-of-scope RDP protocol stack, consumed as a trait (spec §1).
//!
//! `rdp-session` never talks to an actual RDP implementation: every input
//! injection and connection-lifecycle call goes through [`RdpFacade`]. The
//! hooks are plain sync methods, not `async fn` — spec §5/§9 calls for the
//! facade to be able to invoke capture callbacks from its own (possibly
//! blocking) thread, so the trait boundary stays synchronous and the
//! bridge's async code calls into it via `spawn_blocking` where needed.

use async_trait::async_trait;
use rdp_input::MouseButtonKind;
use rdp_printer::{PrinterDescriptor, PrinterError, SpoolerFacade};

pub trait RdpFacade: Send + Sync {
    fn set_server_address(&self, host: &str, port: Option<u16>);
    fn set_vm_connect(&self, guid: &str);
    fn set_domain(&self, domain: &str);
    fn set_username(&self, username: &str);
    fn set_password(&self, password: &str);
    fn set_alternate_shell(&self, shell: &str);
    fn connect(&self);
    fn is_connected(&self) -> bool;

    fn inject_unicode_key(&self, code: u16, down: bool);
    fn inject_scancode_key(&self, code: u8, down: bool, extended: bool);
    fn inject_mouse_move(&self, x: i32, y: i32);
    fn inject_mouse_button(&self, button: MouseButtonKind, down: bool, x: i32, y: i32);
    fn inject_mouse_wheel(&self, flags: u16, x: i32, y: i32);

    /// `CLP` with `clipboard.updated == false` (spec §4.6): ask the RDP
    /// facade to request the remote clipboard in `UNICODETEXT` format.
    fn request_clipboard_unicode_text(&self);
}

/// A facade that only logs every call — the RDP-protocol analogue of
/// [`rdp_capture::StaticScreenSource`]: a documented stand-in for the real
/// acquisition primitive, used by the bootstrap binary and by tests.
#[derive(Debug, Default)]
pub struct LoggingRdpFacade;

impl RdpFacade for LoggingRdpFacade {
    fn set_server_address(&self, host: &str, port: Option<u16>) {
        tracing::debug!(host, ?port, "facade: set_server_address");
    }

    fn set_vm_connect(&self, guid: &str) {
        tracing::debug!(guid, "facade: set_vm_connect");
    }

    fn set_domain(&self, domain: &str) {
        tracing::debug!(domain, "facade: set_domain");
    }

    fn set_username(&self, username: &str) {
        tracing::debug!(username, "facade: set_username");
    }

    fn set_password(&self, _password: &str) {
        // Never log password content (spec §4.6).
        tracing::debug!("facade: set_password");
    }

    fn set_alternate_shell(&self, shell: &str) {
        tracing::debug!(shell, "facade: set_alternate_shell");
    }

    fn connect(&self) {
        tracing::info!("facade: connect");
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn inject_unicode_key(&self, code: u16, down: bool) {
        tracing::trace!(code, down, "facade: inject_unicode_key");
    }

    fn inject_scancode_key(&self, code: u8, down: bool, extended: bool) {
        tracing::trace!(code, down, extended, "facade: inject_scancode_key");
    }

    fn inject_mouse_move(&self, x: i32, y: i32) {
        tracing::trace!(x, y, "facade: inject_mouse_move");
    }

    fn inject_mouse_button(&self, button: MouseButtonKind, down: bool, x: i32, y: i32) {
        tracing::trace!(?button, down, x, y, "facade: inject_mouse_button");
    }

    fn inject_mouse_wheel(&self, flags: u16, x: i32, y: i32) {
        tracing::trace!(flags, x, y, "facade: inject_mouse_wheel");
    }

    fn request_clipboard_unicode_text(&self) {
        tracing::debug!("facade: request_clipboard_unicode_text");
    }
}

/// A `SpoolerFacade` that only logs every call — the host-printer-subsystem
/// analogue of [`LoggingRdpFacade`], used by the bootstrap binary until a
/// real spooler is wired in.
#[derive(Debug, Default)]
pub struct LoggingSpoolerFacade;

#[async_trait]
impl SpoolerFacade for LoggingSpoolerFacade {
    async fn enum_printers(&self) -> Result<Vec<PrinterDescriptor>, PrinterError> {
        tracing::debug!("spooler: enum_printers");
        Ok(vec![PrinterDescriptor {
            name: rdp_printer::MYRTILLE_PDF_PRINTER_NAME.to_string(),
            driver_name: "Microsoft Print To PDF".to_string(),
            is_default: true,
            handle: 1,
        }])
    }

    async fn start_doc(&self, printer_handle: u64, doc_name: &str) -> Result<u64, PrinterError> {
        tracing::info!(printer_handle, doc_name, "spooler: start_doc");
        Ok(printer_handle)
    }

    async fn start_page(&self, job_handle: u64) -> Result<(), PrinterError> {
        tracing::debug!(job_handle, "spooler: start_page");
        Ok(())
    }

    async fn write(&self, job_handle: u64, bytes: &[u8]) -> Result<(), PrinterError> {
        tracing::trace!(job_handle, bytes = bytes.len(), "spooler: write");
        Ok(())
    }

    async fn end_page(&self, job_handle: u64) -> Result<(), PrinterError> {
        tracing::debug!(job_handle, "spooler: end_page");
        Ok(())
    }

    async fn end_doc(&self, job_handle: u64) -> Result<(), PrinterError> {
        tracing::info!(job_handle, "spooler: end_doc");
        Ok(())
    }
}
