//! Printer redirection relay for rdp-session-bridge.
//!
//! Maintains at most one active document per redirected printer and
//! notifies the bridge when a job against the specially named PDF
//! printer closes:
//! - `registry.rs`: `Printer` / `PrinterRegistry`, the `{Idle, Busy}`
//!   state machine (spec §3/§4.8)
//! - `spooler.rs`: `SpoolerFacade`, the host OS print-spooler boundary
//! - `error.rs`: `PrinterError`

mod error;
mod registry;
mod spooler;

pub use error::PrinterError;
pub use registry::{Printer, PrinterId, PrinterRegistry, PrintJob, MYRTILLE_PDF_PRINTER_NAME};
pub use spooler::{PrinterDescriptor, SpoolerFacade};
