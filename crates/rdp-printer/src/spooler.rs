//! Host print-spooler boundary.
//!
//! `rdp-printer` never talks to a real spooler: every host call goes
//! through this trait, the way the core crates put the RDP stack and
//! the screen portal behind their own facades.

use async_trait::async_trait;

use crate::error::PrinterError;

/// One OS-enumerated printer, before it is wrapped in a [`crate::Printer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterDescriptor {
    pub name: String,
    pub driver_name: String,
    pub is_default: bool,
    /// Opaque OS printer handle.
    pub handle: u64,
}

#[async_trait]
pub trait SpoolerFacade: Send + Sync {
    /// List the host's currently configured printers.
    async fn enum_printers(&self) -> Result<Vec<PrinterDescriptor>, PrinterError>;

    /// Open a document on `printer_handle`, returning a spooler job handle.
    async fn start_doc(&self, printer_handle: u64, doc_name: &str) -> Result<u64, PrinterError>;

    async fn start_page(&self, job_handle: u64) -> Result<(), PrinterError>;

    async fn write(&self, job_handle: u64, bytes: &[u8]) -> Result<(), PrinterError>;

    async fn end_page(&self, job_handle: u64) -> Result<(), PrinterError>;

    async fn end_doc(&self, job_handle: u64) -> Result<(), PrinterError>;
}
