//! `PrinterRegistry`: the C8 printer relay state machine.
//!
//! One entry per redirected printer, `{Idle, Busy(PrintJob)}`, held as an
//! `Arc<tokio::sync::RwLock<HashMap<..>>>` with async accessor methods.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use crate::error::PrinterError;
use crate::spooler::{PrinterDescriptor, SpoolerFacade};

pub type PrinterId = u32;

/// The one printer name that gets a notification on the updates channel
/// when its job closes (spec §4.8/§6).
pub const MYRTILLE_PDF_PRINTER_NAME: &str = "Myrtille PDF";

/// An in-flight print job against one printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub id: u32,
    pub doc_name: String,
    pub spooler_handle: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PrinterState {
    Idle,
    Busy(PrintJob),
}

/// A redirected printer and its current job, if any.
#[derive(Debug, Clone)]
pub struct Printer {
    pub id: PrinterId,
    pub name: String,
    pub driver_name: String,
    pub is_default: bool,
    pub handle: u64,
    state: PrinterState,
}

impl Printer {
    fn new(id: PrinterId, descriptor: PrinterDescriptor) -> Self {
        Self {
            id,
            name: descriptor.name,
            driver_name: descriptor.driver_name,
            is_default: descriptor.is_default,
            handle: descriptor.handle,
            state: PrinterState::Idle,
        }
    }

    #[must_use]
    pub fn current_job(&self) -> Option<&PrintJob> {
        match &self.state {
            PrinterState::Idle => None,
            PrinterState::Busy(job) => Some(job),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.current_job().is_some()
    }
}

/// Thread-safe printer registry; one instance is shared by the capture
/// hooks and the input-command dispatcher.
#[derive(Clone)]
pub struct PrinterRegistry {
    inner: Arc<RwLock<HashMap<PrinterId, Printer>>>,
    next_job_id: Arc<AtomicU32>,
}

impl Default for PrinterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrinterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_job_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Query the host for its printer list and (re-)register each one,
    /// preserving any job already in flight (spec §4.8 `enum_printers`).
    pub async fn enum_printers(
        &self,
        spooler: &(impl SpoolerFacade + ?Sized),
    ) -> Result<Vec<Printer>, PrinterError> {
        let descriptors = spooler.enum_printers().await?;
        let mut inner = self.inner.write().await;
        for (idx, descriptor) in descriptors.into_iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let id = idx as PrinterId;
            inner.entry(id).or_insert_with(|| Printer::new(id, descriptor));
        }
        Ok(inner.values().cloned().collect())
    }

    /// `create_printjob` (spec §4.8): fails with [`PrinterError::Busy`] if
    /// the printer already has a current job.
    pub async fn create_printjob(
        &self,
        spooler: &(impl SpoolerFacade + ?Sized),
        printer_id: PrinterId,
    ) -> Result<PrintJob, PrinterError> {
        let mut inner = self.inner.write().await;
        let printer = inner
            .get_mut(&printer_id)
            .ok_or(PrinterError::NotFound(printer_id))?;
        if printer.is_busy() {
            return Err(PrinterError::Busy(printer_id));
        }

        let doc_name = document_name(&printer.name);
        let spooler_handle = spooler.start_doc(printer.handle, &doc_name).await?;
        spooler.start_page(spooler_handle).await?;

        let job = PrintJob {
            id: self.next_job_id.fetch_add(1, Ordering::Relaxed),
            doc_name,
            spooler_handle,
        };
        printer.state = PrinterState::Busy(job.clone());
        Ok(job)
    }

    /// `write_printjob` (spec §4.8): forwards bytes to the spooler.
    pub async fn write_printjob(
        &self,
        spooler: &(impl SpoolerFacade + ?Sized),
        printer_id: PrinterId,
        bytes: &[u8],
    ) -> Result<(), PrinterError> {
        let inner = self.inner.read().await;
        let printer = inner
            .get(&printer_id)
            .ok_or(PrinterError::NotFound(printer_id))?;
        let job = printer
            .current_job()
            .ok_or(PrinterError::NoActiveJob(printer_id))?;
        spooler.write(job.spooler_handle, bytes).await
    }

    /// `close_printjob` (spec §4.8): ends the page and the document but
    /// never closes the printer handle itself. Idempotent: closing an
    /// already-idle printer is a no-op, not an error. Returns the
    /// `"printjob|<doc>.pdf"` notification text when the printer is the
    /// specially named PDF printer.
    pub async fn close_printjob(
        &self,
        spooler: &(impl SpoolerFacade + ?Sized),
        printer_id: PrinterId,
    ) -> Result<Option<String>, PrinterError> {
        let mut inner = self.inner.write().await;
        let printer = inner
            .get_mut(&printer_id)
            .ok_or(PrinterError::NotFound(printer_id))?;

        let job = match std::mem::replace(&mut printer.state, PrinterState::Idle) {
            PrinterState::Idle => return Ok(None),
            PrinterState::Busy(job) => job,
        };

        spooler.end_page(job.spooler_handle).await?;
        spooler.end_doc(job.spooler_handle).await?;

        if printer.name == MYRTILLE_PDF_PRINTER_NAME {
            Ok(Some(format!("printjob|{}.pdf", job.doc_name)))
        } else {
            Ok(None)
        }
    }
}

/// Document name for a new job: a unique `FREERDPjob<pid><tick>` string
/// for the PDF printer, a fixed template otherwise (spec §4.8).
fn document_name(printer_name: &str) -> String {
    if printer_name == MYRTILLE_PDF_PRINTER_NAME {
        let pid = std::process::id();
        #[allow(clippy::cast_possible_truncation)]
        let tick = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        format!("FREERDPjob{pid}{tick}")
    } else {
        format!("{printer_name} redirected document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSpooler {
        next_handle: Mutex<u64>,
        written: Mutex<Vec<u8>>,
    }

    #[async_trait::async_trait]
    impl SpoolerFacade for FakeSpooler {
        async fn enum_printers(&self) -> Result<Vec<PrinterDescriptor>, PrinterError> {
            Ok(vec![
                PrinterDescriptor {
                    name: MYRTILLE_PDF_PRINTER_NAME.to_string(),
                    driver_name: "PDF".to_string(),
                    is_default: true,
                    handle: 1,
                },
                PrinterDescriptor {
                    name: "Office LaserJet".to_string(),
                    driver_name: "LaserJet".to_string(),
                    is_default: false,
                    handle: 2,
                },
            ])
        }

        async fn start_doc(&self, _printer_handle: u64, _doc_name: &str) -> Result<u64, PrinterError> {
            let mut next = self.next_handle.lock().unwrap();
            *next += 1;
            Ok(*next)
        }

        async fn start_page(&self, _job_handle: u64) -> Result<(), PrinterError> {
            Ok(())
        }

        async fn write(&self, _job_handle: u64, bytes: &[u8]) -> Result<(), PrinterError> {
            self.written.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }

        async fn end_page(&self, _job_handle: u64) -> Result<(), PrinterError> {
            Ok(())
        }

        async fn end_doc(&self, _job_handle: u64) -> Result<(), PrinterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_create_while_busy_fails() {
        let spooler = FakeSpooler::default();
        let registry = PrinterRegistry::new();
        registry.enum_printers(&spooler).await.unwrap();

        registry.create_printjob(&spooler, 0).await.unwrap();
        let err = registry.create_printjob(&spooler, 0).await.unwrap_err();
        assert!(matches!(err, PrinterError::Busy(0)));
    }

    #[tokio::test]
    async fn closing_pdf_printer_job_emits_notification() {
        let spooler = FakeSpooler::default();
        let registry = PrinterRegistry::new();
        registry.enum_printers(&spooler).await.unwrap();

        let job = registry.create_printjob(&spooler, 0).await.unwrap();
        assert!(job.doc_name.starts_with("FREERDPjob"));

        let notice = registry.close_printjob(&spooler, 0).await.unwrap();
        assert_eq!(notice, Some(format!("printjob|{}.pdf", job.doc_name)));
    }

    #[tokio::test]
    async fn closing_non_pdf_printer_emits_nothing() {
        let spooler = FakeSpooler::default();
        let registry = PrinterRegistry::new();
        registry.enum_printers(&spooler).await.unwrap();

        registry.create_printjob(&spooler, 1).await.unwrap();
        let notice = registry.close_printjob(&spooler, 1).await.unwrap();
        assert_eq!(notice, None);
    }

    #[tokio::test]
    async fn double_close_is_idempotent() {
        let spooler = FakeSpooler::default();
        let registry = PrinterRegistry::new();
        registry.enum_printers(&spooler).await.unwrap();

        registry.create_printjob(&spooler, 0).await.unwrap();
        registry.close_printjob(&spooler, 0).await.unwrap();
        let second = registry.close_printjob(&spooler, 0).await.unwrap();
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn write_without_active_job_fails() {
        let spooler = FakeSpooler::default();
        let registry = PrinterRegistry::new();
        registry.enum_printers(&spooler).await.unwrap();

        let err = registry.write_printjob(&spooler, 1, b"data").await.unwrap_err();
        assert!(matches!(err, PrinterError::NoActiveJob(1)));
    }
}
