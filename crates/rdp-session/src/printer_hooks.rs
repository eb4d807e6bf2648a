//! Printer relay external entry points (spec §4.8/§6).
//!
//! Driven by external document-open/write/close calls from the host's
//! print virtual channel (out of scope, like capture callbacks are
//! driven by the RDP facade) — these three functions are what that
//! channel calls into.

use rdp_printer::{PrinterId, SpoolerFacade};
use tokio::sync::mpsc;

use rdp_ipc::Message;

use crate::session::Session;

pub async fn create_printjob(
    session: &Session,
    spooler: &(impl SpoolerFacade + ?Sized),
    printer_id: PrinterId,
) -> Result<(), rdp_printer::PrinterError> {
    session.printers.create_printjob(spooler, printer_id).await?;
    Ok(())
}

pub async fn write_printjob(
    session: &Session,
    spooler: &(impl SpoolerFacade + ?Sized),
    printer_id: PrinterId,
    bytes: &[u8],
) -> Result<(), rdp_printer::PrinterError> {
    session.printers.write_printjob(spooler, printer_id, bytes).await
}

/// Closing a job against the specially named PDF printer emits
/// `"printjob|<doc>.pdf"` on the updates channel (spec §4.8).
pub async fn close_printjob(
    session: &Session,
    spooler: &(impl SpoolerFacade + ?Sized),
    printer_id: PrinterId,
    updates: &mpsc::Sender<Message>,
) -> Result<(), rdp_printer::PrinterError> {
    if let Some(notification) = session.printers.close_printjob(spooler, printer_id).await? {
        if updates.send(Message::Text(notification)).await.is_err() {
            session.terminate();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::LoggingSpoolerFacade;

    #[tokio::test]
    async fn closing_pdf_printer_job_emits_notification() {
        let session = Session::new(1);
        let spooler = LoggingSpoolerFacade;
        session.printers.enum_printers(&spooler).await.unwrap();

        create_printjob(&session, &spooler, 0).await.unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        close_printjob(&session, &spooler, 0, &tx).await.unwrap();
        drop(tx);

        let message = rx.recv().await.unwrap();
        match message {
            Message::Text(text) => assert!(text.starts_with("printjob|FREERDPjob")),
            Message::Image(_) => panic!("expected text message"),
        }
    }
}
