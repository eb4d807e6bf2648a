//! Printer relay error kinds (spec §7).

#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error("printer {0} not found")]
    NotFound(crate::registry::PrinterId),

    #[error("printer {0} already has an active job")]
    Busy(crate::registry::PrinterId),

    #[error("printer {0} has no active job")]
    NoActiveJob(crate::registry::PrinterId),

    #[error("spooler call failed: {0}")]
    Spooler(String),
}
