//! Top-level error type unifying every component's error kind (spec §7).
//!
//! Only used where the bridge genuinely needs one type across crate
//! boundaries (`main`'s `Result`, the bridge run loop's terminal-error
//! path). Component-local errors (`EncodeError`, `PrinterError`, ...)
//! stay in their own crates and are converted here, not replaced.

use rdp_encode::EncodeError;
use rdp_ipc::IpcError;
use rdp_printer::PrinterError;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Ipc(#[from] IpcError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Printer(#[from] PrinterError),

    #[error("no primary drawing surface available")]
    NoResource,
}
