//! IPC error kinds (spec §7). Every variant is terminal for the session:
//! a read failure exits the input reader, a write failure sets
//! `process_inputs = false` so the next reader iteration exits.

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcErrorKind {
    InvalidHandle,
    NotConnected,
    Busy,
    BadPipe,
    BrokenPipe,
    Other,
}

impl From<&io::Error> for IpcErrorKind {
    fn from(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => Self::InvalidHandle,
            io::ErrorKind::NotConnected => Self::NotConnected,
            io::ErrorKind::WouldBlock => Self::Busy,
            io::ErrorKind::BrokenPipe => Self::BrokenPipe,
            io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset => Self::BadPipe,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("inputs channel read failed ({kind:?}): {source}")]
    Read { kind: IpcErrorKind, #[source] source: io::Error },

    #[error("updates channel write failed ({kind:?}): {source}")]
    Write { kind: IpcErrorKind, #[source] source: io::Error },
}

impl IpcError {
    #[must_use]
    pub fn read(source: io::Error) -> Self {
        Self::Read { kind: IpcErrorKind::from(&source), source }
    }

    #[must_use]
    pub fn write(source: io::Error) -> Self {
        Self::Write { kind: IpcErrorKind::from(&source), source }
    }
}
