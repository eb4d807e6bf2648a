// IPC framing and transport for rdp-session-bridge.
//
// Provides the Wire Framer (C4) and the named local IPC channel transport
// the Session Bridge (C7) runs over:
// - wire.rs: Frame / Message, exact byte layout (spec §4.4)
// - channel.rs: InputsReader / UpdatesWriter over a named pipe (Windows) or
//   Unix FIFO, addressed as `remotesession_<session_id>_<name>`
// - error.rs: IpcError / IpcErrorKind (spec §7)

pub mod channel;
pub mod error;
pub mod wire;

pub use channel::{channel_path, open_session_channels, InputsReader, UpdatesWriter};
pub use error::{IpcError, IpcErrorKind};
pub use wire::{Frame, Message};
