//! Named IPC channel transport.
//!
//! Two local named duplex streams per session (spec §3/§6):
//! `remotesession_<session_id>_inputs` (bridge reads) and
//! `remotesession_<session_id>_updates` (bridge writes). The bridge
//! process creates both ends; the web gateway connects to them as a
//! client. On Windows this is a real named pipe
//! (`\\.\pipe\remotesession_<id>_<name>`); on Unix there is no named-pipe
//! primitive with the same semantics, so a FIFO special file under
//! `/tmp/remotesession_<id>_<name>` stands in for it.
//!
//! [`InputsReader`]/[`UpdatesWriter`] are generic over the underlying
//! stream so tests can drive them over an in-memory duplex pipe instead of
//! a real OS handle.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::IpcError;
use crate::wire::Message;

/// Maximum bytes read per `inputs` channel read (spec §4.7).
const READ_CHUNK: usize = 4096;

/// Build the platform-addressable name for one end of a session's IPC
/// channel pair. `name` is `"inputs"` or `"updates"`.
#[must_use]
pub fn channel_path(session_id: u32, name: &str) -> String {
    #[cfg(windows)]
    {
        format!(r"\\.\pipe\remotesession_{session_id}_{name}")
    }
    #[cfg(not(windows))]
    {
        format!("/tmp/remotesession_{session_id}_{name}")
    }
}

/// The inputs-channel reader: a single worker blocks on reads here,
/// splits on `\t`, and dispatches (spec §4.7).
pub struct InputsReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> InputsReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read up to 4 KiB. A zero-byte read is not an error: the caller's
    /// loop continues without dispatching anything (spec §8).
    pub async fn read_chunk(&mut self) -> Result<Vec<u8>, IpcError> {
        let mut buf = vec![0u8; READ_CHUNK];
        let n = self.inner.read(&mut buf).await.map_err(IpcError::read)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// The updates-channel single-writer: owns the handle, issues exactly one
/// `write_all` per frame/message so writes never interleave at the byte
/// level (spec §4.4/§4.7).
pub struct UpdatesWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> UpdatesWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn write_message(&mut self, message: &Message) -> Result<(), IpcError> {
        let bytes = message.encode();
        self.inner.write_all(&bytes).await.map_err(IpcError::write)
    }
}

/// Open both ends of a session's IPC channel pair, boxed behind
/// `dyn AsyncRead`/`dyn AsyncWrite` so callers don't need to branch on
/// platform themselves.
pub async fn open_session_channels(
    session_id: u32,
) -> std::io::Result<(
    InputsReader<Box<dyn AsyncRead + Unpin + Send>>,
    UpdatesWriter<Box<dyn AsyncWrite + Unpin + Send>>,
)> {
    let inputs_path = channel_path(session_id, "inputs");
    let updates_path = channel_path(session_id, "updates");

    #[cfg(unix)]
    {
        let inputs = unix::open_inputs(&inputs_path).await?;
        let updates = unix::open_updates(&updates_path).await?;
        Ok((inputs.boxed(), updates.boxed()))
    }
    #[cfg(windows)]
    {
        let inputs = windows::open_inputs(&inputs_path).await?;
        let updates = windows::open_updates(&updates_path).await?;
        Ok((inputs.boxed(), updates.boxed()))
    }
}

impl<R: AsyncRead + Unpin + Send + 'static> InputsReader<R> {
    fn boxed(self) -> InputsReader<Box<dyn AsyncRead + Unpin + Send>> {
        InputsReader::new(Box::new(self.inner))
    }
}

impl<W: AsyncWrite + Unpin + Send + 'static> UpdatesWriter<W> {
    fn boxed(self) -> UpdatesWriter<Box<dyn AsyncWrite + Unpin + Send>> {
        UpdatesWriter::new(Box::new(self.inner))
    }
}

#[cfg(unix)]
pub mod unix {
    //! FIFO-backed channel construction for non-Windows targets.

    use std::io;
    use std::path::Path;

    use tokio::net::unix::pipe;

    use super::{InputsReader, UpdatesWriter};

    /// Ensure the FIFO special file exists at `path`, creating it with
    /// mode `0o600` if not (trusted local boundary, spec §1).
    fn ensure_fifo(path: &str) -> io::Result<()> {
        if Path::new(path).exists() {
            return Ok(());
        }
        nix::unistd::mkfifo(path, nix::sys::stat::Mode::S_IRUSR | nix::sys::stat::Mode::S_IWUSR)
            .map_err(|e| io::Error::from_raw_os_error(e as i32))
    }

    pub async fn open_inputs(path: &str) -> io::Result<InputsReader<pipe::Receiver>> {
        ensure_fifo(path)?;
        let receiver = pipe::OpenOptions::new().open_receiver(path)?;
        Ok(InputsReader::new(receiver))
    }

    pub async fn open_updates(path: &str) -> io::Result<UpdatesWriter<pipe::Sender>> {
        ensure_fifo(path)?;
        let sender = pipe::OpenOptions::new().open_sender(path)?;
        Ok(UpdatesWriter::new(sender))
    }
}

#[cfg(windows)]
pub mod windows {
    //! Named-pipe-backed channel construction for Windows targets.

    use std::io;

    use tokio::net::windows::named_pipe::{NamedPipeServer, PipeMode, ServerOptions};

    use super::{InputsReader, UpdatesWriter};

    async fn create_and_connect(path: &str) -> io::Result<NamedPipeServer> {
        let server = ServerOptions::new()
            .pipe_mode(PipeMode::Byte)
            .create(path)?;
        server.connect().await?;
        Ok(server)
    }

    pub async fn open_inputs(path: &str) -> io::Result<InputsReader<NamedPipeServer>> {
        Ok(InputsReader::new(create_and_connect(path).await?))
    }

    pub async fn open_updates(path: &str) -> io::Result<UpdatesWriter<NamedPipeServer>> {
        Ok(UpdatesWriter::new(create_and_connect(path).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Frame;

    #[tokio::test]
    async fn write_message_is_a_single_write_all() {
        let (client, server) = tokio::io::duplex(4096);
        let mut writer = UpdatesWriter::new(server);
        let msg = Message::Text("reload".to_string());
        writer.write_message(&msg).await.unwrap();
        drop(writer);

        let mut reader = InputsReader::new(client);
        let chunk = reader.read_chunk().await.unwrap();
        assert_eq!(chunk, msg.encode());
    }

    #[tokio::test]
    async fn read_chunk_on_empty_read_returns_empty_not_error() {
        let (client, server) = tokio::io::duplex(4096);
        drop(server);
        let mut reader = InputsReader::new(client);
        let chunk = reader.read_chunk().await.unwrap();
        assert!(chunk.is_empty());
    }

    #[tokio::test]
    async fn round_trips_an_image_frame() {
        let (client, server) = tokio::io::duplex(8192);
        let mut writer = UpdatesWriter::new(server);
        let frame = Frame {
            idx: 3,
            pos_x: 0,
            pos_y: 0,
            width: 64,
            height: 64,
            format: 1,
            quality: 100,
            fullscreen: true,
            payload: vec![1, 2, 3, 4],
        };
        writer.write_message(&Message::Image(frame.clone())).await.unwrap();
        drop(writer);

        let mut reader = InputsReader::new(client);
        let chunk = reader.read_chunk().await.unwrap();
        assert_eq!(chunk, Message::Image(frame).encode());
    }

    #[test]
    fn channel_path_embeds_session_id_and_name() {
        let path = channel_path(42, "inputs");
        assert!(path.contains("42"));
        assert!(path.contains("inputs"));
    }
}
