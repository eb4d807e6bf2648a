//! Session Bridge (C7, spec §4.7): owns the two IPC channels, spawns the
//! input reader, and drives output emissions through a single-writer
//! updates actor.
//!
//! State machine: `Configured` → `connect()` opens both pipes →
//! `Connected` → spawn input reader → `Running` → on IPC error, `CLO`, or
//! facade disconnect → `Terminating` (spec §4.7). Unlike the original
//! source, `CLO` no longer calls `exit`: `Session::terminate` just unwinds
//! the reader loop and `main` decides whether to exit the process (spec
//! §9 redesign note, adopted).

use std::sync::Arc;

use rdp_capture::ScreenSource;
use rdp_ipc::{open_session_channels, Message};
use tokio::sync::mpsc;

use crate::capture_hooks::CaptureHooks;
use crate::dispatch::{self, Effect};
use crate::error::BridgeError;
use crate::facade::RdpFacade;
use crate::session::Session;

/// Channel depth for the updates-actor mailbox. Generous enough to
/// absorb a burst of region frames without the capture thread blocking
/// on `blocking_send`.
const UPDATES_CHANNEL_CAPACITY: usize = 64;

pub struct SessionBridge {
    pub session: Arc<Session>,
    pub facade: Arc<dyn RdpFacade>,
    pub screen: Arc<dyn ScreenSource>,
}

impl SessionBridge {
    #[must_use]
    pub fn new(session: Arc<Session>, facade: Arc<dyn RdpFacade>, screen: Arc<dyn ScreenSource>) -> Self {
        Self { session, facade, screen }
    }

    /// Run the bridge to completion: opens both channels, spawns the
    /// single-writer updates actor and the input reader, and returns once
    /// the session has torn down (spec §4.7 `Terminating`).
    pub async fn run(self) -> Result<(), BridgeError> {
        let (mut inputs, updates_writer) = open_session_channels(self.session.session_id)
            .await
            .map_err(rdp_ipc::IpcError::read)?;

        let (updates_tx, updates_rx) = mpsc::channel::<Message>(UPDATES_CHANNEL_CAPACITY);

        let writer_session = Arc::clone(&self.session);
        let writer_task = tokio::spawn(updates_actor(updates_writer, updates_rx, writer_session));

        let session = Arc::clone(&self.session);
        let facade = Arc::clone(&self.facade);
        let screen = Arc::clone(&self.screen);
        let reader_updates_tx = updates_tx.clone();
        let reader_task = tokio::task::spawn_blocking(move || {
            input_reader_loop(&mut inputs, &session, facade.as_ref(), screen.as_ref(), &reader_updates_tx)
        });

        drop(updates_tx);

        let _ = reader_task.await;
        let _ = writer_task.await;
        Ok(())
    }
}

/// The single-writer actor (spec §9 redesign note, adopted): owns the
/// updates-channel handle exclusively, serializing every frame/text write
/// behind one `mpsc::Receiver`.
async fn updates_actor(
    mut writer: rdp_ipc::UpdatesWriter<Box<dyn tokio::io::AsyncWrite + Unpin + Send>>,
    mut rx: mpsc::Receiver<Message>,
    session: Arc<Session>,
) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = writer.write_message(&message).await {
            tracing::warn!(error = %e, "updates channel write failed, terminating session");
            session.terminate();
            break;
        }
    }
}

/// The dedicated input-reader worker (spec §4.7): blocks on reads (up to
/// 4 KiB), splits on `\t`, dispatches. Runs on a blocking task since the
/// channel read is, on Unix, a blocking-friendly FIFO read and capture
/// hooks may themselves block on `mpsc::Sender::blocking_send`.
fn input_reader_loop(
    inputs: &mut rdp_ipc::InputsReader<Box<dyn tokio::io::AsyncRead + Unpin + Send>>,
    session: &Session,
    facade: &dyn RdpFacade,
    screen: &dyn ScreenSource,
    updates: &mpsc::Sender<Message>,
) {
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => return,
    };

    while session.should_process_inputs() {
        let chunk = match runtime.block_on(inputs.read_chunk()) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "inputs channel read failed, terminating session");
                session.terminate();
                break;
            }
        };
        if chunk.is_empty() {
            continue;
        }

        for command in rdp_input::parse_batch(&chunk) {
            match dispatch::dispatch(command, session, facade, screen) {
                Effect::None => {}
                Effect::EmitText(text) => {
                    let _ = updates.blocking_send(Message::Text(text));
                }
                Effect::SendFullscreen => {
                    let hooks = CaptureHooks::new(session, screen, updates);
                    hooks.send_screen();
                }
                Effect::Close => break,
            }
        }
    }
}
