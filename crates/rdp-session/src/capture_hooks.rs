//! Capture Hooks (C9, spec §4.9): the three entry points the RDP facade
//! calls when the display or pointer changes.
//!
//! These are plain sync methods (spec §5/§9): the facade may invoke them
//! from its own thread, so they push onto the updates-actor channel with
//! `blocking_send` rather than awaiting.

use rdp_capture::{compose_cursor, source, Bitmap, CursorIcon, Rect, ScreenSource};
use rdp_encode::format::{HIGHER, HIGHEST};
use rdp_encode::{encode, ImageFormat};
use rdp_ipc::{Frame, Message};
use tokio::sync::mpsc;

use crate::session::Session;

/// Bundles what the capture hooks need without borrowing `Session`
/// mutably: a screen source, the shared session state, and a handle to
/// the single-writer updates actor.
pub struct CaptureHooks<'a> {
    pub session: &'a Session,
    pub screen: &'a dyn ScreenSource,
    pub updates: &'a mpsc::Sender<Message>,
}

impl<'a> CaptureHooks<'a> {
    #[must_use]
    pub fn new(session: &'a Session, screen: &'a dyn ScreenSource, updates: &'a mpsc::Sender<Message>) -> Self {
        Self { session, screen, updates }
    }

    /// `send_screen()` (spec §4.9): full-screen capture, always emitted
    /// (no rate control), `fullscreen=true`.
    pub fn send_screen(&self) {
        let (scale_display, client_w, client_h) = self.client_policy();
        let bitmap = source::capture_full(self.screen, scale_display, client_w, client_h);
        self.process(&bitmap, Rect::new(0, 0, bitmap.width, bitmap.height), true);
    }

    /// `send_region(rect)` (spec §4.9): rate-controlled capture of a
    /// sub-region; silently skipped for out-of-bounds/inverted rects or a
    /// momentarily unavailable surface (spec §4.3/§8 — no error surface).
    pub fn send_region(&self, rect: Rect) {
        let (scale_display, client_w, client_h) = self.client_policy();
        if !self.session.rate.should_emit(self.session.policy.quantity()) {
            return;
        }
        let Some((bitmap, mapped_rect)) = source::capture_region(self.screen, rect, scale_display, client_w, client_h)
        else {
            return;
        };
        self.process(&bitmap, mapped_rect, false);
    }

    /// `send_cursor()` (spec §4.9): composite the current pointer icon and
    /// send it as a PNG frame at HIGHEST quality; suppressed for an empty
    /// cursor.
    pub fn send_cursor(&self, icon: &CursorIcon) {
        let Some(bitmap) = compose_cursor(icon) else {
            return;
        };
        let (format, bytes, quality) = match encode(rdp_encode::Encoding::Png, &bitmap, HIGHEST) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "cursor encode failed, dropping frame");
                return;
            }
        };
        self.emit(&bytes, format, quality, icon.hot_x, icon.hot_y, bitmap.width, bitmap.height, false);
    }

    /// `process(bitmap, rect, fullscreen)` (spec §4.9): compute effective
    /// quality, encode, allocate idx, frame and write.
    fn process(&self, bitmap: &Bitmap, rect: Rect, fullscreen: bool) {
        let encoding = self.session.policy.encoding();
        let base_quality = self.session.policy.quality();
        let effective_quality = if fullscreen { HIGHER } else { base_quality };

        let (format, bytes, quality) = match encode(encoding, bitmap, effective_quality) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "encode failed, dropping frame");
                return;
            }
        };

        #[allow(clippy::cast_sign_loss)]
        let pos_x = rect.left.max(0) as u32;
        #[allow(clippy::cast_sign_loss)]
        let pos_y = rect.top.max(0) as u32;
        self.emit(&bytes, format, quality, pos_x, pos_y, rect.width(), rect.height(), fullscreen);
    }

    fn emit(&self, payload: &[u8], format: ImageFormat, quality: u8, pos_x: u32, pos_y: u32, width: u32, height: u32, fullscreen: bool) {
        let frame = Frame {
            idx: self.session.rate.next_idx(),
            pos_x,
            pos_y,
            width,
            height,
            format: format.wire_tag(),
            quality: u32::from(quality),
            fullscreen,
            payload: payload.to_vec(),
        };
        if self.updates.blocking_send(Message::Image(frame)).is_err() {
            self.session.terminate();
        }
    }

    fn client_policy(&self) -> (bool, u32, u32) {
        let (client_w, client_h) = self.session.policy.client_dims();
        (self.session.policy.scale_display(), client_w, client_h)
    }
}
