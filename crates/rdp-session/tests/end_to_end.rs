//! End-to-end scenarios exercising the command parser, dispatcher, capture
//! hooks, and printer relay together (spec §8).

use std::sync::Mutex;

use rdp_capture::{Rect, ScreenSource, StaticScreenSource};
use rdp_input::{parse_batch, MouseButtonKind};
use tokio::sync::mpsc;

use rdp_session::capture_hooks::CaptureHooks;
use rdp_session::dispatch::{dispatch, Effect};
use rdp_session::facade::{LoggingSpoolerFacade, RdpFacade};
use rdp_session::printer_hooks;
use rdp_session::session::Session;

/// Records every call so the scenario can assert ordering and arguments
/// without a real RDP protocol stack (same role as `LoggingRdpFacade`, but
/// observable).
#[derive(Default)]
struct RecordingFacade {
    calls: Mutex<Vec<String>>,
}

impl RecordingFacade {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl RdpFacade for RecordingFacade {
    fn set_server_address(&self, host: &str, port: Option<u16>) {
        self.record(format!("set_server_address({host},{port:?})"));
    }
    fn set_vm_connect(&self, guid: &str) {
        self.record(format!("set_vm_connect({guid})"));
    }
    fn set_domain(&self, domain: &str) {
        self.record(format!("set_domain({domain})"));
    }
    fn set_username(&self, username: &str) {
        self.record(format!("set_username({username})"));
    }
    fn set_password(&self, _password: &str) {
        self.record("set_password(<redacted>)");
    }
    fn set_alternate_shell(&self, shell: &str) {
        self.record(format!("set_alternate_shell({shell})"));
    }
    fn connect(&self) {
        self.record("connect()");
    }
    fn is_connected(&self) -> bool {
        true
    }
    fn inject_unicode_key(&self, code: u16, down: bool) {
        self.record(format!("inject_unicode_key({code},{down})"));
    }
    fn inject_scancode_key(&self, code: u8, down: bool, extended: bool) {
        self.record(format!("inject_scancode_key({code},{down},{extended})"));
    }
    fn inject_mouse_move(&self, x: i32, y: i32) {
        self.record(format!("inject_mouse_move({x},{y})"));
    }
    fn inject_mouse_button(&self, button: MouseButtonKind, down: bool, x: i32, y: i32) {
        self.record(format!("inject_mouse_button({button:?},{down},{x},{y})"));
    }
    fn inject_mouse_wheel(&self, flags: u16, x: i32, y: i32) {
        self.record(format!("inject_mouse_wheel({flags:#06x},{x},{y})"));
    }
    fn request_clipboard_unicode_text(&self) {
        self.record("request_clipboard_unicode_text()");
    }
}

fn run_batch(bytes: &[u8], session: &Session, facade: &dyn RdpFacade, screen: &dyn ScreenSource) -> Vec<Effect> {
    parse_batch(bytes).into_iter().map(|cmd| dispatch(cmd, session, facade, screen)).collect()
}

/// Scenario 1: a unicode keystroke batch injects key-down then key-up, in
/// order, with no other facade calls.
#[test]
fn unicode_keystroke_batch_injects_down_then_up() {
    let session = Session::new(1);
    let facade = RecordingFacade::default();
    let screen = StaticScreenSource::new(1024, 768, [0, 0, 0, 0]);
    run_batch(b"KUC65-1\tKUC65-0", &session, &facade, &screen);
    assert_eq!(
        facade.calls(),
        vec!["inject_unicode_key(65,true)", "inject_unicode_key(65,false)"]
    );
}

/// Scenario 2: scroll wheel down carries the documented flag combination,
/// with scale_display off so the coordinates are passed through unchanged.
#[test]
fn scroll_wheel_down_carries_expected_flags() {
    let session = Session::new(1);
    let facade = RecordingFacade::default();
    let screen = StaticScreenSource::new(1024, 768, [0, 0, 0, 0]);
    run_batch(b"MWD120-200", &session, &facade, &screen);
    assert_eq!(facade.calls(), vec!["inject_mouse_wheel(0x0388,120,200)"]);
}

/// Scenario 3: setting encoding and quality, then an `FSU` batch, produces
/// a fullscreen frame at HIGHER quality regardless of the quality just set
/// (spec §4.9: fullscreen always forces HIGHER).
#[test]
fn quality_then_fullscreen_forces_higher_quality() {
    let session = Session::new(1);
    let facade = RecordingFacade::default();
    let screen = StaticScreenSource::new(640, 480, [5, 6, 7, 255]);
    let (tx, mut rx) = mpsc::channel(4);

    for cmd in parse_batch(b"ECD2\tQLT10") {
        dispatch(cmd, &session, &facade, &screen);
    }
    assert_eq!(session.policy.quality(), 10);

    for effect in run_batch(b"FSU", &session, &facade, &screen) {
        if let Effect::SendFullscreen = effect {
            let hooks = CaptureHooks::new(&session, &screen, &tx);
            hooks.send_screen();
        }
    }
    drop(tx);

    let message = rx.try_recv().expect("one frame emitted");
    match message {
        rdp_ipc::Message::Image(frame) => {
            assert!(frame.fullscreen);
            assert_eq!(frame.quality, u32::from(rdp_encode::HIGHER));
        }
        rdp_ipc::Message::Text(_) => panic!("expected image frame"),
    }
}

/// Scenario 4: a scaled region capture maps both the reported rect and the
/// bitmap dimensions into client coordinates.
#[test]
fn scaled_region_maps_rect_and_pixels_to_client_coordinates() {
    let session = Session::new(1);
    let facade = RecordingFacade::default();
    let screen = StaticScreenSource::new(1600, 1200, [1, 1, 1, 255]);
    let (tx, mut rx) = mpsc::channel(4);

    run_batch(b"SCA800x600", &session, &facade, &screen);
    assert!(session.policy.scale_display());
    assert_eq!(session.policy.client_dims(), (800, 600));

    let hooks = CaptureHooks::new(&session, &screen, &tx);
    hooks.send_region(Rect::new(400, 300, 800, 600));
    drop(tx);

    let message = rx.try_recv().expect("one region frame emitted");
    match message {
        rdp_ipc::Message::Image(frame) => {
            assert_eq!((frame.pos_x, frame.pos_y), (200, 150));
            assert_eq!((frame.width, frame.height), (200, 150));
        }
        rdp_ipc::Message::Text(_) => panic!("expected image frame"),
    }
}

/// Scenario 5: with quantity 25, 8 region captures only emit the 4th and
/// 8th (spec §4.5 drop rule).
#[test]
fn rate_controller_drops_region_frames_per_quantity() {
    let session = Session::new(1);
    let facade = RecordingFacade::default();
    let screen = StaticScreenSource::new(320, 240, [9, 9, 9, 255]);
    let (tx, mut rx) = mpsc::channel(16);

    run_batch(b"QNT25", &session, &facade, &screen);

    let hooks = CaptureHooks::new(&session, &screen, &tx);
    for _ in 0..8 {
        hooks.send_region(Rect::new(0, 0, 10, 10));
    }
    drop(tx);

    let mut emitted = 0;
    while rx.try_recv().is_ok() {
        emitted += 1;
    }
    assert_eq!(emitted, 2);
}

/// Scenario 6: closing a print job against the Myrtille PDF printer emits
/// a `printjob|<doc>.pdf` notification on the updates channel.
#[tokio::test]
async fn closing_pdf_printer_job_notifies_updates_channel() {
    let session = Session::new(1);
    let spooler = LoggingSpoolerFacade;
    session.printers.enum_printers(&spooler).await.unwrap();

    printer_hooks::create_printjob(&session, &spooler, 0).await.unwrap();
    printer_hooks::write_printjob(&session, &spooler, 0, b"%PDF-1.4 ...").await.unwrap();

    let (tx, mut rx) = mpsc::channel(4);
    printer_hooks::close_printjob(&session, &spooler, 0, &tx).await.unwrap();
    drop(tx);

    let message = rx.recv().await.expect("notification sent");
    match message {
        rdp_ipc::Message::Text(text) => assert!(text.starts_with("printjob|") && text.ends_with(".pdf")),
        rdp_ipc::Message::Image(_) => panic!("expected text notification"),
    }
}
