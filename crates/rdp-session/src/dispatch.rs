//! Command dispatch (C6, stateful half): applies a parsed [`Command`]
//! against [`Session`] state and the [`RdpFacade`] (spec §4.6).
//!
//! Parsing (`rdp-input::command`) is pure; this module is where that
//! split rejoins session state, keeping translation (`rdp-input`)
//! separate from stateful wiring (this crate).

use rdp_capture::ScreenSource;
use rdp_input::{Command, ScaleRequest};

use crate::facade::RdpFacade;
use crate::session::Session;

/// What the bridge run loop should do after dispatching one command.
pub enum Effect {
    None,
    /// Emit this text message on the updates channel immediately (`"reload"`,
    /// a cached clipboard string, ...).
    EmitText(String),
    /// `FSU`: capture and send the full screen (spec §4.9); handled by the
    /// bridge loop since it needs the encoder, which this module
    /// deliberately does not hold (the screen source it does take is only
    /// used to rescale pointer coordinates here).
    SendFullscreen,
    /// `CLO`: the reader loop exits after finishing the current batch
    /// (spec §8 boundary behavior).
    Close,
}

/// Apply one command. Never panics, never terminates the session except
/// via [`Effect::Close`] (spec §7: dispatch failures are non-terminal).
pub fn dispatch(command: Command, session: &Session, facade: &dyn RdpFacade, screen: &dyn ScreenSource) -> Effect {
    match command {
        Command::ServerAddress { host, port } => {
            session.with_connection(|c| {
                c.host = Some(host.clone());
                if port.is_some() {
                    c.port = port;
                }
            });
            facade.set_server_address(&host, port);
            Effect::None
        }
        Command::VmConnect { guid } => {
            session.with_connection(|c| c.vm_guid = Some(guid.clone()));
            facade.set_vm_connect(&guid);
            Effect::None
        }
        Command::Domain(domain) => {
            session.with_connection(|c| c.domain = Some(domain.clone()));
            facade.set_domain(&domain);
            Effect::None
        }
        Command::Username(raw) => {
            apply_username(raw, session, facade);
            Effect::None
        }
        Command::Password(password) => {
            facade.set_password(&password);
            Effect::None
        }
        Command::AlternateShell(shell) => {
            session.with_connection(|c| c.alternate_shell = Some(shell.clone()));
            facade.set_alternate_shell(&shell);
            Effect::None
        }
        Command::Connect => {
            facade.connect();
            Effect::None
        }
        Command::Resize { width, height } => {
            session.policy.set_client_dims(width, height);
            Effect::None
        }
        Command::UnicodeKey { code, down } => {
            facade.inject_unicode_key(code, down);
            Effect::None
        }
        Command::ScancodeKey { code, down } => {
            let extended = down && rdp_input::keymap::is_extended_on_keydown(code);
            facade.inject_scancode_key(code, down, extended);
            Effect::None
        }
        Command::MouseMove { x, y } => {
            let (x, y) = to_desktop_coords(x, y, session, screen);
            facade.inject_mouse_move(x, y);
            Effect::None
        }
        Command::MouseButton { button, down, x, y } => {
            let (x, y) = to_desktop_coords(x, y, session, screen);
            facade.inject_mouse_button(button, down, x, y);
            Effect::None
        }
        Command::MouseWheelUp { x, y } => {
            let (x, y) = to_desktop_coords(x, y, session, screen);
            facade.inject_mouse_wheel(rdp_input::keymap::wheel_up_flags(), x, y);
            Effect::None
        }
        Command::MouseWheelDown { x, y } => {
            let (x, y) = to_desktop_coords(x, y, session, screen);
            facade.inject_mouse_wheel(rdp_input::keymap::wheel_down_flags(), x, y);
            Effect::None
        }
        Command::ToggleMode => Effect::EmitText("reload".to_string()),
        Command::ScaleDisplay(request) => {
            match request {
                ScaleRequest::Disabled => session.policy.set_scale(None),
                ScaleRequest::Enabled { width, height } => {
                    session.policy.set_scale(Some((width, height)));
                }
            }
            Effect::EmitText("reload".to_string())
        }
        Command::SetEncoding(tag) => {
            session.policy.set_encoding(tag);
            Effect::None
        }
        Command::SetQuality(quality) => {
            session.policy.set_quality(quality);
            Effect::None
        }
        Command::SetQuantity(quantity) => {
            session.policy.set_quantity(quantity);
            Effect::None
        }
        Command::FullscreenRequest => Effect::SendFullscreen,
        Command::ClipboardRequest => {
            if session.clipboard.is_updated() {
                facade.request_clipboard_unicode_text();
                Effect::None
            } else {
                Effect::EmitText(session.clipboard.take_wire_text())
            }
        }
        Command::Close => {
            session.terminate();
            Effect::Close
        }
    }
}

/// Map a pointer event's coordinates from client space back to desktop
/// space when scaling is active (spec §4.6 MMO: "rescale to desktop coords
/// if scaling"), using the inverse of [`rdp_capture::Rect::scale_to_client`].
/// Coordinates pass through unchanged when scaling is off.
fn to_desktop_coords(x: i32, y: i32, session: &Session, screen: &dyn ScreenSource) -> (i32, i32) {
    if !session.policy.scale_display() {
        return (x, y);
    }
    let (client_w, client_h) = session.policy.client_dims();
    let (desktop_w, desktop_h) = screen.desktop_size();
    (
        rdp_capture::scale_coord(x, client_w, desktop_w),
        rdp_capture::scale_coord(y, client_h, desktop_h),
    )
}

/// `USR` (spec §4.6): if no domain is set yet, split `user@domain` or
/// `domain\user`; otherwise the raw string is the username verbatim.
fn apply_username(raw: String, session: &Session, facade: &dyn RdpFacade) {
    let domain_already_set = session.connection_snapshot().domain.is_some();
    if domain_already_set {
        session.with_connection(|c| c.username = Some(raw.clone()));
        facade.set_username(&raw);
        return;
    }

    if let Some((user, domain)) = raw.split_once('@') {
        session.with_connection(|c| {
            c.username = Some(user.to_string());
            c.domain = Some(domain.to_string());
        });
        facade.set_domain(domain);
        facade.set_username(user);
    } else if let Some((domain, user)) = raw.split_once('\\') {
        session.with_connection(|c| {
            c.username = Some(user.to_string());
            c.domain = Some(domain.to_string());
        });
        facade.set_domain(domain);
        facade.set_username(user);
    } else {
        session.with_connection(|c| c.username = Some(raw.clone()));
        facade.set_username(&raw);
    }
}
