//! Tagged-record tokenizer and per-tag argument parsing (spec §4.6).
//!
//! The inputs channel carries `\t`-separated records, each a 3-character
//! tag followed by tag-specific ASCII arguments. Unknown tags are ignored
//! for forward compatibility; malformed arguments for a known tag skip
//! that record without terminating the batch (spec §7, `Parse(tag, args)`).

use std::fmt;

/// A decoded input record. Interpretation that depends on existing session
/// state (e.g. `USR` needing to know whether a domain was already set) is
/// deliberately left to the dispatcher — this type only carries what was
/// on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ServerAddress { host: String, port: Option<u16> },
    VmConnect { guid: String },
    Domain(String),
    Username(String),
    Password(String),
    AlternateShell(String),
    Connect,
    Resize { width: u32, height: u32 },
    UnicodeKey { code: u16, down: bool },
    ScancodeKey { code: u8, down: bool },
    MouseMove { x: i32, y: i32 },
    MouseButton { button: MouseButtonKind, down: bool, x: i32, y: i32 },
    MouseWheelUp { x: i32, y: i32 },
    MouseWheelDown { x: i32, y: i32 },
    /// STA / DBG / CMP: mode toggles that all just request a `"reload"`
    /// text message (spec §4.6).
    ToggleMode,
    ScaleDisplay(ScaleRequest),
    SetEncoding(u32),
    SetQuality(u32),
    SetQuantity(u32),
    FullscreenRequest,
    ClipboardRequest,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleRequest {
    Disabled,
    Enabled { width: u32, height: u32 },
}

/// Non-terminal parse failure: the tag was recognized but its arguments
/// did not match the expected shape. The dispatcher logs and skips the
/// record; it never tears down the session (spec §7).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub tag: String,
    pub args: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed args for tag {:?}: {:?}", self.tag, self.args)
    }
}

impl std::error::Error for ParseError {}

/// Split a batch of input bytes on `\t` and parse each non-empty record.
///
/// Unknown tags are silently dropped (not even logged as an error — this
/// is forward compatibility, not a malformed record). Malformed arguments
/// for a recognized tag are logged at DEBUG and skipped; the whole batch
/// is always returned, per spec §8 ("earlier records in the same batch are
/// still applied").
#[must_use]
pub fn parse_batch(bytes: &[u8]) -> Vec<Command> {
    let text = String::from_utf8_lossy(bytes);
    text.split('\t')
        .filter(|record| !record.is_empty())
        .filter_map(|record| match parse_record(record) {
            Ok(Some(cmd)) => Some(cmd),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed input record");
                None
            }
        })
        .collect()
}

/// Parse one `<3-char tag><args>` record.
///
/// `Ok(None)` means the tag is unrecognized (ignored for forward
/// compatibility). `Err` means the tag is known but the arguments could
/// not be parsed.
fn parse_record(record: &str) -> Result<Option<Command>, ParseError> {
    if record.len() < 3 {
        return Ok(None);
    }
    let (tag, args) = record.split_at(3);
    let bad_args = || ParseError {
        tag: tag.to_string(),
        args: args.to_string(),
    };

    let command = match tag {
        "SRV" => {
            let (host, port) = parse_server_address(args).ok_or_else(bad_args)?;
            Command::ServerAddress { host, port }
        }
        "VMG" => Command::VmConnect { guid: args.to_string() },
        "DOM" => Command::Domain(args.to_string()),
        // PWD must never be logged; the caller logging this ParseError
        // path only happens on malformed args, and we never fail to parse
        // an opaque password string, so that path is unreachable for PWD.
        "USR" => Command::Username(args.to_string()),
        "PWD" => Command::Password(args.to_string()),
        "PRG" => Command::AlternateShell(args.to_string()),
        "CON" => Command::Connect,
        "RSZ" => {
            let (width, height) = parse_dimensions(args).ok_or_else(bad_args)?;
            Command::Resize { width, height }
        }
        "KUC" => {
            let (code, down) = parse_code_state(args).ok_or_else(bad_args)?;
            Command::UnicodeKey { code, down }
        }
        "KSC" => {
            let (code, down) = parse_code_state(args).ok_or_else(bad_args)?;
            let code: u8 = code.try_into().map_err(|_| bad_args())?;
            Command::ScancodeKey { code, down }
        }
        "MMO" => {
            let (x, y) = parse_xy(args).ok_or_else(bad_args)?;
            Command::MouseMove { x, y }
        }
        "MLB" | "MMB" | "MRB" => {
            let (down, x, y) = parse_button_args(args).ok_or_else(bad_args)?;
            let button = match tag {
                "MLB" => MouseButtonKind::Left,
                "MMB" => MouseButtonKind::Middle,
                _ => MouseButtonKind::Right,
            };
            Command::MouseButton { button, down, x, y }
        }
        "MWU" => {
            let (x, y) = parse_xy(args).ok_or_else(bad_args)?;
            Command::MouseWheelUp { x, y }
        }
        "MWD" => {
            let (x, y) = parse_xy(args).ok_or_else(bad_args)?;
            Command::MouseWheelDown { x, y }
        }
        "STA" | "DBG" | "CMP" => Command::ToggleMode,
        "SCA" => Command::ScaleDisplay(parse_scale(args).ok_or_else(bad_args)?),
        "ECD" => Command::SetEncoding(args.trim().parse().map_err(|_| bad_args())?),
        "QLT" => Command::SetQuality(args.trim().parse().map_err(|_| bad_args())?),
        "QNT" => Command::SetQuantity(args.trim().parse().map_err(|_| bad_args())?),
        "FSU" => Command::FullscreenRequest,
        "CLP" => Command::ClipboardRequest,
        "CLO" => Command::Close,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// `host`, `host:port`, or `[v6]:port`.
fn parse_server_address(args: &str) -> Option<(String, Option<u16>)> {
    if args.is_empty() {
        return None;
    }
    if let Some(rest) = args.strip_prefix('[') {
        let (host, rest) = rest.split_once(']')?;
        let port = rest.strip_prefix(':').map(str::parse::<u16>).transpose().ok()?;
        return Some((host.to_string(), port));
    }
    match args.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str.parse::<u16>().ok()?;
            Some((host.to_string(), Some(port)))
        }
        None => Some((args.to_string(), None)),
    }
}

/// `WxH`.
fn parse_dimensions(args: &str) -> Option<(u32, u32)> {
    let (w, h) = args.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// `code-1|0` (down=1, up=0).
fn parse_code_state(args: &str) -> Option<(u16, bool)> {
    let (code_str, state_str) = args.rsplit_once('-')?;
    let code: u16 = code_str.parse().ok()?;
    let down = match state_str {
        "1" => true,
        "0" => false,
        _ => return None,
    };
    Some((code, down))
}

/// `x-y`.
fn parse_xy(args: &str) -> Option<(i32, i32)> {
    let (x_str, y_str) = args.rsplit_once('-')?;
    Some((x_str.parse().ok()?, y_str.parse().ok()?))
}

/// `s x-y` (s = 0 up, 1 down).
fn parse_button_args(args: &str) -> Option<(bool, i32, i32)> {
    let (state_str, xy) = args.split_once(' ')?;
    let down = match state_str {
        "1" => true,
        "0" => false,
        _ => return None,
    };
    let (x, y) = parse_xy(xy)?;
    Some((down, x, y))
}

/// `0` (disable) or `WxH` (enable at these client dimensions).
fn parse_scale(args: &str) -> Option<ScaleRequest> {
    if args == "0" {
        return Some(ScaleRequest::Disabled);
    }
    let (width, height) = parse_dimensions(args)?;
    Some(ScaleRequest::Enabled { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_keystroke_round_trip() {
        let commands = parse_batch(b"KUC65-1\tKUC65-0");
        assert_eq!(
            commands,
            vec![
                Command::UnicodeKey { code: 65, down: true },
                Command::UnicodeKey { code: 65, down: false },
            ]
        );
    }

    #[test]
    fn scroll_wheel_down() {
        let commands = parse_batch(b"MWD120-200");
        assert_eq!(commands, vec![Command::MouseWheelDown { x: 120, y: 200 }]);
    }

    #[test]
    fn quality_then_fullscreen() {
        let commands = parse_batch(b"ECD1\tQLT75\tFSU");
        assert_eq!(
            commands,
            vec![
                Command::SetEncoding(1),
                Command::SetQuality(75),
                Command::FullscreenRequest,
            ]
        );
    }

    #[test]
    fn unknown_tag_is_ignored() {
        assert_eq!(parse_batch(b"ZZZhello"), vec![]);
    }

    #[test]
    fn malformed_known_tag_is_skipped_not_fatal() {
        // RSZ without the 'x' separator is malformed; batch still yields
        // the record after it.
        let commands = parse_batch(b"RSZbogus\tCLO");
        assert_eq!(commands, vec![Command::Close]);
    }

    #[test]
    fn clo_mid_batch_keeps_earlier_records() {
        let commands = parse_batch(b"KUC65-1\tCLO\tKUC66-1");
        assert_eq!(
            commands,
            vec![
                Command::UnicodeKey { code: 65, down: true },
                Command::Close,
                Command::UnicodeKey { code: 66, down: true },
            ]
        );
    }

    #[test]
    fn server_address_forms() {
        assert_eq!(
            parse_record("SRVhost").unwrap(),
            Some(Command::ServerAddress { host: "host".to_string(), port: None })
        );
        assert_eq!(
            parse_record("SRVhost:3389").unwrap(),
            Some(Command::ServerAddress { host: "host".to_string(), port: Some(3389) })
        );
        assert_eq!(
            parse_record("SRV[::1]:3389").unwrap(),
            Some(Command::ServerAddress { host: "::1".to_string(), port: Some(3389) })
        );
    }

    #[test]
    fn mouse_button_down() {
        assert_eq!(
            parse_record("MLB1 10-20").unwrap(),
            Some(Command::MouseButton {
                button: MouseButtonKind::Left,
                down: true,
                x: 10,
                y: 20,
            })
        );
    }

    #[test]
    fn scale_disable_and_enable() {
        assert_eq!(parse_record("SCA0").unwrap(), Some(Command::ScaleDisplay(ScaleRequest::Disabled)));
        assert_eq!(
            parse_record("SCA800x600").unwrap(),
            Some(Command::ScaleDisplay(ScaleRequest::Enabled { width: 800, height: 600 }))
        );
    }

    #[test]
    fn password_is_parsed_but_never_part_of_an_error() {
        // PWD always succeeds regardless of content: the args become the
        // password verbatim, so there is no code path where a malformed
        // PWD record's content would be formatted into a ParseError/log.
        let commands = parse_batch(b"PWDhunter2");
        assert_eq!(commands, vec![Command::Password("hunter2".to_string())]);
    }
}
