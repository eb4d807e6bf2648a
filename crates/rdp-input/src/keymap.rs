//! Scancode classification and mouse wheel wire flags.
//!
//! RDP sends XT Set 1 scancodes. A handful of navigation/numpad keys live
//! at the same code point as their numpad counterpart and are only
//! distinguished by an "extended" (E0 prefix) flag, which this bridge must
//! set on key-down for a fixed set of codes (spec §4.6, KSC).

/// Scancodes that MUST be sent as "extended" on key-down (arrows, Home,
/// End, PageUp/Down, Insert, Delete — spec §4.6).
const EXTENDED_ON_KEYDOWN: [u8; 8] = [71, 72, 73, 75, 77, 79, 80, 81];

/// Whether `code` belongs to the fixed extended-scancode set.
///
/// Per spec §9 (preserved, flagged as possibly-buggy behavior, not
/// silently fixed here): this only governs key-DOWN. Key-up for the
/// same codes is dispatched without the extended flag, on purpose;
/// correctness depends on the RDP server's tolerance for an
/// extended-down/non-extended-up pair.
#[must_use]
pub fn is_extended_on_keydown(code: u8) -> bool {
    EXTENDED_ON_KEYDOWN.contains(&code)
}

/// RDP `PTRFLAGS_WHEEL` / `PTRFLAGS_WHEEL_NEGATIVE` bits (MS-RDPBCGR
/// pointer event flags), plus the fixed rotation deltas this bridge uses
/// for a single wheel tick (spec §4.6, MWU/MWD).
pub const PTRFLAGS_WHEEL: u16 = 0x0200;
pub const PTRFLAGS_WHEEL_NEGATIVE: u16 = 0x0100;
pub const WHEEL_UP_DELTA: u16 = 0x0078;
pub const WHEEL_DOWN_DELTA: u16 = 0x0088;

/// Compose the wire flags for a single wheel-up tick.
#[must_use]
pub fn wheel_up_flags() -> u16 {
    PTRFLAGS_WHEEL | WHEEL_UP_DELTA
}

/// Compose the wire flags for a single wheel-down tick.
#[must_use]
pub fn wheel_down_flags() -> u16 {
    PTRFLAGS_WHEEL | PTRFLAGS_WHEEL_NEGATIVE | WHEEL_DOWN_DELTA
}
