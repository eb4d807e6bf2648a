// Screen and cursor bitmap abstraction for rdp-session-bridge.
//
// Provides the ScreenSource trait and the Cursor Compositor:
// - bitmap.rs: Bitmap, Rect and the scaling transform shared by both
// - source.rs: ScreenSource trait (full-screen / region capture)
// - cursor.rs: pointer icon -> ARGB bitmap compositing

pub mod bitmap;
pub mod cursor;
pub mod source;

pub use bitmap::{scale_coord, Bitmap, Rect};
pub use cursor::{compose_cursor, CursorIcon};
pub use source::{ScreenSource, StaticScreenSource};
