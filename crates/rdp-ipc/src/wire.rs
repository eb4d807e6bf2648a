//! Updates-channel wire format (spec §4.4).
//!
//! Two message shapes, every integer little-endian `u32`:
//!
//! Text message:  `[u32 len][len bytes utf-8]`
//! Image frame:   `[u32 total_len][u32 tag=0][u32 idx][u32 pos_x][u32 pos_y]
//!                 [u32 width][u32 height][u32 format][u32 quality]
//!                 [u32 fullscreen_flag][payload bytes]`
//! where `total_len = 36 + payload_len`.
//!
//! Each write is issued as a single syscall (one `write_all` per message);
//! this module only produces the byte buffer, the actual write lives in
//! [`crate::channel::UpdatesWriter`].

/// One encoded image frame, ready to be written to the updates channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub idx: u32,
    pub pos_x: u32,
    pub pos_y: u32,
    pub width: u32,
    pub height: u32,
    /// Wire format tag: `CUR=0, PNG=1, JPEG=2, WEBP=3`.
    pub format: u32,
    pub quality: u32,
    pub fullscreen: bool,
    pub payload: Vec<u8>,
}

/// Header size in bytes: `tag, idx, pos_x, pos_y, width, height, format,
/// quality, fullscreen_flag` — 9 `u32` fields, excluding `total_len`
/// itself.
pub const FRAME_HEADER_LEN: u32 = 36;

/// Either shape carried on the updates channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Image(Frame),
}

impl Message {
    /// Serialize this message to its exact wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => encode_text(text),
            Self::Image(frame) => encode_frame(frame),
        }
    }
}

fn encode_text(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(4 + bytes.len());
    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

fn encode_frame(frame: &Frame) -> Vec<u8> {
    #[allow(clippy::cast_possible_truncation)]
    let payload_len = frame.payload.len() as u32;
    let total_len = FRAME_HEADER_LEN + payload_len;

    let mut out = Vec::with_capacity(4 + total_len as usize);
    out.extend_from_slice(&total_len.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // tag = 0 (image frame)
    out.extend_from_slice(&frame.idx.to_le_bytes());
    out.extend_from_slice(&frame.pos_x.to_le_bytes());
    out.extend_from_slice(&frame.pos_y.to_le_bytes());
    out.extend_from_slice(&frame.width.to_le_bytes());
    out.extend_from_slice(&frame.height.to_le_bytes());
    out.extend_from_slice(&frame.format.to_le_bytes());
    out.extend_from_slice(&frame.quality.to_le_bytes());
    out.extend_from_slice(&u32::from(frame.fullscreen).to_le_bytes());
    out.extend_from_slice(&frame.payload);
    out
}

/// Read a little-endian `u32` out of `bytes` at `offset`, for tests that
/// want to assert on individual header fields without re-parsing the
/// whole buffer.
#[must_use]
pub fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}
