//! Frame Codec - The On-Stream Unit of the Device Activity Log
//!
//! This module defines the binary frame that carries one encoded record, and
//! the codec that writes and parses it. Frames sit back-to-back inside the
//! compressed stream with no separator: each header announces exactly how
//! many payload bytes follow it.
//!
//! ## Frame Layout
//!
//! All multi-byte integers are little-endian.
//!
//! ```text
//! ┌──────────────┬───────────────┬────────────────┬─────────────────┐
//! │ Magic        │ Record kind   │ Payload length │ Payload         │
//! │ 0xFFFFFFFF   │ 1 = DeviceApps│ 0..=65535      │ `length` bytes  │
//! │ (4 bytes)    │ (2 bytes)     │ (2 bytes)      │                 │
//! └──────────────┴───────────────┴────────────────┴─────────────────┘
//! ```
//!
//! The length field is 16 bits, so 65535 bytes is a hard ceiling on the
//! encoded record size. [`encode_frame`] refuses larger payloads up front
//! rather than letting the length wrap. A zero-length payload is legal: the
//! all-empty record encodes to zero bytes.
//!
//! ## End of Stream vs Corruption
//!
//! [`decode_frame`] draws a sharp line between the two ways a stream can
//! stop short:
//!
//! - Zero bytes available where a header should start: clean end of the
//!   frame sequence (`Ok(None)`).
//! - One to seven header bytes, or fewer payload bytes than the header
//!   promised: corruption ([`Error::TruncatedHeader`] /
//!   [`Error::TruncatedPayload`]). A torn frame never looks like a clean
//!   end.
//!
//! The decoder parses the magic and kind fields structurally but validates
//! neither; callers that care about the kind inspect [`Frame::kind`]
//! (readers skip tags they do not recognize).
//!
//! ## Usage
//!
//! ```ignore
//! use std::io::Cursor;
//! use appslog_core::frame::{self, RecordKind};
//!
//! let frame_bytes = frame::encode_frame(RecordKind::DeviceApps, b"payload")?;
//!
//! let mut stream = Cursor::new(frame_bytes);
//! while let Some(frame) = frame::decode_frame(&mut stream)? {
//!     println!("kind={} len={}", frame.kind, frame.payload.len());
//! }
//! ```

use std::io::Read;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Sentinel value starting every frame header
pub const FRAME_MAGIC: u32 = 0xFFFF_FFFF;

/// Frame header size: magic (4) + record kind (2) + payload length (2)
pub const HEADER_SIZE: usize = 8;

/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Record kind tags carried in the frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RecordKind {
    /// A device activity record (the only kind this library writes)
    DeviceApps = 1,
}

impl TryFrom<u16> for RecordKind {
    type Error = Error;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(RecordKind::DeviceApps),
            other => Err(Error::UnknownRecordKind(other)),
        }
    }
}

/// One frame parsed off the stream.
///
/// The kind tag is returned raw; [`RecordKind::try_from`] classifies it.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Record kind tag from the header, unvalidated
    pub kind: u16,

    /// Payload bytes, exactly as long as the header promised
    pub payload: Bytes,
}

/// Encode one frame: header followed by the payload.
///
/// Fails with [`Error::FrameTooLarge`] before producing any bytes if the
/// payload does not fit the 16-bit length field, so a rejected record can
/// never damage frames already written to a stream.
pub fn encode_frame(kind: RecordKind, payload: &[u8]) -> Result<Bytes> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(Error::FrameTooLarge(payload.len()));
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u32_le(FRAME_MAGIC); // 4 bytes
    buf.put_u16_le(kind as u16); // 2 bytes
    buf.put_u16_le(payload.len() as u16); // 2 bytes
    buf.put_slice(payload);

    Ok(buf.freeze())
}

/// Decode one frame from a byte stream.
///
/// Returns `Ok(None)` on a clean end of stream. A partial header or a
/// payload shorter than the header promised is corruption, never a silent
/// end; see the module docs for the exact split.
pub fn decode_frame<R: Read>(stream: &mut R) -> Result<Option<Frame>> {
    let mut header = [0u8; HEADER_SIZE];
    let got = read_full(stream, &mut header)?;
    if got == 0 {
        return Ok(None);
    }
    if got < HEADER_SIZE {
        return Err(Error::TruncatedHeader(got));
    }

    let mut cursor = &header[..];
    let _magic = cursor.get_u32_le();
    let kind = cursor.get_u16_le();
    let length = cursor.get_u16_le() as usize;

    let mut payload = vec![0u8; length];
    let got = read_full(stream, &mut payload)?;
    if got < length {
        return Err(Error::TruncatedPayload {
            expected: length,
            read: got,
        });
    }

    Ok(Some(Frame {
        kind,
        payload: Bytes::from(payload),
    }))
}

/// Fill `buf` from the stream, stopping early only at end of stream.
///
/// Unlike `read_exact`, the returned count lets the caller tell a clean
/// end (0 bytes) apart from a torn one (some bytes, then end).
fn read_full<R: Read>(stream: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
