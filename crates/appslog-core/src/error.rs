//! Error Types for the Device Activity Log
//!
//! One taxonomy covers both crates; `appslog-storage` constructs these
//! variants directly rather than wrapping them.
//!
//! ## Error Categories
//!
//! ### Validation Errors
//! - `Schema`: an input field has the wrong type or shape
//! - `UnknownField`: an input carries a key the record schema does not define
//!
//! ### Frame Errors
//! - `FrameTooLarge`: an encoded payload cannot be described by the 16-bit
//!   length field
//!
//! ### I/O Errors
//! - `Io`: opening, reading, or writing the underlying file failed
//!
//! ### Corruption Errors
//! - `TruncatedHeader` / `TruncatedPayload`: the frame stream ended partway
//!   through a frame
//! - `CorruptStream`: the compressed layer itself is damaged (bad gzip
//!   header, missing trailer, checksum mismatch)
//!
//! ### Decode Errors
//! - `Decode`: payload bytes do not parse under the record schema
//! - `InvalidText`: a payload text field holds non-UTF-8 bytes
//! - `UnknownRecordKind`: a frame carries a type tag this library does not
//!   define (readers skip such frames, logging this error)
//!
//! ## Usage
//! All fallible functions return [`Result<T>`], aliased to
//! `Result<T, Error>`, so `?` propagates everywhere.
//!
//! ```ignore
//! use appslog_core::{Error, Result};
//!
//! fn payload_len(payload: &[u8]) -> Result<u16> {
//!     if payload.len() > appslog_core::frame::MAX_PAYLOAD_SIZE {
//!         return Err(Error::FrameTooLarge(payload.len()));
//!     }
//!     Ok(payload.len() as u16)
//! }
//! ```

use thiserror::Error;

use crate::frame::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{field}' must be {expected}")]
    Schema {
        field: String,
        expected: &'static str,
    },

    #[error("unrecognized field '{0}'")]
    UnknownField(String),

    #[error("encoded payload is {0} bytes, larger than the {max}-byte frame limit", max = MAX_PAYLOAD_SIZE)]
    FrameTooLarge(usize),

    #[error("truncated frame header: wanted {expected} bytes, stream ended after {0}", expected = HEADER_SIZE)]
    TruncatedHeader(usize),

    #[error("truncated frame payload: wanted {expected} bytes, stream ended after {read}")]
    TruncatedPayload { expected: usize, read: usize },

    #[error("corrupt compressed stream: {0}")]
    CorruptStream(#[source] std::io::Error),

    #[error("unknown record kind tag: {0}")]
    UnknownRecordKind(u16),

    #[error("malformed payload: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("payload field '{field}' is not valid UTF-8")]
    InvalidText { field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_field() {
        let err = Error::Schema {
            field: "device.id".to_string(),
            expected: "a string",
        };
        assert_eq!(err.to_string(), "'device.id' must be a string");
    }

    #[test]
    fn test_frame_too_large_cites_limit() {
        let err = Error::FrameTooLarge(70_000);
        let msg = err.to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("65535"));
    }

    #[test]
    fn test_truncated_header_cites_header_size() {
        let err = Error::TruncatedHeader(3);
        let msg = err.to_string();
        assert!(msg.contains("wanted 8 bytes"));
        assert!(msg.contains("after 3"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/a/real/path")?)
        }
        let err = open_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
