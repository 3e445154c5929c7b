//! Protobuf Payload Codec
//!
//! Frame payloads are protobuf-encoded `DeviceApps` messages. The wire
//! structs here are written by hand against `proto/deviceapps.proto` rather
//! than generated, which keeps the build free of protoc and makes the tag
//! assignments reviewable in one screen. Field numbers are load-bearing:
//! existing logs were written against this exact schema.
//!
//! ## Schema
//!
//! ```text
//! DeviceApps {
//!     device: 1  optional message { id: 1 bytes, type: 2 bytes }
//!     lat:    2  optional double
//!     lon:    3  optional double
//!     apps:   4  repeated uint32, unpacked
//! }
//! ```
//!
//! The `apps` field stays unpacked on encode - one key byte per element -
//! because that is what historic writers produced and what downstream
//! proto2 consumers expect. The decoder accepts packed encodings too.
//!
//! Absence is preserved end to end: a record with no device block encodes
//! no device field at all, and decodes back to `None` rather than to an
//! empty device.

use prost::Message;

use crate::error::{Error, Result};
use crate::record::{Device, Record};

// ============================================================================
// Wire message types
// ============================================================================

/// Top-level payload message for a device activity record.
#[derive(Clone, PartialEq, Message)]
pub struct DeviceApps {
    #[prost(message, optional, tag = "1")]
    pub device: Option<PbDevice>,
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
    #[prost(uint32, repeated, packed = "false", tag = "4")]
    pub apps: Vec<u32>,
}

/// Device identity submessage.
/// Named PbDevice to avoid a clash with [`crate::record::Device`].
#[derive(Clone, PartialEq, Message)]
pub struct PbDevice {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub id: Option<Vec<u8>>,
    /// Carries the proto field named `type`
    #[prost(bytes = "vec", optional, tag = "2")]
    pub kind: Option<Vec<u8>>,
}

// ============================================================================
// Conversion logic
// ============================================================================

impl From<&Record> for DeviceApps {
    fn from(record: &Record) -> Self {
        DeviceApps {
            device: record.device.as_ref().map(|device| PbDevice {
                id: device.id.as_ref().map(|s| s.as_bytes().to_vec()),
                kind: device.kind.as_ref().map(|s| s.as_bytes().to_vec()),
            }),
            lat: record.lat,
            lon: record.lon,
            apps: record.apps.clone(),
        }
    }
}

impl TryFrom<DeviceApps> for Record {
    type Error = Error;

    fn try_from(message: DeviceApps) -> std::result::Result<Self, Self::Error> {
        let device = match message.device {
            Some(device) => Some(Device {
                id: device.id.map(|b| text("device.id", b)).transpose()?,
                kind: device.kind.map(|b| text("device.type", b)).transpose()?,
            }),
            None => None,
        };

        Ok(Record {
            device,
            lat: message.lat,
            lon: message.lon,
            apps: message.apps,
        })
    }
}

/// The schema stores identifiers as `bytes`; the typed record wants text.
fn text(field: &'static str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::InvalidText { field })
}

// ============================================================================
// Public codec entry points
// ============================================================================

/// Encode a record into protobuf payload bytes.
///
/// The all-empty record encodes to zero bytes.
pub fn encode_record(record: &Record) -> Vec<u8> {
    DeviceApps::from(record).encode_to_vec()
}

/// Decode protobuf payload bytes back into a record.
///
/// Fails on malformed protobuf ([`Error::Decode`]) and on device
/// identifiers that are not UTF-8 ([`Error::InvalidText`]).
pub fn decode_record(payload: &[u8]) -> Result<Record> {
    let message = DeviceApps::decode(payload)?;
    Record::try_from(message)
}
