//! Log Writer - Validate, Encode, Frame, Compress
//!
//! One call takes a batch of loose JSON values and appends them to a log
//! file as protobuf-payload frames inside a fresh gzip member:
//!
//! ```text
//! JSON values ─→ Record::from_value ─→ pb::encode_record ─→ encode_frame ─→ GzSink
//!                (validate shape)      (protobuf bytes)     (8-byte header)  (gzip, append)
//! ```
//!
//! Input is any iterator of values, consumed lazily: each record is
//! validated, encoded, and written before the next one is pulled, so an
//! unbounded source never needs to fit in memory.
//!
//! ## Failure Behavior
//!
//! The first bad record - wrong shape, unknown key, or an encoded payload
//! too big for a frame - stops the batch and surfaces as the returned
//! error. Records before it are already in the file and stay readable: the
//! gzip member is sealed even on the error path. Nothing about the failed
//! record itself reaches the file.
//!
//! ## Usage
//!
//! ```ignore
//! use appslog_storage::{write_records, write_records_with, WriteOptions};
//!
//! let batch = vec![serde_json::json!({
//!     "device": {"id": "e7e1a50c", "type": "idfa"},
//!     "lat": 67.77, "lon": -22.8, "apps": [1, 2, 3],
//! })];
//!
//! let bytes = write_records("device_apps.log.gz", batch)?;
//!
//! // Or tune compression for archival
//! let options = WriteOptions { compression_level: 9, ..Default::default() };
//! write_records_with("device_apps.log.gz", more_records, &options)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use appslog_core::frame::{self, RecordKind};
use appslog_core::{pb, Record, Result};

use crate::gz::GzSink;

// ============================================================================
// Configuration
// ============================================================================

/// Log writer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Gzip compression level, 0 (store) through 9 (best), default 6
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Fsync the file after the gzip member is finished (default: false)
    #[serde(default)]
    pub sync_on_finish: bool,
}

fn default_compression_level() -> u32 {
    6
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            sync_on_finish: false,
        }
    }
}

// ============================================================================
// Write entry points
// ============================================================================

/// Append loose JSON records to the log at `path` with default options,
/// creating the file if it does not exist.
///
/// Returns the total number of framed bytes produced (headers included,
/// measured before compression).
pub fn write_records<P, I>(path: P, records: I) -> Result<u64>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Value>,
{
    write_records_with(path, records, &WriteOptions::default())
}

/// Append loose JSON records to the log at `path`.
///
/// Each call contributes one gzip member, so repeated calls against the
/// same file build a multi-member log that [`crate::LogReader`] reads end
/// to end. See the module docs for what happens when a record is invalid.
pub fn write_records_with<P, I>(path: P, records: I, options: &WriteOptions) -> Result<u64>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Value>,
{
    let path = path.as_ref();
    debug!(
        path = ?path,
        level = options.compression_level,
        "Appending records"
    );

    // flate2 accepts levels 0 through 9
    let level = options.compression_level.min(9);
    let mut sink = GzSink::create(path, level)?;
    match append_all(&mut sink, records) {
        Ok((count, bytes)) => {
            sink.finish(options.sync_on_finish)?;
            info!(
                path = ?path,
                records = count,
                bytes = bytes,
                "Log write complete"
            );
            Ok(bytes)
        }
        Err(err) => {
            // Dropping the sink seals the gzip member, keeping the frames
            // written before the failure readable.
            drop(sink);
            Err(err)
        }
    }
}

fn append_all<I>(sink: &mut GzSink, records: I) -> Result<(u64, u64)>
where
    I: IntoIterator<Item = Value>,
{
    let mut count = 0u64;
    let mut total = 0u64;
    for value in records {
        let record = Record::from_value(&value)?;
        let payload = pb::encode_record(&record);
        let framed = frame::encode_frame(RecordKind::DeviceApps, &payload)?;
        sink.write_frame(&framed)?;
        count += 1;
        total += framed.len() as u64;
    }
    Ok((count, total))
}
