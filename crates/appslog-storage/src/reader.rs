//! Log Reader - Lazy Iteration Over a Framed Gzip Log
//!
//! [`LogReader`] opens a log file and yields records one at a time:
//!
//! ```text
//! GzSource ─→ decode_frame ─→ pb::decode_record ─→ Record
//! (gunzip)    (8-byte header)  (protobuf bytes)
//! ```
//!
//! Frames are pulled off the stream on demand - nothing is decoded until
//! the iterator is advanced, and only one record is held in memory at a
//! time, however large the log.
//!
//! ## Error Behavior
//!
//! The iterator yields `Result<Record>`, and the first error ends it: after
//! yielding an `Err` the reader closes itself and every later call returns
//! `None`. What arrives in the `Err` distinguishes the failure:
//!
//! - Damaged gzip data ([`Error::CorruptStream`]): the file was cut short
//!   or bit-flipped under the framing.
//! - A torn frame ([`Error::TruncatedHeader`] / [`Error::TruncatedPayload`]):
//!   the gzip stream is intact but the last frame inside it is incomplete.
//! - A bad payload ([`Error::Decode`] / [`Error::InvalidText`]): framing is
//!   fine, the protobuf bytes are not.
//!
//! Frames carrying a record kind this version does not know are skipped
//! with a warning rather than treated as errors, so a log written by a
//! newer producer stays readable.
//!
//! ## Usage
//!
//! ```ignore
//! use appslog_storage::LogReader;
//!
//! for record in LogReader::open("device_apps.log.gz")? {
//!     let record = record?;
//!     println!("{:?} apps={:?}", record.device, record.apps);
//! }
//! ```

use std::io::ErrorKind;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use appslog_core::frame::{self, RecordKind};
use appslog_core::{pb, Error, Record, Result};

use crate::gz::GzSource;

/// Lazy reader over one log file.
///
/// Construct with [`LogReader::open`], consume as an iterator. The file
/// handle is released when the iterator ends, on [`LogReader::close`], or
/// on drop, whichever comes first.
pub struct LogReader {
    /// `None` once the reader is closed; closing is how iteration fuses
    source: Option<GzSource>,

    /// Path the reader was opened on, for log context
    path: PathBuf,

    /// Records yielded so far
    records_read: u64,
}

impl LogReader {
    /// Open a log file for reading.
    ///
    /// Fails immediately if the file cannot be opened; an empty file is a
    /// valid log with no records.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = GzSource::open(&path)?;
        debug!(path = ?path, "Log opened for reading");

        Ok(Self {
            source: Some(source),
            path,
            records_read: 0,
        })
    }

    /// Number of records yielded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Release the underlying file handle.
    ///
    /// Safe to call any number of times; the iterator yields `None` from
    /// then on. Also runs automatically when iteration ends and on drop.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(path = ?self.path, records = self.records_read, "Log closed");
        }
    }

    /// Pull the next record off the stream, skipping frames whose record
    /// kind this version does not understand.
    fn next_record(&mut self) -> Result<Option<Record>> {
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Ok(None),
        };

        loop {
            let frame = match frame::decode_frame(source) {
                Ok(Some(frame)) => frame,
                Ok(None) => return Ok(None),
                Err(err) => return Err(classify(err)),
            };

            match RecordKind::try_from(frame.kind) {
                Ok(RecordKind::DeviceApps) => return Ok(Some(pb::decode_record(&frame.payload)?)),
                Err(err) => {
                    warn!(
                        path = ?self.path,
                        kind = frame.kind,
                        len = frame.payload.len(),
                        error = %err,
                        "Skipping frame with unrecognized record kind"
                    );
                }
            }
        }
    }
}

impl Iterator for LogReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.close();
                None
            }
            Err(err) => {
                self.close();
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for LogReader {}

impl Drop for LogReader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Remap IO errors that mean "the compressed stream itself is damaged".
///
/// `flate2` surfaces a truncated or bit-flipped gzip stream as an IO error
/// while inflating; those become [`Error::CorruptStream`] so callers can
/// tell bad media apart from a plain file-system failure.
fn classify(err: Error) -> Error {
    match err {
        Error::Io(e)
            if matches!(
                e.kind(),
                ErrorKind::UnexpectedEof | ErrorKind::InvalidInput | ErrorKind::InvalidData
            ) =>
        {
            Error::CorruptStream(e)
        }
        other => other,
    }
}
