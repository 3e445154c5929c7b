//! Appslog Storage Layer
//!
//! This crate implements the file side of the appslog device activity log -
//! the component responsible for turning loose JSON records into compressed
//! frame files on disk, and back.
//!
//! ## What is the Storage Layer?
//!
//! It sits between record producers (trackers, ETL jobs) and the log files
//! consumers replay. It handles:
//!
//! 1. **Validation**: Rejecting malformed input up front, with errors that
//!    name the bad field
//! 2. **Encoding**: Protobuf payloads framed with an 8-byte header
//! 3. **Compression**: One gzip member per write session, append-friendly
//! 4. **Lazy Reading**: Iterators that decode one record at a time
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐
//! │  Producers   │
//! └──────┬───────┘
//!        │ JSON values
//!        ▼
//! ┌─────────────────────┐
//! │ write_records       │
//! │ - Validates         │
//! │ - Encodes + frames  │
//! │ - Gzips, appends    │
//! └─────────┬───────────┘
//!           │ framed gzip members
//!           ▼
//! ┌─────────────────────┐
//! │  device_apps.log.gz │
//! └─────────┬───────────┘
//!           │ framed gzip members
//!           ▼
//! ┌─────────────────────┐
//! │ LogReader           │
//! │ - Gunzips           │
//! │ - Deframes          │
//! │ - Decodes lazily    │
//! └─────────┬───────────┘
//!           │ records
//!           ▼
//! ┌──────────────┐
//! │  Consumers   │
//! └──────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ### Writing
//! ```ignore
//! use appslog_storage::write_records;
//!
//! let batch = vec![
//!     serde_json::json!({
//!         "device": {"id": "e7e1a50c0ec2747ca56cd9e1558c0d7c", "type": "idfa"},
//!         "lat": 67.7835424444,
//!         "lon": -22.8044005471,
//!         "apps": [1, 2, 3, 42],
//!     }),
//! ];
//!
//! let bytes = write_records("device_apps.log.gz", batch)?;
//! println!("wrote {bytes} framed bytes");
//! ```
//!
//! ### Reading
//! ```ignore
//! use appslog_storage::LogReader;
//!
//! for record in LogReader::open("device_apps.log.gz")? {
//!     let record = record?;
//!     println!("apps: {:?}", record.apps);
//! }
//! ```
//!
//! ## Design Decisions
//!
//! ### Why One Gzip Member Per Write Session?
//! - **Append without rewrite**: New sessions concatenate onto old files
//! - **Crash isolation**: A dying writer seals its member; earlier sessions
//!   stay readable
//! - **Standard tooling**: `zcat` still decodes the whole file
//!
//! ### Why Frames Inside the Compressed Stream?
//! - **Self-describing**: Each header carries a record kind and length, so
//!   payloads need no delimiters
//! - **Forward compatible**: Unknown record kinds are skipped, not fatal
//! - **Cheap truncation detection**: A torn frame is distinguishable from a
//!   clean end of stream

mod gz;
pub mod reader;
pub mod writer;

pub use appslog_core::{Device, Error, Record, Result};
pub use reader::LogReader;
pub use writer::{write_records, write_records_with, WriteOptions};
