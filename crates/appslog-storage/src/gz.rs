//! Gzip Stream Plumbing
//!
//! Thin wrappers around `flate2` that give the writer and reader the exact
//! gzip behavior the log format relies on:
//!
//! - **Append = new member.** Log files are opened in append mode, so every
//!   write session contributes its own gzip member. [`GzSource`] therefore
//!   decodes with `MultiGzDecoder`, which keeps inflating across member
//!   boundaries instead of stopping at the first trailer.
//! - **Empty file = empty log.** A zero-length file never reaches the
//!   decoder - `MultiGzDecoder` would reject the missing header - and is
//!   served as an immediate end of stream instead.
//! - **Dropping a sink seals the member.** `GzEncoder` writes the deflate
//!   tail and gzip trailer on drop, so even an abandoned write session
//!   leaves the bytes it already produced readable.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Compressing byte sink for one write session.
pub(crate) struct GzSink {
    encoder: GzEncoder<BufWriter<File>>,
}

impl GzSink {
    /// Open `path` for appending, creating it if missing, and start a new
    /// gzip member at the given compression level.
    pub(crate) fn create(path: &Path, level: u32) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::new(level));
        Ok(Self { encoder })
    }

    pub(crate) fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.encoder.write_all(frame)
    }

    /// Finish the gzip member and push everything to the file.
    pub(crate) fn finish(self, sync: bool) -> io::Result<()> {
        let mut writer = self.encoder.finish()?;
        writer.flush()?;
        if sync {
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }
}

/// Decompressing byte source over a whole log file.
pub(crate) struct GzSource {
    /// `None` when the file was empty, serving an immediate end of stream
    decoder: Option<MultiGzDecoder<BufReader<File>>>,
}

impl GzSource {
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self { decoder: None });
        }

        Ok(Self {
            decoder: Some(MultiGzDecoder::new(BufReader::new(file))),
        })
    }
}

impl Read for GzSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.decoder.as_mut() {
            Some(decoder) => decoder.read(buf),
            None => Ok(0),
        }
    }
}
