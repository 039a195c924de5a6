//! Transparent gzip handling for inputs and outputs.
//!
//! Inputs are sniffed for the gzip magic bytes, so plain, gzip and BGZF files
//! can be read through the same [`BufRead`]. Outputs are gzip-compressed when
//! their path ends in `.gz`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check if the path names a gzip-compressed file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzip_path(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip") || path_str.ends_with(".bgz")
}

/// Open a file for reading, decompressing it if it starts with the gzip magic.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let mut reader = BufReader::new(File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read up to `len` (decompressed) bytes from the start of a file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_prefix(path: &Path, len: usize) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(len);
    open_input(path)?
        .take(len as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// A buffered output file, gzip-compressed or plain
pub enum OutputStream {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputStream {
    /// Create `path`, compressing if it has a gzip extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        if is_gzip_path(path) {
            Ok(Self::Gzip(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(Self::Plain(file))
        }
    }

    /// Write any pending data and the gzip trailer
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or compressing fails.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(writer) => writer.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}
