//! FASTQ input and output using noodles.

use std::io::{self, BufRead};
use std::path::Path;

use noodles::fastq;

use crate::demux::{ReadEntry, RecordSink};
use crate::utils::compression::{open_input, OutputStream};

/// Open a FASTQ file, decompressing gzip input transparently
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_reader(path: &Path) -> io::Result<fastq::io::Reader<Box<dyn BufRead>>> {
    open_input(path).map(fastq::io::Reader::new)
}

/// Iterate over the records of an opened FASTQ file as read entries
pub fn read_entries<R: BufRead>(
    reader: &mut fastq::io::Reader<R>,
) -> impl Iterator<Item = io::Result<ReadEntry<fastq::Record>>> + '_ {
    reader.records().map(|result| result.map(to_read_entry))
}

fn to_read_entry(record: fastq::Record) -> ReadEntry<fastq::Record> {
    let name = String::from_utf8_lossy(record.name()).into_owned();
    let length = record.sequence().len();
    ReadEntry::new(name, length, record)
}

/// Writes records to a plain or gzip-compressed FASTQ file
pub struct FastqSink {
    stream: OutputStream,
}

impl FastqSink {
    /// Create `path`; the output is gzip-compressed if it ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> io::Result<Self> {
        OutputStream::create(path).map(|stream| Self { stream })
    }

    /// Flush buffered records and close the compressed stream
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining data cannot be written.
    pub fn finish(self) -> io::Result<()> {
        self.stream.finish()
    }
}

impl RecordSink<fastq::Record> for FastqSink {
    fn write_record(&mut self, record: &fastq::Record) -> io::Result<()> {
        fastq::io::Writer::new(&mut self.stream).write_record(record)
    }
}
