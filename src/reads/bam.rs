//! BAM input and output using noodles.
//!
//! Records are decoded to [`RecordBuf`] with the BAM codec so they can be
//! written unchanged to any of the haplotype outputs, all of which share the
//! input header. Missing quality scores (stored as `0xFF` bytes) decode to an
//! empty list and are encoded back the same way.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::RecordBuf;

use crate::demux::{ReadEntry, RecordSink};

/// Open a BAM file and read its header.
///
/// No `@SQ` lines are required, so unaligned BAMs are accepted.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the header is invalid.
pub fn open_reader(path: &Path) -> io::Result<(bam::io::Reader<impl BufRead>, sam::Header)> {
    let mut reader = File::open(path).map(bam::io::Reader::new)?;
    let header = reader.read_header()?;
    Ok((reader, header))
}

/// Iterate over the records of an opened BAM file as read entries
pub fn read_entries<'a, R: BufRead>(
    reader: &'a mut bam::io::Reader<R>,
    header: &'a sam::Header,
) -> impl Iterator<Item = io::Result<ReadEntry<RecordBuf>>> + 'a {
    reader
        .record_bufs(header)
        .map(|result| result.map(to_read_entry))
}

fn to_read_entry(record: RecordBuf) -> ReadEntry<RecordBuf> {
    let name = record
        .name()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .unwrap_or_default();
    let length = read_length(&record);
    ReadEntry::new(name, length, record)
}

/// Length of the read sequence.
///
/// Records without a stored sequence fall back to the length implied by
/// their CIGAR (hard clips excluded), or 0 if there is none.
#[must_use]
pub fn read_length(record: &RecordBuf) -> usize {
    let length = record.sequence().len();
    if length > 0 {
        return length;
    }

    record
        .cigar()
        .as_ref()
        .iter()
        .filter(|op| consumes_read(op.kind()))
        .map(|op| op.len())
        .sum()
}

fn consumes_read(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match
            | Kind::Insertion
            | Kind::SoftClip
            | Kind::SequenceMatch
            | Kind::SequenceMismatch
    )
}

/// Writes records to a BGZF-compressed BAM file
pub struct BamSink {
    writer: bam::io::Writer<bgzf::Writer<File>>,
    header: sam::Header,
}

impl BamSink {
    /// Create a BAM file at `path`, writing `header` immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the header written.
    pub fn create(path: &Path, header: &sam::Header) -> io::Result<Self> {
        let mut writer = File::create(path).map(bam::io::Writer::new)?;
        writer.write_alignment_header(header)?;
        Ok(Self {
            writer,
            header: header.clone(),
        })
    }

    /// Flush all records and write the BGZF end-of-file block
    ///
    /// # Errors
    ///
    /// Returns an error if the final blocks cannot be written.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.finish(&self.header)?;
        self.writer.try_finish()
    }
}

impl RecordSink<RecordBuf> for BamSink {
    fn write_record(&mut self, record: &RecordBuf) -> io::Result<()> {
        self.writer.write_alignment_record(&self.header, record)
    }
}
