//! Readers and writers for the read files being split.
//!
//! - **BAM**: Unaligned (or aligned) BAM, read and written with noodles;
//!   outputs reuse the input header
//! - **FASTQ**: Plain or gzip-compressed FASTQ; outputs are gzip-compressed
//!   when their name ends in `.gz`
//!
//! Both turn their records into [`ReadEntry`](crate::demux::ReadEntry)
//! values and provide a [`RecordSink`](crate::demux::RecordSink) for output,
//! so the demultiplexer handles them the same way.

use thiserror::Error;

pub mod bam;
pub mod fastq;
pub mod format;

pub use format::{detect_reads_format, ReadsFormat};

#[derive(Error, Debug)]
pub enum ReadsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file format detected as {0}, currently only BAM and FASTQ are supported")]
    UnsupportedFormat(String),

    #[error("Undetected file format for input reads, expecting BAM or FASTQ (gzipped): {0}")]
    UndetectedFormat(String),
}
