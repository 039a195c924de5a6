//! Streaming classification of reads into haplotype buckets.
//!
//! - [`Demultiplexer`]: Routes each read of a stream to the sink of its bucket
//! - [`ReadLengthHistogram`]: Read-length counts per bucket, written as TSV
//!
//! The demultiplexer never looks inside a record. Readers turn their records
//! into [`ReadEntry`] values (name, length, record) and writers implement
//! [`RecordSink`], so the same routing runs for BAM and FASTQ.
//!
//! ## Example
//!
//! ```rust
//! use haplosplit::assignment::AssignmentTable;
//! use haplosplit::core::haplotype::HaplotypeCode;
//! use haplosplit::demux::{Demultiplexer, DispositionConfig, HaplotypeOutputs, ReadEntry};
//!
//! let mut table = AssignmentTable::default();
//! table.insert("r1", HaplotypeCode::H1);
//!
//! let reads = vec![
//!     Ok(ReadEntry::new("r1", 4, "ACGT")),
//!     Ok(ReadEntry::new("r2", 2, "GG")),
//! ];
//! let mut outputs: HaplotypeOutputs<Vec<&str>> = HaplotypeOutputs::default();
//!
//! let config = DispositionConfig::new(true, true, true, false);
//! let outcome = Demultiplexer::new(&table, config)
//!     .run(reads, &mut outputs)
//!     .unwrap();
//!
//! assert_eq!(outputs.h1, vec!["ACGT"]);
//! assert_eq!(outputs.untagged, vec!["GG"]);
//! assert_eq!(outcome.counters.total_reads, 2);
//! ```

pub mod engine;
pub mod histogram;

pub use engine::{
    DemuxOutcome, Demultiplexer, DispositionConfig, HaplotypeOutputs, OutputSink, ReadEntry,
    RecordSink,
};
pub use histogram::ReadLengthHistogram;
