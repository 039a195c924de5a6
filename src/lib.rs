//! # haplosplit
//!
//! A library for splitting sequencing reads by haplotype.
//!
//! Phasing tools such as `whatshap haplotag` assign each read to haplotype 1,
//! haplotype 2, or neither, and can write these assignments as a
//! tab-separated haplotag list. `haplosplit` uses such a list to split a BAM
//! or FASTQ file into one file per haplotype.
//!
//! ## Features
//!
//! - **BAM and FASTQ**: Unaligned BAM and plain or gzipped FASTQ input
//! - **Largest phased block**: Optionally keep only reads of the largest phased
//!   block per chromosome as tagged
//! - **Untagged reads in both haplotypes**: Optionally copy untagged reads into
//!   the H1 and H2 outputs
//! - **Discard unknown reads**: Drop reads missing from the list and stop
//!   reading once every listed read was seen
//! - **Read-length histogram**: Per-haplotype read length counts as TSV
//!
//! ## Example
//!
//! ```rust
//! use haplosplit::{AssignmentOptions, AssignmentTable, HaplotypeLabels};
//! use haplosplit::demux::{Demultiplexer, DispositionConfig, HaplotypeOutputs, ReadEntry};
//!
//! let list = "r1\tH1\nr2\tH2\nr3\tnone\n";
//! let assignments = AssignmentTable::build(
//!     list.as_bytes(),
//!     &HaplotypeLabels::default(),
//!     &AssignmentOptions::default(),
//! )
//! .unwrap();
//!
//! let reads = vec![
//!     Ok(ReadEntry::new("r1", 10, "record1")),
//!     Ok(ReadEntry::new("r4", 7, "record4")),
//! ];
//! let mut outputs: HaplotypeOutputs<Vec<&str>> = HaplotypeOutputs::default();
//! let config = DispositionConfig::new(true, true, true, false);
//! let outcome = Demultiplexer::new(&assignments.table, config)
//!     .run(reads, &mut outputs)
//!     .unwrap();
//!
//! assert_eq!(outputs.h1, vec!["record1"]);
//! assert_eq!(outputs.untagged, vec!["record4"]);
//! assert_eq!(outcome.counters.total_reads, 2);
//! ```
//!
//! ## Modules
//!
//! - [`assignment`]: Haplotag list parsing and largest-block selection
//! - [`core`]: Haplotype codes and run counters
//! - [`demux`]: Streaming read routing and read-length histograms
//! - [`reads`]: BAM/FASTQ readers and writers
//! - [`utils`]: Gzip-transparent input and gzip-aware output streams
//! - [`cli`]: Command-line interface implementation

pub mod assignment;
pub mod cli;
pub mod core;
pub mod demux;
pub mod reads;
pub mod utils;

// Re-export commonly used types for convenience
pub use assignment::{AssignmentError, AssignmentOptions, AssignmentTable, Assignments, KnownReads};
pub use core::counters::RunCounters;
pub use core::haplotype::{HaplotypeCode, HaplotypeLabels};
pub use demux::{Demultiplexer, DispositionConfig, ReadLengthHistogram};
