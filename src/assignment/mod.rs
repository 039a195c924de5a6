//! Haplotag list ingestion.
//!
//! A haplotag list is a tab-separated file mapping read names to haplotypes,
//! as written by `whatshap haplotag --output-haplotag-list`. Two layouts are
//! accepted:
//!
//! | Columns | Fields |
//! |---------|--------|
//! | 2 | read name, haplotype |
//! | 4 | read name, haplotype, phaseset, chromosome |
//!
//! An optional first line starting with `#` is treated as a header. The
//! 4-column layout is required to restrict tagging to the largest phased
//! block per chromosome.
//!
//! ## Example
//!
//! ```rust
//! use haplosplit::assignment::{AssignmentOptions, AssignmentTable};
//! use haplosplit::core::haplotype::{HaplotypeCode, HaplotypeLabels};
//!
//! let list = "r1\tH1\nr2\tH2\nr3\tnone\n";
//! let assignments = AssignmentTable::build(
//!     list.as_bytes(),
//!     &HaplotypeLabels::default(),
//!     &AssignmentOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(assignments.table.haplotype("r1"), HaplotypeCode::H1);
//! assert_eq!(assignments.table.haplotype("r4"), HaplotypeCode::Untagged);
//! ```

use thiserror::Error;

pub mod blocks;
pub mod list;
pub mod table;

pub use blocks::{select_largest_blocks, BlockCounts, BlockKey, BlockSelection, LargestBlock};
pub use list::{AssignmentEntry, ListFormat};
pub use table::{AssignmentOptions, AssignmentTable, Assignments, KnownReads, ListStats};

#[derive(Error, Debug)]
pub enum AssignmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Line {line_number} of haplotag list does not have at least {expected_columns} tab-separated columns: '{line}'"
    )]
    MalformedLine {
        line_number: usize,
        line: String,
        expected_columns: usize,
    },

    #[error(
        "Unknown haplotype '{label}' on line {line_number} of haplotag list (expected one of: {})",
        .expected.join(", ")
    )]
    UnknownHaplotypeLabel {
        label: String,
        line_number: usize,
        expected: Vec<String>,
    },

    #[error(
        "Haplotag list has no phaseset and chromosome columns (3 and 4), which are required to select reads from the largest phased block"
    )]
    MissingBlockInfo,

    #[error("Mismatch between total number of reads and known reads: {total} vs {known}")]
    InconsistentKnownReads { total: usize, known: usize },

    #[error("No reads in haplotag list, discarding unknown reads would discard everything")]
    NoKnownReads,
}
