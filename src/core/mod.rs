//! Core data types for haplotype-based read splitting.
//!
//! - [`HaplotypeCode`]: The bucket a read is classified into (untagged, H1, H2)
//! - [`HaplotypeLabels`]: Mapping from haplotag list labels to haplotype codes
//! - [`RunCounters`]: Statistics collected while demultiplexing a read stream
//!
//! ## Haplotype Labels
//!
//! The haplotag list names haplotypes with fixed labels:
//!
//! | Label  | Code | Bucket    |
//! |--------|------|-----------|
//! | `none` | 0    | untagged  |
//! | `H1`   | 1    | H1        |
//! | `H2`   | 2    | H2        |

pub mod counters;
pub mod haplotype;
