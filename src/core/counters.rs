use serde::{Deserialize, Serialize};

use crate::core::haplotype::HaplotypeCode;

/// Counters collected over one demultiplexing run.
///
/// Owned by the caller of the run; all counts only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Every record pulled from the read stream
    pub total_reads: u64,

    /// Records written to the untagged output
    pub untagged_reads: u64,

    /// Records written to the H1 output
    pub h1_reads: u64,

    /// Records written to the H2 output
    pub h2_reads: u64,

    /// Records dropped because their name is not in the haplotag list
    pub unknown_reads: u64,

    /// Records dropped because no output was requested for their bucket
    pub skipped_reads: u64,
}

impl RunCounters {
    /// Number of reads routed to a bucket's own output
    #[must_use]
    pub fn bucket(&self, code: HaplotypeCode) -> u64 {
        match code {
            HaplotypeCode::Untagged => self.untagged_reads,
            HaplotypeCode::H1 => self.h1_reads,
            HaplotypeCode::H2 => self.h2_reads,
        }
    }

    pub(crate) fn increment_bucket(&mut self, code: HaplotypeCode) {
        match code {
            HaplotypeCode::Untagged => self.untagged_reads += 1,
            HaplotypeCode::H1 => self.h1_reads += 1,
            HaplotypeCode::H2 => self.h2_reads += 1,
        }
    }
}
