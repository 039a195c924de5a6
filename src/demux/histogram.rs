use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use crate::core::haplotype::HaplotypeCode;

/// Read-length frequencies per haplotype bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadLengthHistogram {
    buckets: [BTreeMap<usize, u64>; 3],
}

impl ReadLengthHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one read of `length` in a bucket
    pub fn record(&mut self, haplotype: HaplotypeCode, length: usize) {
        *self.buckets[haplotype.index()].entry(length).or_insert(0) += 1;
    }

    /// Number of reads of `length` in a bucket
    #[must_use]
    pub fn count(&self, haplotype: HaplotypeCode, length: usize) -> u64 {
        self.buckets[haplotype.index()]
            .get(&length)
            .copied()
            .unwrap_or(0)
    }

    /// Number of reads recorded in a bucket
    #[must_use]
    pub fn total(&self, haplotype: HaplotypeCode) -> u64 {
        self.buckets[haplotype.index()].values().sum()
    }

    /// Distinct lengths over all buckets, ascending
    #[must_use]
    pub fn lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .flat_map(BTreeMap::keys)
            .copied()
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .collect()
    }

    /// Write the histogram as TSV: one row per observed length, ascending.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "#length\tcount-untagged\tcount-h1\tcount-h2")?;
        for length in self.lengths() {
            writeln!(
                writer,
                "{length}\t{}\t{}\t{}",
                self.count(HaplotypeCode::Untagged, length),
                self.count(HaplotypeCode::H1, length),
                self.count(HaplotypeCode::H2, length),
            )?;
        }
        writer.flush()
    }
}
