use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::assignment::blocks::{select_largest_blocks, BlockCounts, BlockKey, LargestBlock};
use crate::assignment::list::ListFormat;
use crate::assignment::AssignmentError;
use crate::core::haplotype::{HaplotypeCode, HaplotypeLabels};
use crate::utils::compression::open_input;

/// Options controlling haplotag list ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentOptions {
    /// Keep only reads of the largest phased block per chromosome as tagged
    pub only_largest_block: bool,
    /// Collect the names of all listed reads so unlisted reads can be dropped
    pub discard_unknown_reads: bool,
}

/// Read name → haplotype lookup.
///
/// Only tagged reads are stored; any other name resolves to
/// [`HaplotypeCode::Untagged`].
#[derive(Debug, Clone, Default)]
pub struct AssignmentTable {
    assignments: HashMap<String, HaplotypeCode>,
}

/// Names of every read listed in the haplotag list, tagged or not
#[derive(Debug, Clone, Default)]
pub struct KnownReads {
    names: HashSet<String>,
}

impl KnownReads {
    #[must_use]
    pub fn contains(&self, read_name: &str) -> bool {
        self.names.contains(read_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for KnownReads {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Summary of a haplotag list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStats {
    /// Data lines in the list
    pub total_reads: usize,
    /// Distinct reads assigned to H1 or H2 before block filtering
    pub tagged_reads: usize,
    /// `total_reads - tagged_reads`
    pub untagged_reads: usize,
    /// Tagged reads reverted to untagged by largest-block filtering
    pub removed_reads: usize,
}

/// Everything produced by ingesting a haplotag list
#[derive(Debug, Clone)]
pub struct Assignments {
    pub table: AssignmentTable,
    /// Only present when unknown reads are to be discarded
    pub known_reads: Option<KnownReads>,
    pub stats: ListStats,
    /// Only populated when filtering to the largest phased block
    pub largest_blocks: Vec<LargestBlock>,
    pub format: Option<ListFormat>,
}

impl AssignmentTable {
    /// Haplotype of a read; `Untagged` for reads not in the table
    #[must_use]
    pub fn haplotype(&self, read_name: &str) -> HaplotypeCode {
        self.assignments
            .get(read_name)
            .copied()
            .unwrap_or(HaplotypeCode::Untagged)
    }

    /// Number of tagged reads
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assign a tagged haplotype to a read. Untagged codes are not stored.
    pub fn insert(&mut self, read_name: impl Into<String>, haplotype: HaplotypeCode) {
        if haplotype.is_tagged() {
            self.assignments.insert(read_name.into(), haplotype);
        }
    }

    /// Iterate over all tagged reads
    pub fn iter(&self) -> impl Iterator<Item = (&str, HaplotypeCode)> {
        self.assignments
            .iter()
            .map(|(name, code)| (name.as_str(), *code))
    }

    /// Drop every read not in `accepted`, returning how many were dropped.
    ///
    /// Dropped reads resolve to `Untagged` afterwards.
    #[allow(clippy::implicit_hasher)]
    pub fn retain_reads(&mut self, accepted: &HashSet<String>) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|name, _| accepted.contains(name));
        before - self.assignments.len()
    }

    /// Ingest a haplotag list file, which may be gzip-compressed
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Io` if the file cannot be read, or any error
    /// from [`AssignmentTable::build`].
    pub fn from_path(
        path: &Path,
        labels: &HaplotypeLabels,
        options: &AssignmentOptions,
    ) -> Result<Assignments, AssignmentError> {
        let reader = open_input(path)?;
        Self::build(reader, labels, options)
    }

    /// Ingest a haplotag list.
    ///
    /// The column layout is detected from the first data line; a leading
    /// `#` line is skipped as a header and blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::MalformedLine` for lines with too few
    /// columns, `AssignmentError::UnknownHaplotypeLabel` for labels missing
    /// from `labels`, `AssignmentError::MissingBlockInfo` if largest-block
    /// filtering is requested on a 2-column list,
    /// `AssignmentError::NoKnownReads` or
    /// `AssignmentError::InconsistentKnownReads` if unknown reads are to be
    /// discarded and the list is empty or repeats read names, and
    /// `AssignmentError::Io` if reading fails.
    pub fn build<R: BufRead>(
        reader: R,
        labels: &HaplotypeLabels,
        options: &AssignmentOptions,
    ) -> Result<Assignments, AssignmentError> {
        if options.only_largest_block {
            debug!(
                "Largest-block filtering requires phaseset and chromosome columns in the haplotag list"
            );
        }

        let mut table = AssignmentTable::default();
        let mut untagged_names: HashSet<String> = HashSet::new();
        let mut block_counts = BlockCounts::new();
        let mut format: Option<ListFormat> = None;
        let mut total_reads = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;

            if i == 0 && line.starts_with('#') {
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let layout = match format {
                Some(layout) => layout,
                None => {
                    let detected = ListFormat::detect(&line).ok_or_else(|| {
                        AssignmentError::MalformedLine {
                            line_number,
                            line: line.trim_end().to_string(),
                            expected_columns: 2,
                        }
                    })?;
                    debug!(format = ?detected, "Detected haplotag list layout");
                    if options.only_largest_block && !detected.has_block_info() {
                        return Err(AssignmentError::MissingBlockInfo);
                    }
                    format = Some(detected);
                    detected
                }
            };

            let entry = layout
                .parse_line(&line, line_number, labels)
                .map_err(|e| {
                    if matches!(e, AssignmentError::UnknownHaplotypeLabel { .. }) {
                        error!("{e}");
                    }
                    e
                })?;
            total_reads += 1;

            if !entry.haplotype.is_tagged() {
                if options.discard_unknown_reads {
                    untagged_names.insert(entry.read_name);
                }
                continue;
            }

            if options.only_largest_block {
                if let (Some(chromosome), Some(phase_set)) = (&entry.chromosome, &entry.phase_set)
                {
                    block_counts.add_read(
                        BlockKey::new(chromosome.as_str(), phase_set.as_str()),
                        &entry.read_name,
                    );
                }
            }
            table.insert(entry.read_name, entry.haplotype);
        }

        let tagged_reads = table.len();
        let mut stats = ListStats {
            total_reads,
            tagged_reads,
            untagged_reads: total_reads - tagged_reads,
            removed_reads: 0,
        };
        info!(reads = stats.total_reads, "Total number of reads in haplotag list");
        info!(reads = stats.tagged_reads, "Total number of haplo-tagged reads");
        info!(reads = stats.untagged_reads, "Total number of untagged reads");

        let known_reads = if options.discard_unknown_reads {
            let known: KnownReads = untagged_names
                .into_iter()
                .chain(table.assignments.keys().cloned())
                .collect();
            if known.is_empty() {
                return Err(AssignmentError::NoKnownReads);
            }
            if known.len() != total_reads {
                return Err(AssignmentError::InconsistentKnownReads {
                    total: total_reads,
                    known: known.len(),
                });
            }
            Some(known)
        } else {
            None
        };

        let mut largest_blocks = Vec::new();
        if options.only_largest_block {
            let selection = select_largest_blocks(&block_counts);
            stats.removed_reads = table.retain_reads(&selection.read_names);
            largest_blocks = selection.blocks;
            info!(
                reads = stats.removed_reads,
                "Number of reads removed / reads not overlapping largest phased blocks"
            );
        }

        Ok(Assignments {
            table,
            known_reads,
            stats,
            largest_blocks,
            format,
        })
    }
}
