use std::io;

use tracing::{debug, info};

use crate::assignment::{AssignmentTable, KnownReads};
use crate::core::counters::RunCounters;
use crate::core::haplotype::HaplotypeCode;
use crate::demux::histogram::ReadLengthHistogram;

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// A read pulled from an input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEntry<R> {
    pub name: String,
    pub length: usize,
    /// The original record, handed to sinks untouched
    pub record: R,
}

impl<R> ReadEntry<R> {
    pub fn new(name: impl Into<String>, length: usize, record: R) -> Self {
        Self {
            name: name.into(),
            length,
            record,
        }
    }
}

/// Destination for records of one haplotype bucket
pub trait RecordSink<R> {
    /// Write one record
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    fn write_record(&mut self, record: &R) -> io::Result<()>;
}

impl<R: Clone> RecordSink<R> for Vec<R> {
    fn write_record(&mut self, record: &R) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// A sink that is either backed by a writer or discards everything
#[derive(Debug)]
pub enum OutputSink<S> {
    Active(S),
    Discard,
}

impl<S> OutputSink<S> {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

impl<S> Default for OutputSink<S> {
    fn default() -> Self {
        Self::Discard
    }
}

impl<R, S: RecordSink<R>> RecordSink<R> for OutputSink<S> {
    fn write_record(&mut self, record: &R) -> io::Result<()> {
        match self {
            Self::Active(sink) => sink.write_record(record),
            Self::Discard => Ok(()),
        }
    }
}

/// One sink per haplotype bucket
#[derive(Debug, Default)]
pub struct HaplotypeOutputs<S> {
    pub untagged: S,
    pub h1: S,
    pub h2: S,
}

impl<S> HaplotypeOutputs<S> {
    pub fn get_mut(&mut self, haplotype: HaplotypeCode) -> &mut S {
        match haplotype {
            HaplotypeCode::Untagged => &mut self.untagged,
            HaplotypeCode::H1 => &mut self.h1,
            HaplotypeCode::H2 => &mut self.h2,
        }
    }

    /// Apply `f` to every sink in bucket order, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_for_each<E>(self, mut f: impl FnMut(S) -> Result<(), E>) -> Result<(), E> {
        f(self.untagged)?;
        f(self.h1)?;
        f(self.h2)
    }
}

/// How reads are routed once classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispositionConfig {
    /// Whether reads of each bucket (untagged, H1, H2) are written at all
    pub active: [bool; 3],
    /// Also write untagged reads to the H1 and H2 sinks
    pub add_untagged_to_both: bool,
}

impl DispositionConfig {
    /// Derive the routing from the outputs a caller requested.
    ///
    /// Untagged reads are processed when an untagged output exists or when
    /// they are to be added to both haplotype outputs.
    #[must_use]
    pub fn new(has_untagged: bool, has_h1: bool, has_h2: bool, add_untagged_to_both: bool) -> Self {
        Self {
            active: [has_untagged || add_untagged_to_both, has_h1, has_h2],
            add_untagged_to_both,
        }
    }

    #[must_use]
    pub fn is_active(&self, haplotype: HaplotypeCode) -> bool {
        self.active[haplotype.index()]
    }
}

/// Result of a demultiplexing run
#[derive(Debug, Clone, Default)]
pub struct DemuxOutcome {
    pub counters: RunCounters,
    pub histogram: ReadLengthHistogram,
    /// The stream was abandoned after the last known read was seen
    pub stopped_early: bool,
}

/// Routes reads to haplotype sinks according to an [`AssignmentTable`]
#[derive(Debug, Clone, Copy)]
pub struct Demultiplexer<'a> {
    table: &'a AssignmentTable,
    known_reads: Option<&'a KnownReads>,
    config: DispositionConfig,
}

impl<'a> Demultiplexer<'a> {
    #[must_use]
    pub fn new(table: &'a AssignmentTable, config: DispositionConfig) -> Self {
        Self {
            table,
            known_reads: None,
            config,
        }
    }

    /// Drop reads whose name is not in `known_reads`.
    ///
    /// Once as many reads as there are known names have been written, the
    /// rest of the stream is not read.
    #[must_use]
    pub fn with_known_reads(mut self, known_reads: &'a KnownReads) -> Self {
        self.known_reads = Some(known_reads);
        self
    }

    /// Consume `reads` in order, writing each record to the sink(s) of its
    /// haplotype.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by `reads` or by a sink.
    pub fn run<R, I, S>(
        &self,
        reads: I,
        outputs: &mut HaplotypeOutputs<S>,
    ) -> io::Result<DemuxOutcome>
    where
        I: IntoIterator<Item = io::Result<ReadEntry<R>>>,
        S: RecordSink<R>,
    {
        let mut outcome = DemuxOutcome::default();
        let mut remaining = self.known_reads.map(KnownReads::len);

        for entry in reads {
            let entry = entry?;
            let counters = &mut outcome.counters;
            counters.total_reads += 1;
            if counters.total_reads % PROGRESS_INTERVAL == 0 {
                debug!(reads = counters.total_reads, "Processed reads");
            }

            if let Some(known) = self.known_reads {
                if !known.contains(&entry.name) {
                    counters.unknown_reads += 1;
                    continue;
                }
            }

            let haplotype = self.table.haplotype(&entry.name);
            if !self.config.is_active(haplotype) {
                counters.skipped_reads += 1;
                continue;
            }

            outcome.histogram.record(haplotype, entry.length);
            counters.increment_bucket(haplotype);
            outputs.get_mut(haplotype).write_record(&entry.record)?;

            if haplotype == HaplotypeCode::Untagged && self.config.add_untagged_to_both {
                outputs.h1.write_record(&entry.record)?;
                outputs.h2.write_record(&entry.record)?;
            }

            if let Some(remaining) = remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    info!("All known reads processed - cancel processing");
                    outcome.stopped_early = true;
                    break;
                }
            }
        }

        Ok(outcome)
    }
}
