use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgGroup, Args};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assignment::{AssignmentOptions, AssignmentTable, Assignments, LargestBlock, ListStats};
use crate::cli::OutputFormat;
use crate::core::counters::RunCounters;
use crate::core::haplotype::{HaplotypeCode, HaplotypeLabels};
use crate::demux::{
    DemuxOutcome, Demultiplexer, DispositionConfig, HaplotypeOutputs, OutputSink, ReadLengthHistogram,
};
use crate::reads::{self, detect_reads_format, ReadsFormat};
use crate::utils::compression::OutputStream;

#[derive(Args)]
#[command(group(
    ArgGroup::new("outputs")
        .required(true)
        .multiple(true)
        .args(["output_h1", "output_h2", "output_untagged"])
))]
pub struct SplitArgs {
    /// Input FASTQ/BAM file with reads (FASTQ can be gzipped)
    #[arg(value_name = "READS")]
    pub reads: PathBuf,

    /// Tab-separated list with (at least) two columns <readname> and <haplotype>
    /// (can be gzipped). Haplotypes have to be named H1 and H2 (or none). The
    /// 4-column output of "whatshap haplotag" (adding phaseset and chromosome)
    /// is required for --only-largest-block.
    #[arg(value_name = "LIST")]
    pub list: PathBuf,

    /// Output file to write reads from haplotype 1 to. Use ending .gz to
    /// create gzipped FASTQ.
    #[arg(long)]
    pub output_h1: Option<PathBuf>,

    /// Output file to write reads from haplotype 2 to. Use ending .gz to
    /// create gzipped FASTQ.
    #[arg(long)]
    pub output_h2: Option<PathBuf>,

    /// Output file to write untagged reads to. Use ending .gz to create
    /// gzipped FASTQ.
    #[arg(long)]
    pub output_untagged: Option<PathBuf>,

    /// Add reads without tag to both H1 and H2 output streams
    #[arg(long)]
    pub add_untagged: bool,

    /// Only consider reads to be tagged if they belong to the largest phased
    /// block (in terms of read count) on their respective chromosome
    #[arg(long)]
    pub only_largest_block: bool,

    /// Only check the haplotype of reads listed in the haplotag list file.
    /// Reads not contained in this file are discarded instead of being
    /// treated as untagged. Read names must match between the reads file and
    /// the haplotag list.
    #[arg(long)]
    pub discard_unknown_reads: bool,

    /// Output file to write read lengths histogram to in tab separated format
    #[arg(long, value_name = "PATH")]
    pub read_lengths_histogram: Option<PathBuf>,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<ReadsFormat>,
}

#[derive(Serialize)]
struct SplitSummary<'a> {
    list: &'a ListStats,
    reads: &'a RunCounters,
    stopped_early: bool,
    #[serde(skip_serializing_if = "no_blocks")]
    largest_blocks: &'a [LargestBlock],
}

fn no_blocks(blocks: &&[LargestBlock]) -> bool {
    blocks.is_empty()
}

/// Execute split subcommand
///
/// # Errors
///
/// Returns an error if the haplotag list is invalid, the reads cannot be
/// read, or an output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SplitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let run_start = Instant::now();

    let options = AssignmentOptions {
        only_largest_block: args.only_largest_block,
        discard_unknown_reads: args.discard_unknown_reads,
    };
    let list_start = Instant::now();
    let assignments =
        AssignmentTable::from_path(&args.list, &HaplotypeLabels::default(), &options)
            .with_context(|| format!("Failed to process haplotag list {}", args.list.display()))?;
    info!(
        seconds = list_start.elapsed().as_secs_f64(),
        "Time for processing haplotag list"
    );
    if let Some(list_format) = assignments.format {
        debug!(columns = list_format.columns(), "Haplotag list format");
    }

    if args.discard_unknown_reads {
        debug!("Discarding all reads that are not part of the haplotag list");
    }

    let reads_format = match args.input_format {
        Some(format) => format,
        None => detect_reads_format(&args.reads)
            .with_context(|| format!("Failed to read {}", args.reads.display()))?,
    };
    debug!(format = ?reads_format, "Input reads format");

    let config = DispositionConfig::new(
        args.output_untagged.is_some(),
        args.output_h1.is_some(),
        args.output_h2.is_some(),
        args.add_untagged,
    );
    let demux = demultiplexer(&assignments, config);

    let outcome = match reads_format {
        ReadsFormat::Bam => split_bam(&args, &demux, run_start)?,
        ReadsFormat::Fastq => split_fastq(&args, &demux, run_start)?,
    };

    if let Some(path) = &args.read_lengths_histogram {
        let histogram_start = Instant::now();
        write_histogram(path, &outcome.histogram)
            .with_context(|| format!("Failed to write histogram {}", path.display()))?;
        info!(
            seconds = histogram_start.elapsed().as_secs_f64(),
            "Time for creating histogram output"
        );
    }

    if outcome.counters.total_reads == 0 {
        warn!("No reads found in {}", args.reads.display());
    }

    let summary = SplitSummary {
        list: &assignments.stats,
        reads: &outcome.counters,
        stopped_early: outcome.stopped_early,
        largest_blocks: &assignments.largest_blocks,
    };
    print_summary(&summary, format)?;

    info!(
        seconds = run_start.elapsed().as_secs_f64(),
        "Total run time"
    );

    Ok(())
}

fn demultiplexer(assignments: &Assignments, config: DispositionConfig) -> Demultiplexer<'_> {
    let demux = Demultiplexer::new(&assignments.table, config);
    match &assignments.known_reads {
        Some(known) => demux.with_known_reads(known),
        None => demux,
    }
}

fn split_bam(
    args: &SplitArgs,
    demux: &Demultiplexer<'_>,
    run_start: Instant,
) -> anyhow::Result<DemuxOutcome> {
    let (mut reader, header) = reads::bam::open_reader(&args.reads)
        .with_context(|| format!("Failed to open BAM file {}", args.reads.display()))?;
    let create = |path: &Path| reads::bam::BamSink::create(path, &header);

    let mut outputs = HaplotypeOutputs {
        untagged: open_output(args.output_untagged.as_deref(), create)?,
        h1: open_output(args.output_h1.as_deref(), create)?,
        h2: open_output(args.output_h2.as_deref(), create)?,
    };

    log_setup_time(run_start);

    let reads_start = Instant::now();
    let outcome = demux
        .run(reads::bam::read_entries(&mut reader, &header), &mut outputs)
        .with_context(|| format!("Failed to split {}", args.reads.display()))?;

    outputs.try_for_each(|sink| match sink {
        OutputSink::Active(sink) => sink.finish(),
        OutputSink::Discard => Ok(()),
    })?;
    info!(
        seconds = reads_start.elapsed().as_secs_f64(),
        "Time for iterating input reads"
    );

    Ok(outcome)
}

fn split_fastq(
    args: &SplitArgs,
    demux: &Demultiplexer<'_>,
    run_start: Instant,
) -> anyhow::Result<DemuxOutcome> {
    let mut reader = reads::fastq::open_reader(&args.reads)
        .with_context(|| format!("Failed to open FASTQ file {}", args.reads.display()))?;
    let create = reads::fastq::FastqSink::create;

    let mut outputs = HaplotypeOutputs {
        untagged: open_output(args.output_untagged.as_deref(), create)?,
        h1: open_output(args.output_h1.as_deref(), create)?,
        h2: open_output(args.output_h2.as_deref(), create)?,
    };

    log_setup_time(run_start);

    let reads_start = Instant::now();
    let outcome = demux
        .run(reads::fastq::read_entries(&mut reader), &mut outputs)
        .with_context(|| format!("Failed to split {}", args.reads.display()))?;

    outputs.try_for_each(|sink| match sink {
        OutputSink::Active(sink) => sink.finish(),
        OutputSink::Discard => Ok(()),
    })?;
    info!(
        seconds = reads_start.elapsed().as_secs_f64(),
        "Time for iterating input reads"
    );

    Ok(outcome)
}

fn log_setup_time(run_start: Instant) {
    info!(
        seconds = run_start.elapsed().as_secs_f64(),
        "Time for total initial setup"
    );
}

fn open_output<S>(
    path: Option<&Path>,
    create: impl Fn(&Path) -> io::Result<S>,
) -> anyhow::Result<OutputSink<S>> {
    match path {
        Some(path) => create(path)
            .map(OutputSink::Active)
            .with_context(|| format!("Failed to create output file {}", path.display())),
        None => Ok(OutputSink::Discard),
    }
}

fn write_histogram(path: &Path, histogram: &ReadLengthHistogram) -> io::Result<()> {
    let mut stream = OutputStream::create(path)?;
    histogram.write_tsv(&mut stream)?;
    stream.finish()
}

fn print_summary(summary: &SplitSummary<'_>, format: OutputFormat) -> anyhow::Result<()> {
    let reads = summary.reads;
    match format {
        OutputFormat::Text => {
            println!("== SUMMARY ==");
            println!("Reads in haplotag list: {}", summary.list.total_reads);
            println!("Haplo-tagged reads in list: {}", summary.list.tagged_reads);
            if !summary.largest_blocks.is_empty() {
                println!(
                    "Reads outside largest phased blocks: {}",
                    summary.list.removed_reads
                );
            }
            println!("Total reads processed: {}", reads.total_reads);
            for code in HaplotypeCode::ALL {
                println!("Number of output reads {code}: {}", reads.bucket(code));
            }
            println!("Number of unknown (dropped) reads: {}", reads.unknown_reads);
            println!(
                "Number of skipped reads (per user request): {}",
                reads.skipped_reads
            );
            if summary.stopped_early {
                println!("Stopped after all known reads were processed");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Tsv => {
            println!("#metric\tvalue");
            println!("list_total_reads\t{}", summary.list.total_reads);
            println!("list_tagged_reads\t{}", summary.list.tagged_reads);
            println!("list_untagged_reads\t{}", summary.list.untagged_reads);
            println!("list_removed_reads\t{}", summary.list.removed_reads);
            println!("total_reads\t{}", reads.total_reads);
            for code in HaplotypeCode::ALL {
                let name = code.to_string().to_lowercase();
                println!("{name}_reads\t{}", reads.bucket(code));
            }
            println!("unknown_reads\t{}", reads.unknown_reads);
            println!("skipped_reads\t{}", reads.skipped_reads);
            println!("stopped_early\t{}", summary.stopped_early);
        }
    }
    Ok(())
}
