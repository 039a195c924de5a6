use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use crate::assignment::{AssignmentOptions, AssignmentTable, LargestBlock};
use crate::cli::OutputFormat;
use crate::core::haplotype::HaplotypeLabels;

#[derive(Args)]
pub struct BlocksArgs {
    /// 4-column haplotag list (readname, haplotype, phaseset, chromosome),
    /// can be gzipped
    #[arg(value_name = "LIST")]
    pub list: PathBuf,
}

#[derive(Serialize)]
struct BlocksReport<'a> {
    tagged_reads: usize,
    reads_in_largest_blocks: usize,
    blocks: &'a [LargestBlock],
}

/// Execute blocks subcommand
///
/// # Errors
///
/// Returns an error if the haplotag list cannot be read or lacks phaseset
/// and chromosome columns.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BlocksArgs, format: OutputFormat) -> anyhow::Result<()> {
    let options = AssignmentOptions {
        only_largest_block: true,
        discard_unknown_reads: false,
    };
    let assignments = AssignmentTable::from_path(&args.list, &HaplotypeLabels::default(), &options)
        .with_context(|| format!("Failed to process haplotag list {}", args.list.display()))?;

    let report = BlocksReport {
        tagged_reads: assignments.stats.tagged_reads,
        reads_in_largest_blocks: assignments.table.len(),
        blocks: &assignments.largest_blocks,
    };

    match format {
        OutputFormat::Text => {
            if report.blocks.is_empty() {
                println!("No haplo-tagged reads in {}", args.list.display());
                return Ok(());
            }
            for block in report.blocks {
                println!(
                    "Chromosome: {} - Phaseset: {} - Tagged reads: {}",
                    block.chromosome, block.phase_set, block.tagged_reads
                );
            }
            println!(
                "\n{} of {} haplo-tagged reads are in the largest phased blocks",
                report.reads_in_largest_blocks, report.tagged_reads
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => {
            println!("#chromosome\tphaseset\ttagged_reads");
            for block in report.blocks {
                println!(
                    "{}\t{}\t{}",
                    block.chromosome, block.phase_set, block.tagged_reads
                );
            }
        }
    }

    Ok(())
}
