//! Command-line interface for haplosplit.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **split**: Split a BAM/FASTQ file into one file per haplotype
//! - **blocks**: Report the largest phased block per chromosome of a haplotag list
//!
//! ## Usage
//!
//! ```text
//! # Split reads into H1/H2 files using a haplotag list
//! haplosplit split reads.bam haplotags.tsv --output-h1 h1.bam --output-h2 h2.bam
//!
//! # Gzipped FASTQ, untagged reads added to both haplotypes
//! haplosplit split reads.fastq.gz haplotags.tsv.gz \
//!     --output-h1 h1.fastq.gz --output-h2 h2.fastq.gz --add-untagged
//!
//! # Only tag reads of the largest phased block, JSON summary
//! haplosplit --format json split reads.bam haplotags.tsv \
//!     --output-h1 h1.bam --only-largest-block
//!
//! # Inspect the largest phased blocks
//! haplosplit blocks haplotags.tsv
//! ```

use clap::{Parser, Subcommand};

pub mod blocks;
pub mod split;

#[derive(Parser)]
#[command(name = "haplosplit")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Split reads by haplotype using a haplotag list")]
#[command(
    long_about = "haplosplit reads a FASTQ or BAM file and a list of haplotype assignments (such as generated by whatshap haplotag --output-haplotag-list) and writes one FASTQ/BAM per haplotype.\n\nBAM mode is intended for unmapped BAMs (such as provided by PacBio)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format of the run summary
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split reads into one output per haplotype
    Split(split::SplitArgs),

    /// Report the largest phased block per chromosome
    Blocks(blocks::BlocksArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
