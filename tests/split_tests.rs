//! End-to-end tests of the `haplosplit` binary
//!
//! Each test writes a small haplotag list and read file to a temporary
//! directory, runs the binary and inspects the files it produced.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LIST: &str = "#readname\thaplotype\nr1\tH1\nr2\tH2\nr3\tnone\n";

fn fastq_record(name: &str, length: usize) -> String {
    format!("@{name}\n{}\n+\n{}\n", "A".repeat(length), "I".repeat(length))
}

fn write_inputs(dir: &TempDir, list: &str, reads: &[(&str, usize)]) -> (PathBuf, PathBuf) {
    let list_path = dir.path().join("haplotags.tsv");
    fs::write(&list_path, list).unwrap();

    let reads_path = dir.path().join("reads.fastq");
    let fastq: String = reads
        .iter()
        .map(|&(name, length)| fastq_record(name, length))
        .collect();
    fs::write(&reads_path, fastq).unwrap();

    (reads_path, list_path)
}

fn fastq_names(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .step_by(4)
        .map(|line| line.trim_start_matches('@').to_string())
        .collect()
}

fn haplosplit() -> Command {
    Command::cargo_bin("haplosplit").unwrap()
}

#[test]
fn test_split_fastq_all_outputs() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, LIST, &[("r1", 10), ("r2", 20), ("r3", 5), ("r4", 7)]);
    let h1 = dir.path().join("h1.fastq");
    let h2 = dir.path().join("h2.fastq");
    let untagged = dir.path().join("untagged.fastq");
    let histogram = dir.path().join("lengths.tsv");

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-h2")
        .arg(&h2)
        .arg("--output-untagged")
        .arg(&untagged)
        .arg("--read-lengths-histogram")
        .arg(&histogram)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total reads processed: 4"));

    assert_eq!(fastq_names(&h1), vec!["r1"]);
    assert_eq!(fastq_names(&h2), vec!["r2"]);
    assert_eq!(fastq_names(&untagged), vec!["r3", "r4"]);

    assert_eq!(
        fs::read_to_string(&histogram).unwrap(),
        "#length\tcount-untagged\tcount-h1\tcount-h2\n\
         5\t1\t0\t0\n\
         7\t1\t0\t0\n\
         10\t0\t1\t0\n\
         20\t0\t0\t1\n"
    );
}

#[test]
fn test_discard_unknown_reads_stops_early() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(
        &dir,
        LIST,
        &[("r4", 7), ("r1", 10), ("r2", 20), ("r3", 5), ("r5", 9)],
    );
    let untagged = dir.path().join("untagged.fastq");
    let h1 = dir.path().join("h1.fastq");
    let h2 = dir.path().join("h2.fastq");

    let output = haplosplit()
        .args(["--format", "json", "split"])
        .arg(&reads)
        .arg(&list)
        .arg("--output-untagged")
        .arg(&untagged)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-h2")
        .arg(&h2)
        .arg("--discard-unknown-reads")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["reads"]["total_reads"], 4);
    assert_eq!(summary["reads"]["unknown_reads"], 1);
    assert_eq!(summary["reads"]["untagged_reads"], 1);
    assert_eq!(summary["stopped_early"], true);

    assert_eq!(fastq_names(&untagged), vec!["r3"]);
    assert_eq!(fastq_names(&h1), vec!["r1"]);
    assert_eq!(fastq_names(&h2), vec!["r2"]);
}

#[test]
fn test_skipped_reads_do_not_count_towards_early_exit() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(
        &dir,
        LIST,
        &[("r1", 10), ("r2", 20), ("r3", 5), ("r4", 7)],
    );
    let h1 = dir.path().join("h1.fastq");

    let output = haplosplit()
        .args(["--format", "json", "split"])
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--discard-unknown-reads")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["reads"]["total_reads"], 4);
    assert_eq!(summary["reads"]["skipped_reads"], 2);
    assert_eq!(summary["reads"]["unknown_reads"], 1);
    assert_eq!(summary["stopped_early"], false);
    assert_eq!(fastq_names(&h1), vec!["r1"]);
}

#[test]
fn test_add_untagged_to_both_haplotypes() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, LIST, &[("r1", 10), ("r2", 20), ("r3", 5), ("r4", 7)]);
    let h1 = dir.path().join("h1.fastq.gz");
    let h2 = dir.path().join("h2.fastq.gz");

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-h2")
        .arg(&h2)
        .arg("--add-untagged")
        .assert()
        .success();

    let h1_raw = fs::read(&h1).unwrap();
    assert_eq!(&h1_raw[..2], &[0x1f, 0x8b]);

    let decompress = |path: &Path| {
        let mut text = String::new();
        haplosplit::utils::compression::open_input(path)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    };
    assert_eq!(
        decompress(&h1),
        [fastq_record("r1", 10), fastq_record("r3", 5), fastq_record("r4", 7)].concat()
    );
    assert_eq!(
        decompress(&h2),
        [fastq_record("r2", 20), fastq_record("r3", 5), fastq_record("r4", 7)].concat()
    );
}

#[test]
fn test_only_largest_block() {
    let dir = TempDir::new().unwrap();
    let mut list = String::from("#readname\thaplotype\tphaseset\tchromosome\n");
    let mut reads = Vec::new();
    for name in ["a1", "a2", "a3", "a4", "a5"] {
        list.push_str(&format!("{name}\tH1\tA\tchr1\n"));
        reads.push((name, 10));
    }
    for name in ["b1", "b2"] {
        list.push_str(&format!("{name}\tH1\tB\tchr1\n"));
        reads.push((name, 10));
    }
    let (reads, list) = write_inputs(&dir, &list, &reads);
    let h1 = dir.path().join("h1.fastq");
    let untagged = dir.path().join("untagged.fastq");

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-untagged")
        .arg(&untagged)
        .arg("--only-largest-block")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reads outside largest phased blocks: 2",
        ));

    assert_eq!(fastq_names(&h1), vec!["a1", "a2", "a3", "a4", "a5"]);
    assert_eq!(fastq_names(&untagged), vec!["b1", "b2"]);
}

#[test]
fn test_only_largest_block_needs_four_columns() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, LIST, &[("r1", 10)]);
    let h1 = dir.path().join("h1.fastq");

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--only-largest-block")
        .assert()
        .failure()
        .stderr(predicate::str::contains("phaseset"));

    assert!(!h1.exists());
}

#[test]
fn test_unknown_haplotype_label_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, "r1\tH3\n", &[("r1", 10)]);
    let h1 = dir.path().join("h1.fastq");

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .assert()
        .failure()
        .stderr(predicate::str::contains("H3"));

    assert!(!h1.exists());
}

#[test]
fn test_requires_an_output() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, LIST, &[("r1", 10)]);

    haplosplit()
        .arg("split")
        .arg(&reads)
        .arg(&list)
        .assert()
        .failure();
}

#[test]
fn test_unsupported_reads_format() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("haplotags.tsv");
    fs::write(&list, LIST).unwrap();
    let sam = dir.path().join("reads.sam");
    fs::write(&sam, "@HD\tVN:1.6\n").unwrap();

    haplosplit()
        .arg("split")
        .arg(&sam)
        .arg(&list)
        .arg("--output-h1")
        .arg(dir.path().join("h1.bam"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("SAM"));
}

fn write_bam(path: &Path, reads: &[(&str, usize)]) {
    use haplosplit::demux::RecordSink;
    use noodles::sam;
    use noodles::sam::alignment::record_buf::Sequence;
    use noodles::sam::alignment::RecordBuf;

    let mut sink = haplosplit::reads::bam::BamSink::create(path, &sam::Header::default()).unwrap();
    for &(name, length) in reads {
        // No quality scores, as in unaligned long-read BAMs
        let record = RecordBuf::builder()
            .set_name(name)
            .set_sequence(Sequence::from(vec![b'A'; length]))
            .build();
        sink.write_record(&record).unwrap();
    }
    sink.finish().unwrap();
}

fn bam_names(path: &Path) -> Vec<String> {
    let (mut reader, header) = haplosplit::reads::bam::open_reader(path).unwrap();
    haplosplit::reads::bam::read_entries(&mut reader, &header)
        .map(|entry| entry.unwrap().name)
        .collect()
}

#[test]
fn test_split_bam() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("haplotags.tsv");
    fs::write(&list, LIST).unwrap();
    let input = dir.path().join("reads.bam");
    write_bam(&input, &[("r1", 10), ("r2", 20), ("r3", 5), ("r4", 7)]);

    let h1 = dir.path().join("h1.bam");
    let untagged = dir.path().join("untagged.bam");

    haplosplit()
        .arg("split")
        .arg(&input)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-untagged")
        .arg(&untagged)
        .assert()
        .success();

    assert_eq!(bam_names(&h1), vec!["r1"]);
    assert_eq!(bam_names(&untagged), vec!["r3", "r4"]);
}

#[test]
fn test_split_bam_discard_unknown_stops_early() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("haplotags.tsv");
    fs::write(&list, LIST).unwrap();
    let input = dir.path().join("reads.bam");
    write_bam(
        &input,
        &[("r1", 10), ("r4", 7), ("r2", 20), ("r3", 5), ("r5", 9)],
    );

    let h1 = dir.path().join("h1.bam");
    let h2 = dir.path().join("h2.bam");
    let untagged = dir.path().join("untagged.bam");

    let output = haplosplit()
        .args(["--format", "json", "split"])
        .arg(&input)
        .arg(&list)
        .arg("--output-h1")
        .arg(&h1)
        .arg("--output-h2")
        .arg(&h2)
        .arg("--output-untagged")
        .arg(&untagged)
        .arg("--discard-unknown-reads")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["reads"]["total_reads"], 4);
    assert_eq!(summary["reads"]["unknown_reads"], 1);
    assert_eq!(summary["stopped_early"], true);

    // Every output must be a complete BGZF stream after the early exit
    assert_eq!(bam_names(&h1), vec!["r1"]);
    assert_eq!(bam_names(&h2), vec!["r2"]);
    assert_eq!(bam_names(&untagged), vec!["r3"]);
}

#[test]
fn test_tsv_summary_and_stage_timings() {
    let dir = TempDir::new().unwrap();
    let (reads, list) = write_inputs(&dir, LIST, &[("r1", 10), ("r2", 20), ("r3", 5), ("r4", 7)]);

    haplosplit()
        .args(["--format", "tsv", "split"])
        .arg(&reads)
        .arg(&list)
        .arg("--output-h2")
        .arg(dir.path().join("h2.fastq"))
        .arg("--output-untagged")
        .arg(dir.path().join("untagged.fastq"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "total_reads\t4\nuntagged_reads\t2\nh1_reads\t0\nh2_reads\t1\n",
        ))
        .stdout(predicate::str::contains("skipped_reads\t1\n"))
        .stderr(predicate::str::contains("Time for processing haplotag list"))
        .stderr(predicate::str::contains("Time for total initial setup"))
        .stderr(predicate::str::contains("Time for iterating input reads"));
}

#[test]
fn test_blocks_report() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("haplotags.tsv");
    fs::write(
        &list,
        "a1\tH1\tA\tchr1\na2\tH2\tA\tchr1\nb1\tH1\tB\tchr1\nc1\tH2\tC\tchr2\nu1\tnone\tnone\tnone\n",
    )
    .unwrap();

    haplosplit()
        .args(["--format", "tsv", "blocks"])
        .arg(&list)
        .assert()
        .success()
        .stdout("#chromosome\tphaseset\ttagged_reads\nchr1\tA\t2\nchr2\tC\t1\n");
}
