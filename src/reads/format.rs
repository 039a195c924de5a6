use std::path::Path;

use crate::reads::ReadsError;
use crate::utils::compression::read_prefix;

const PREFIX_LEN: usize = 16;

const SAM_HEADER_PREFIXES: [&[u8]; 5] = [b"@HD\t", b"@SQ\t", b"@RG\t", b"@PG\t", b"@CO\t"];

/// Supported read file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadsFormat {
    Bam,
    Fastq,
}

/// Check if the path has a FASTQ extension (optionally gzipped)
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_fastq_path(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".gzip"))
        .unwrap_or(&path_str);
    stem.ends_with(".fastq") || stem.ends_with(".fq")
}

/// Classify the (decompressed) first bytes of a read file.
///
/// Returns `Ok(None)` if the content is not recognized.
///
/// # Errors
///
/// Returns `ReadsError::UnsupportedFormat` for CRAM, SAM and VCF content.
pub fn detect_format_from_content(prefix: &[u8]) -> Result<Option<ReadsFormat>, ReadsError> {
    if prefix.starts_with(b"BAM\x01") {
        return Ok(Some(ReadsFormat::Bam));
    }
    if prefix.starts_with(b"CRAM") {
        return Err(ReadsError::UnsupportedFormat("CRAM".to_string()));
    }
    if prefix.starts_with(b"##fileformat=VCF") {
        return Err(ReadsError::UnsupportedFormat("VCF".to_string()));
    }
    if SAM_HEADER_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
        return Err(ReadsError::UnsupportedFormat("SAM".to_string()));
    }
    if prefix.starts_with(b"@") {
        return Ok(Some(ReadsFormat::Fastq));
    }
    Ok(None)
}

/// Detect whether a read file is BAM or FASTQ.
///
/// The content is checked first (gzip and BGZF are decompressed); files
/// that are not recognized fall back to their extension.
///
/// # Errors
///
/// Returns `ReadsError::Io` if the file cannot be read,
/// `ReadsError::UnsupportedFormat` for CRAM, SAM or VCF files, or
/// `ReadsError::UndetectedFormat` if neither content nor extension match.
pub fn detect_reads_format(path: &Path) -> Result<ReadsFormat, ReadsError> {
    let prefix = read_prefix(path, PREFIX_LEN)?;

    if let Some(format) = detect_format_from_content(&prefix)? {
        return Ok(format);
    }

    if is_fastq_path(path) {
        return Ok(ReadsFormat::Fastq);
    }

    Err(ReadsError::UndetectedFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fastq_path() {
        assert!(is_fastq_path(Path::new("reads.fastq")));
        assert!(is_fastq_path(Path::new("reads.fq")));
        assert!(is_fastq_path(Path::new("reads.FASTQ.GZ")));
        assert!(is_fastq_path(Path::new("/data/reads.fq.gzip")));
        assert!(!is_fastq_path(Path::new("reads.bam")));
        assert!(!is_fastq_path(Path::new("reads.fa.gz")));
    }

    #[test]
    fn test_detect_from_content() {
        assert_eq!(
            detect_format_from_content(b"BAM\x01\x00\x00").unwrap(),
            Some(ReadsFormat::Bam)
        );
        assert_eq!(
            detect_format_from_content(b"@read1\nACGT\n+\n").unwrap(),
            Some(ReadsFormat::Fastq)
        );
        assert_eq!(detect_format_from_content(b">chr1\nACGT").unwrap(), None);
        assert_eq!(detect_format_from_content(b"").unwrap(), None);
    }

    #[test]
    fn test_detect_unsupported_content() {
        for content in [
            &b"CRAM\x03\x00"[..],
            &b"##fileformat=VCFv4.2\n"[..],
            &b"@HD\tVN:1.6\n"[..],
        ] {
            assert!(matches!(
                detect_format_from_content(content),
                Err(ReadsError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_detect_gzipped_fastq() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".dat").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"@r1\nACGT\n+\nIIII\n").unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        assert_eq!(detect_reads_format(temp.path()).unwrap(), ReadsFormat::Fastq);
    }

    #[test]
    fn test_empty_file_falls_back_to_extension() {
        let temp = NamedTempFile::with_suffix(".fq").unwrap();
        assert_eq!(detect_reads_format(temp.path()).unwrap(), ReadsFormat::Fastq);

        let temp = NamedTempFile::with_suffix(".txt").unwrap();
        assert!(matches!(
            detect_reads_format(temp.path()),
            Err(ReadsError::UndetectedFormat(_))
        ));
    }
}
