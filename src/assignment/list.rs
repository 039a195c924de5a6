use crate::assignment::AssignmentError;
use crate::core::haplotype::{HaplotypeCode, HaplotypeLabels};

/// Column layout of a haplotag list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// read name, haplotype
    TwoColumn,
    /// read name, haplotype, phaseset, chromosome
    FourColumn,
}

impl ListFormat {
    /// Detect the layout from a data line (not the header).
    ///
    /// Returns `None` if the line has fewer than two tab-separated fields.
    #[must_use]
    pub fn detect(line: &str) -> Option<Self> {
        match line.trim().split('\t').count() {
            n if n >= 4 => Some(Self::FourColumn),
            n if n >= 2 => Some(Self::TwoColumn),
            _ => None,
        }
    }

    /// Minimum number of fields a line must carry in this layout
    #[must_use]
    pub const fn columns(self) -> usize {
        match self {
            Self::TwoColumn => 2,
            Self::FourColumn => 4,
        }
    }

    /// Whether phaseset and chromosome are available
    #[must_use]
    pub const fn has_block_info(self) -> bool {
        matches!(self, Self::FourColumn)
    }

    /// Parse one data line into an entry.
    ///
    /// `line_number` is 1-based and only used for error reporting. Columns
    /// beyond the layout's width are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::MalformedLine` if the line is too short for
    /// this layout, or `AssignmentError::UnknownHaplotypeLabel` if the
    /// haplotype label is not in `labels`.
    pub fn parse_line(
        self,
        line: &str,
        line_number: usize,
        labels: &HaplotypeLabels,
    ) -> Result<AssignmentEntry, AssignmentError> {
        let fields: Vec<&str> = line.trim().split('\t').take(self.columns()).collect();
        if fields.len() < self.columns() {
            return Err(AssignmentError::MalformedLine {
                line_number,
                line: line.trim_end().to_string(),
                expected_columns: self.columns(),
            });
        }

        let haplotype =
            labels
                .resolve(fields[1])
                .ok_or_else(|| AssignmentError::UnknownHaplotypeLabel {
                    label: fields[1].to_string(),
                    line_number,
                    expected: labels.expected().into_iter().map(String::from).collect(),
                })?;

        let (phase_set, chromosome) = match self {
            Self::TwoColumn => (None, None),
            Self::FourColumn => (Some(fields[2].to_string()), Some(fields[3].to_string())),
        };

        Ok(AssignmentEntry {
            read_name: fields[0].to_string(),
            haplotype,
            phase_set,
            chromosome,
        })
    }
}

/// One parsed line of a haplotag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEntry {
    pub read_name: String,
    pub haplotype: HaplotypeCode,
    /// Only set for 4-column lists
    pub phase_set: Option<String>,
    /// Only set for 4-column lists
    pub chromosome: Option<String>,
}
