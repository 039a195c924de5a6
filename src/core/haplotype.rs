use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Haplotype bucket a read is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HaplotypeCode {
    /// Read carries no haplotype assignment
    #[default]
    Untagged = 0,
    /// Haplotype 1
    H1 = 1,
    /// Haplotype 2
    H2 = 2,
}

impl HaplotypeCode {
    /// All codes in bucket order (untagged, H1, H2)
    pub const ALL: [HaplotypeCode; 3] = [Self::Untagged, Self::H1, Self::H2];

    /// Bucket index (0 = untagged, 1 = H1, 2 = H2)
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_tagged(self) -> bool {
        !matches!(self, Self::Untagged)
    }
}

impl std::fmt::Display for HaplotypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Untagged => write!(f, "untagged"),
            Self::H1 => write!(f, "H1"),
            Self::H2 => write!(f, "H2"),
        }
    }
}

/// Translation table from haplotag list labels to haplotype codes.
///
/// The table is handed to list ingestion rather than looked up from a
/// global, so callers decide which labels are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaplotypeLabels {
    labels: HashMap<String, HaplotypeCode>,
}

impl HaplotypeLabels {
    /// Build a table from explicit `(label, code)` pairs
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, HaplotypeCode)>,
        S: Into<String>,
    {
        Self {
            labels: pairs.into_iter().map(|(l, c)| (l.into(), c)).collect(),
        }
    }

    /// Look up the code for a label. Labels are case-sensitive.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<HaplotypeCode> {
        self.labels.get(label).copied()
    }

    /// Accepted labels ordered by code, for error messages
    #[must_use]
    pub fn expected(&self) -> Vec<&str> {
        let mut labels: Vec<(&str, HaplotypeCode)> = self
            .labels
            .iter()
            .map(|(label, code)| (label.as_str(), *code))
            .collect();
        labels.sort_by_key(|(label, code)| (code.index(), *label));
        labels.into_iter().map(|(label, _)| label).collect()
    }
}

impl Default for HaplotypeLabels {
    fn default() -> Self {
        Self::new([
            ("none", HaplotypeCode::Untagged),
            ("H1", HaplotypeCode::H1),
            ("H2", HaplotypeCode::H2),
        ])
    }
}
