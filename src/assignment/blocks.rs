//! Phased block bookkeeping and largest-block selection.
//!
//! A phased block is identified by its chromosome and phaseset label. While a
//! haplotag list is ingested, every tagged read is counted towards its block;
//! afterwards only the reads of the block with the most tagged reads on each
//! chromosome keep their haplotype.
//!
//! Ties are broken by list order: the block first seen in the haplotag list
//! wins when two blocks on a chromosome have the same number of reads.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Identifies a phased block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockKey {
    pub chromosome: String,
    pub phase_set: String,
}

impl BlockKey {
    pub fn new(chromosome: impl Into<String>, phase_set: impl Into<String>) -> Self {
        Self {
            chromosome: chromosome.into(),
            phase_set: phase_set.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct BlockReads {
    key: BlockKey,
    count: usize,
    read_names: HashSet<String>,
}

/// Tagged read counts per phased block, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct BlockCounts {
    index: HashMap<BlockKey, usize>,
    blocks: Vec<BlockReads>,
}

impl BlockCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tagged read towards a block
    pub fn add_read(&mut self, key: BlockKey, read_name: &str) {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.index.insert(key.clone(), self.blocks.len());
                self.blocks.push(BlockReads {
                    key,
                    count: 0,
                    read_names: HashSet::new(),
                });
                self.blocks.len() - 1
            }
        };
        let block = &mut self.blocks[idx];
        block.count += 1;
        block.read_names.insert(read_name.to_string());
    }

    /// Number of distinct blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// The winning block on one chromosome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargestBlock {
    pub chromosome: String,
    pub phase_set: String,
    pub tagged_reads: usize,
}

/// Result of largest-block selection
#[derive(Debug, Clone, Default)]
pub struct BlockSelection {
    /// Winning block per chromosome, in order of first appearance
    pub blocks: Vec<LargestBlock>,
    /// Union of the read names of all winning blocks
    pub read_names: HashSet<String>,
}

/// Pick the block with the most tagged reads on every chromosome.
///
/// A block only replaces the current leader of its chromosome if its count
/// is strictly higher, so on ties the block seen first wins.
#[must_use]
pub fn select_largest_blocks(counts: &BlockCounts) -> BlockSelection {
    info!(
        blocks = counts.len(),
        "Determining largest blocks/phasesets per chromosome"
    );
    if counts.is_empty() {
        return BlockSelection::default();
    }

    let mut leaders: Vec<usize> = Vec::new();
    let mut by_chromosome: HashMap<&str, usize> = HashMap::new();

    for (idx, block) in counts.blocks.iter().enumerate() {
        match by_chromosome.get(block.key.chromosome.as_str()) {
            Some(&slot) => {
                if block.count > counts.blocks[leaders[slot]].count {
                    leaders[slot] = idx;
                }
            }
            None => {
                by_chromosome.insert(block.key.chromosome.as_str(), leaders.len());
                leaders.push(idx);
            }
        }
    }

    let mut selection = BlockSelection::default();
    for idx in leaders {
        let block = &counts.blocks[idx];
        info!(
            chromosome = %block.key.chromosome,
            phase_set = %block.key.phase_set,
            tagged_reads = block.count,
            "Largest phased block"
        );
        selection.blocks.push(LargestBlock {
            chromosome: block.key.chromosome.clone(),
            phase_set: block.key.phase_set.clone(),
            tagged_reads: block.count,
        });
        selection
            .read_names
            .extend(block.read_names.iter().cloned());
    }

    info!(
        reads = selection.read_names.len(),
        "Total number of haplo-tagged reads in all largest phased blocks"
    );

    selection
}
