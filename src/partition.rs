//!
//! Splits the output address space into blocks. Each block becomes one output file.
//!

use crate::config::{Config, OutputNaming, WordSize};
use std::ops::Range;
use std::path::PathBuf;

/// A contiguous slice `[start, start + size)` of the output address space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: usize,
    pub start: usize,
    pub size: usize,
    pub path: PathBuf,
}

impl Block {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.size
    }

    /// Number of whole words in the block. A trailing partial word is dropped.
    pub fn word_count(&self, word_size: WordSize) -> usize {
        self.size / word_size.bytes()
    }
}

/// Computes the blocks covering the output, in increasing index order
pub fn partition(config: &Config) -> Vec<Block> {
    match &config.output {
        OutputNaming::Verbatim(path) => vec![Block {
            index: 0,
            start: 0,
            size: config.total_size,
            path: path.clone(),
        }],

        OutputNaming::Template(template) => (0..config.total_blocks)
            .map(|index| Block {
                index,
                start: index * config.block_size,
                size: config.block_size,
                path: template.render(index),
            })
            .collect(),
    }
}
