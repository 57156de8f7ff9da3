//!
//! Renders the words of a block as text. There are two formats:
//! - [MIF](mif), the Memory Initialization File Quartus reads for synthesis
//! - [hex](hex), one word per line, as read by Verilog's `$readmemh` in simulation
//!

use crate::config::{BlockType, Config, OutputMode, WordSize};
use crate::error::{Action, Error};
use crate::partition::Block;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::time::SystemTime;

pub mod hex;
pub mod mif;

pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Problems found while reading back a generated file
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("No CONTENT/BEGIN section found")]
    MissingContent,

    #[error("CONTENT section is not terminated by END;")]
    MissingEnd,

    #[error("Malformed line {line}: '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("Line {line}: expected address {expected:04X}, found {found:04X}")]
    UnexpectedAddress {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Free-form information written at the top of MIF files. Nothing reads it back.
#[derive(Debug, Clone)]
pub struct Header {
    /// `None` for the single-file output
    pub block: Option<usize>,
    pub size_bytes: usize,
    pub word_count: usize,
    pub word_size: WordSize,
    pub block_type: BlockType,
    pub fill_pattern: u32,
    pub generated: SystemTime,
}

impl Header {
    pub fn new(block: &Block, config: &Config) -> Self {
        Self {
            block: (!config.single_file).then_some(block.index),
            size_bytes: block.size,
            word_count: block.word_count(config.word_size),
            word_size: config.word_size,
            block_type: config.block_type,
            fill_pattern: config.fill_pattern,
            generated: SystemTime::now(),
        }
    }
}

/// Writes `words` to `w` in the given format
pub fn render<W, I>(w: &mut W, mode: OutputMode, header: &Header, words: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = u32>,
{
    match mode {
        OutputMode::Structured => mif::write(w, header, words),
        OutputMode::HexStream => hex::write(w, words),
    }
}

/// Creates the block's file and writes `words` into it
pub fn emit<I>(block: &Block, config: &Config, words: I) -> Result<(), Error>
where
    I: IntoIterator<Item = u32>,
{
    let file = fs::File::create(&block.path)
        .map_err(|e| Error::io(Action::CreateOutput, &block.path, e))?;
    let mut w = BufWriter::new(file);

    let header = Header::new(block, config);
    render(&mut w, config.output_mode, &header, words)
        .and_then(|_| w.flush())
        .map_err(|e| Error::io(Action::WriteOutput, &block.path, e))
}
