use owo_colors::OwoColorize;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Problems with the filename pattern given to `--output`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Pattern '{}' has more than one integer placeholder", .0.bright_yellow())]
    MultiplePlaceholders(String),

    #[error("Pattern '{}' has no integer placeholder (e.g. {}), so every block would overwrite the same file", .0.bright_yellow(), "%02d".bright_blue())]
    MissingPlaceholder(String),

    #[error("Unsupported conversion '%{}' in pattern '{}', only {} is allowed", .conversion.bright_yellow(), .pattern, "%d".bright_blue())]
    UnsupportedConversion { pattern: String, conversion: char },

    #[error("Placeholder width in pattern '{}' is larger than {}", .0.bright_yellow(), crate::template::MAX_WIDTH)]
    WidthTooLarge(String),

    #[error("Pattern '{}' ends with an unfinished '%' placeholder", .0.bright_yellow())]
    Unterminated(String),
}

/// Any option value that doesn't make sense. Always detected before the input is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No input file given (use {})", "-i <FILE>".bright_blue())]
    MissingInput,

    #[error("No output pattern given (use {})", "-o <PATTERN>".bright_blue())]
    MissingOutput,

    #[error("Invalid word size: {} (must be 8, 16, or 32)", .0.bright_yellow())]
    InvalidWordSize(u32),

    #[error("Invalid block size: {} (must be positive)", .0.bright_yellow())]
    InvalidBlockSize(usize),

    #[error("Invalid total size: {} (must be positive)", .0.bright_yellow())]
    InvalidTotalSize(usize),

    #[error("Invalid max blocks: {} (must be 1-{max})", .requested.bright_yellow())]
    InvalidMaxBlocks { requested: usize, max: usize },

    #[error("Invalid total blocks: {} (must be 1-{max})", .requested.bright_yellow())]
    InvalidTotalBlocks { requested: usize, max: usize },

    #[error("{total_blocks} blocks of {block_size} bytes do not fit in the address space")]
    AddressSpaceOverflow {
        total_blocks: usize,
        block_size: usize,
    },

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("Could not read config file '{}': {source}", .path.display().bright_yellow())]
    ConfigFileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse config file '{}': {source}", .path.display().bright_yellow())]
    ConfigFileSyntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Also carries `--help` and `--version`, which aren't failures
    #[error("{0}")]
    CommandLine(#[source] clap::Error),
}

/// What we were doing with a file when the I/O failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenInput,
    ReadInput,
    CreateOutput,
    WriteOutput,
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Action::OpenInput => "open input file",
            Action::ReadInput => "read input file",
            Action::CreateOutput => "create output file",
            Action::WriteOutput => "write output file",
        }
    }
}

/// Represents any failure of a conversion run. None of them are recoverable.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Cannot {} '{}': {source}", .action.describe(), .path.display().bright_yellow())]
    Io {
        action: Action,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read complete file '{}': expected {expected} bytes, got {read}", .path.display().bright_yellow())]
    Read {
        path: PathBuf,
        expected: u64,
        read: u64,
    },

    #[error("{err}\n   {}: while generating block {index}", "[block]".bright_yellow())]
    InBlock { index: usize, err: Box<Error> },
}

impl Error {
    pub fn io(action: Action, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn in_block(self, index: usize) -> Self {
        match self {
            Error::InBlock { err, .. } => Error::InBlock { index, err },
            _ => Error::InBlock {
                index,
                err: Box::new(self),
            },
        }
    }

    /// The kind of error, ignoring any block context around it
    pub fn root(&self) -> &Error {
        match self {
            Error::InBlock { err, .. } => err.root(),
            _ => self,
        }
    }
}

impl From<TemplateError> for Error {
    fn from(err: TemplateError) -> Self {
        Error::InvalidConfig(err.into())
    }
}
