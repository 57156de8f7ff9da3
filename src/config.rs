use crate::error::ConfigError;
use crate::template::FilenameTemplate;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BLOCK_SIZE: usize = 512;
pub const DEFAULT_WORD_SIZE: u32 = 32;
/// Hard limit on the number of output blocks, regardless of `--max-blocks`
pub const MAX_BLOCKS: usize = 128;
/// 48KB ÷ 512 bytes
pub const DEFAULT_TOTAL_BLOCKS: usize = 96;
pub const DEFAULT_TOTAL_SIZE: usize = 49152;
/// RISC-V `nop` (`addi x0, x0, 0`)
pub const DEFAULT_FILL_PATTERN: u32 = 0x0000_0013;

/// Width of a memory word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSize {
    Byte,
    Half,
    Word,
}

impl WordSize {
    pub fn bits(self) -> u32 {
        match self {
            WordSize::Byte => 8,
            WordSize::Half => 16,
            WordSize::Word => 32,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    pub fn mask(self) -> u32 {
        match self {
            WordSize::Byte => 0xFF,
            WordSize::Half => 0xFFFF,
            WordSize::Word => 0xFFFF_FFFF,
        }
    }
}

impl TryFrom<u32> for WordSize {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(WordSize::Byte),
            16 => Ok(WordSize::Half),
            32 => Ok(WordSize::Word),
            _ => Err(ConfigError::InvalidWordSize(bits)),
        }
    }
}

/// The kind of FPGA block RAM the blocks are meant for. Only recorded in the MIF header.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    M4k,
    M9k,
    M144k,
}

impl BlockType {
    pub fn name(self) -> &'static str {
        match self {
            BlockType::M4k => "m4k",
            BlockType::M9k => "m9k",
            BlockType::M144k => "m144k",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// MIF: header, `DEPTH`/`WIDTH` and `ADDR : DATA;` lines
    #[default]
    Structured,
    /// One 8-digit hex word per line, readable by `$readmemh`
    HexStream,
}

/// Where the output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNaming {
    /// Single-file mode: the pattern is the path
    Verbatim(PathBuf),
    Template(FilenameTemplate),
}

/// Parses integers the way `strtoul(s, NULL, 0)` would: `0x` for hex, a leading `0` for octal
pub fn parse_int(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    u32::from_str_radix(digits, radix).map_err(|e| format!("'{s}' is not a valid integer: {e}"))
}

#[derive(Parser, Deserialize, Debug, Default)]
#[command(author, version, about)]
#[serde(default, rename_all = "kebab-case")]
pub struct OptionalConfig {
    /// Input binary file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output pattern (e.g. firmware_%02d.mif). Used verbatim with --single-mif
    #[arg(short, long, value_name = "PATTERN")]
    pub output: Option<String>,

    /// Block size in bytes. Defaults to 512
    #[arg(short = 's', long)]
    pub block_size: Option<usize>,

    /// Block RAM type, recorded in the MIF header. Defaults to m4k
    #[arg(short = 't', long, value_enum)]
    pub block_type: Option<BlockType>,

    /// Word size in bits: 8, 16 or 32. Defaults to 32
    #[arg(short, long)]
    pub word_size: Option<u32>,

    /// Maximum number of blocks, at most 128. Defaults to 128
    #[arg(short, long)]
    pub max_blocks: Option<usize>,

    /// Number of output blocks. Defaults to 96
    #[arg(long)]
    pub total_blocks: Option<usize>,

    /// Total memory size in bytes, used with --single-mif. Defaults to 49152
    #[arg(long)]
    pub total_size: Option<usize>,

    /// Fill pattern for addresses past the end of the input. Defaults to 0x00000013
    #[arg(long, value_parser = parse_int)]
    pub fill_pattern: Option<u32>,

    /// Output simple hex format for simulation (compatible with $readmemh)
    #[arg(long)]
    pub hex: bool,

    /// Generate a single complete MIF file instead of blocks
    #[arg(long)]
    pub single_mif: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Read options from a TOML file. Command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl OptionalConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileIo {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ConfigFileSyntax {
            path: path.to_owned(),
            source,
        })
    }

    /// Fills in whatever `self` doesn't have with `rhs`'s values
    pub fn merge(self, rhs: Self) -> Self {
        Self {
            input: self.input.or(rhs.input),
            output: self.output.or(rhs.output),
            block_size: self.block_size.or(rhs.block_size),
            block_type: self.block_type.or(rhs.block_type),
            word_size: self.word_size.or(rhs.word_size),
            max_blocks: self.max_blocks.or(rhs.max_blocks),
            total_blocks: self.total_blocks.or(rhs.total_blocks),
            total_size: self.total_size.or(rhs.total_size),
            fill_pattern: self.fill_pattern.or(rhs.fill_pattern),
            hex: self.hex || rhs.hex,
            single_mif: self.single_mif || rhs.single_mif,
            verbose: self.verbose || rhs.verbose,
            config: self.config.or(rhs.config),
        }
    }

    /// Merges in the `--config` file, if one was given
    pub fn with_config_file(self) -> Result<Self, ConfigError> {
        match &self.config {
            Some(path) => {
                let file = Self::from_toml_file(path)?;
                Ok(self.merge(file))
            }
            None => Ok(self),
        }
    }
}

/// A validated configuration. Read-only once built.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: OutputNaming,
    pub block_size: usize,
    pub block_type: BlockType,
    pub word_size: WordSize,
    pub max_blocks: usize,
    pub total_blocks: usize,
    pub total_size: usize,
    pub fill_pattern: u32,
    pub output_mode: OutputMode,
    pub single_file: bool,
    pub verbose: bool,
}

impl TryFrom<OptionalConfig> for Config {
    type Error = ConfigError;

    fn try_from(config: OptionalConfig) -> Result<Self, Self::Error> {
        let input = config.input.ok_or(ConfigError::MissingInput)?;
        let pattern = config.output.ok_or(ConfigError::MissingOutput)?;

        let word_size = WordSize::try_from(config.word_size.unwrap_or(DEFAULT_WORD_SIZE))?;

        let block_size = config.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        if block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(block_size));
        }

        let total_size = config.total_size.unwrap_or(DEFAULT_TOTAL_SIZE);
        if total_size == 0 {
            return Err(ConfigError::InvalidTotalSize(total_size));
        }

        let max_blocks = config.max_blocks.unwrap_or(MAX_BLOCKS);
        if !(1..=MAX_BLOCKS).contains(&max_blocks) {
            return Err(ConfigError::InvalidMaxBlocks {
                requested: max_blocks,
                max: MAX_BLOCKS,
            });
        }

        let total_blocks = config.total_blocks.unwrap_or(DEFAULT_TOTAL_BLOCKS);
        if !(1..=max_blocks).contains(&total_blocks) {
            return Err(ConfigError::InvalidTotalBlocks {
                requested: total_blocks,
                max: max_blocks,
            });
        }

        if total_blocks.checked_mul(block_size).is_none() {
            return Err(ConfigError::AddressSpaceOverflow {
                total_blocks,
                block_size,
            });
        }

        let single_file = config.single_mif;
        let output = if single_file {
            OutputNaming::Verbatim(PathBuf::from(pattern))
        } else {
            OutputNaming::Template(FilenameTemplate::parse_indexed(&pattern)?)
        };

        Ok(Self {
            input,
            output,
            block_size,
            block_type: config.block_type.unwrap_or_default(),
            word_size,
            max_blocks,
            total_blocks,
            total_size,
            fill_pattern: config.fill_pattern.unwrap_or(DEFAULT_FILL_PATTERN),
            output_mode: if config.hex {
                OutputMode::HexStream
            } else {
                OutputMode::Structured
            },
            single_file,
            verbose: config.verbose,
        })
    }
}

impl Config {
    /// Reads the command line (and the `--config` file, if any) and validates the result
    pub fn get() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        OptionalConfig::try_parse_from(args)
            .map_err(ConfigError::CommandLine)?
            .with_config_file()?
            .try_into()
    }

    /// The fill pattern, truncated to the word size
    pub fn masked_fill(&self) -> u32 {
        self.fill_pattern & self.word_size.mask()
    }

    /// Size in bytes of the address space covered by the output
    pub fn address_space(&self) -> usize {
        if self.single_file {
            self.total_size
        } else {
            self.total_blocks * self.block_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> OptionalConfig {
        OptionalConfig {
            input: Some("firmware.bin".into()),
            output: Some("firmware_%02d.mif".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::try_from(base()).unwrap();
        assert_eq!(config.block_size, 512);
        assert_eq!(config.word_size, WordSize::Word);
        assert_eq!(config.total_blocks, 96);
        assert_eq!(config.total_size, 49152);
        assert_eq!(config.max_blocks, 128);
        assert_eq!(config.fill_pattern, 0x13);
        assert_eq!(config.block_type, BlockType::M4k);
        assert_eq!(config.output_mode, OutputMode::Structured);
        assert!(!config.single_file);
        assert_eq!(config.address_space(), 49152);
    }

    #[test]
    fn test_too_many_blocks() {
        let config = OptionalConfig {
            total_blocks: Some(200),
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::InvalidTotalBlocks {
                requested: 200,
                max: 128
            })
        ));

        let config = OptionalConfig {
            total_blocks: Some(0),
            ..base()
        };
        assert!(Config::try_from(config).is_err());
    }

    #[test]
    fn test_total_blocks_respects_max_blocks() {
        let config = OptionalConfig {
            max_blocks: Some(8),
            total_blocks: Some(9),
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::InvalidTotalBlocks { requested: 9, max: 8 })
        ));

        let config = OptionalConfig {
            max_blocks: Some(129),
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::InvalidMaxBlocks { .. })
        ));
    }

    #[test]
    fn test_word_sizes() {
        for (bits, size) in [(8, WordSize::Byte), (16, WordSize::Half), (32, WordSize::Word)] {
            let config = OptionalConfig {
                word_size: Some(bits),
                ..base()
            };
            assert_eq!(Config::try_from(config).unwrap().word_size, size);
        }

        let config = OptionalConfig {
            word_size: Some(24),
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::InvalidWordSize(24))
        ));
    }

    #[test]
    fn test_output_naming() {
        let config = OptionalConfig {
            output: Some("firmware.mif".into()),
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::Template(_))
        ));

        let config = OptionalConfig {
            output: Some("firmware_%02d.mif".into()),
            single_mif: true,
            ..base()
        };
        assert_eq!(
            Config::try_from(config).unwrap().output,
            OutputNaming::Verbatim("firmware_%02d.mif".into())
        );
    }

    #[test]
    fn test_missing_required() {
        let config = OptionalConfig {
            input: None,
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::MissingInput)
        ));

        let config = OptionalConfig {
            output: None,
            ..base()
        };
        assert!(matches!(
            Config::try_from(config),
            Err(ConfigError::MissingOutput)
        ));
    }

    #[test]
    fn test_masked_fill() {
        let config = OptionalConfig {
            word_size: Some(8),
            fill_pattern: Some(0xDEAD_BEEF),
            ..base()
        };
        assert_eq!(Config::try_from(config).unwrap().masked_fill(), 0xEF);

        let config = OptionalConfig {
            word_size: Some(16),
            fill_pattern: Some(0xDEAD_BEEF),
            ..base()
        };
        assert_eq!(Config::try_from(config).unwrap().masked_fill(), 0xBEEF);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("0x13"), Ok(0x13));
        assert_eq!(parse_int("0XdeadBEEF"), Ok(0xDEAD_BEEF));
        assert_eq!(parse_int("19"), Ok(19));
        assert_eq!(parse_int("017"), Ok(15));
        assert_eq!(parse_int("0"), Ok(0));
        assert!(parse_int("0x").is_err());
        assert!(parse_int("nop").is_err());
    }

    #[test]
    fn test_command_line() {
        let config = Config::from_args([
            "bin2mif",
            "-i",
            "fw.bin",
            "-o",
            "out.hex",
            "--single-mif",
            "--hex",
            "-w",
            "16",
            "--total-size",
            "1024",
            "--fill-pattern",
            "0xFFFF",
        ])
        .unwrap();
        assert_eq!(config.input, PathBuf::from("fw.bin"));
        assert!(config.single_file);
        assert_eq!(config.output_mode, OutputMode::HexStream);
        assert_eq!(config.word_size, WordSize::Half);
        assert_eq!(config.total_size, 1024);
        assert_eq!(config.fill_pattern, 0xFFFF);

        assert!(matches!(
            Config::from_args(["bin2mif", "-i", "fw.bin", "-o", "o_%d", "--total-blocks", "x"]),
            Err(ConfigError::CommandLine(e)) if e.use_stderr()
        ));
    }

    #[test]
    fn test_help_and_version_are_returned() {
        for (flag, kind) in [
            ("--help", clap::error::ErrorKind::DisplayHelp),
            ("--version", clap::error::ErrorKind::DisplayVersion),
        ] {
            match Config::from_args(["bin2mif", flag]) {
                Err(ConfigError::CommandLine(e)) => {
                    assert_eq!(e.kind(), kind);
                    assert!(!e.use_stderr());
                }
                other => panic!("{flag} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_toml_merge() {
        let file: OptionalConfig = toml::from_str(
            r#"
            output = "from_file_%d.mif"
            block-size = 256
            block-type = "m9k"
            fill-pattern = 0xAA
            hex = true
            "#,
        )
        .unwrap();

        let args = OptionalConfig {
            input: Some("fw.bin".into()),
            block_size: Some(1024),
            ..Default::default()
        };

        let config = Config::try_from(args.merge(file)).unwrap();
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.block_type, BlockType::M9k);
        assert_eq!(config.fill_pattern, 0xAA);
        assert_eq!(config.output_mode, OutputMode::HexStream);
        assert_eq!(
            config.output,
            OutputNaming::Template(FilenameTemplate::parse("from_file_%d.mif").unwrap())
        );
    }
}
