//!
//! bin2mif turns a raw firmware binary into memory-initialization files for an FPGA soft core.
//! The image is split into blocks (one per block RAM, 96 × 512 bytes by default), each block is
//! packed into little-endian words, and every block is written either as a Quartus MIF file or
//! as a plain hex dump that `$readmemh` can load in simulation.
//!
//! Addresses past the end of the binary are filled with a fill pattern (a RISC-V `nop` by
//! default), so the core runs into harmless instructions if it ever jumps there.
//!
//! Nothing here checks that the binary is actually valid code, it's just bytes.
//!

pub mod config;
pub mod convert;
pub mod emitter;
pub mod error;
pub mod image;
pub mod packer;
pub mod partition;
pub mod template;
