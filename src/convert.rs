use crate::config::Config;
use crate::emitter;
use crate::error::Error;
use crate::image::ImageBuffer;
use crate::packer::pack_block;
use crate::partition::partition;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a successful run produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Conversion {
    pub image_len: usize,
    pub files: Vec<PathBuf>,
    pub words: usize,
}

/// Loads the input, then packs and writes every block in order. Stops at the first error; files
/// written before it are left on disk.
pub fn run(config: &Config) -> Result<Conversion, Error> {
    let image = ImageBuffer::load(&config.input)?;
    info!(
        "Input file: {} ({} bytes)",
        config.input.display(),
        image.len()
    );

    convert(config, &image)
}

/// Same as [`run`], with the image already in memory
pub fn convert(config: &Config, image: &ImageBuffer) -> Result<Conversion, Error> {
    if config.single_file {
        info!(
            "Generating single MIF file with {} bytes total",
            config.total_size
        );
    } else {
        info!(
            "Generating {} blocks of {} bytes each",
            config.total_blocks, config.block_size
        );
        info!("Total memory space: {} bytes", config.address_space());
    }

    let fill = config.masked_fill();
    let mut result = Conversion {
        image_len: image.len(),
        ..Default::default()
    };

    for block in partition(config) {
        let word_count = block.word_count(config.word_size);
        info!(
            "Creating block {}: {} ({} words)",
            block.index,
            block.path.display(),
            word_count
        );
        if block.start < image.len() {
            debug!(
                "block {} holds {} bytes of image data",
                block.index,
                image.len().min(block.range().end) - block.start
            );
        }

        let words = pack_block(&block, image, config.word_size, fill);
        emitter::emit(&block, config, words).map_err(|e| e.in_block(block.index))?;

        result.words += word_count;
        result.files.push(block.path);
    }

    info!("Successfully generated {} file(s)", result.files.len());
    Ok(result)
}
