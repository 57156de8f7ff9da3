//!
//! Turns the bytes of the image into words. Bytes are packed little-endian (the least significant
//! byte comes first in the image), which is what the RISC-V core expects to find in its ROM.
//!
//! Words that start past the end of the image get the fill pattern. A word that starts inside the
//! image but runs past its end is *zero*-padded instead, so the fill pattern never leaks into the
//! last word that holds real data.
//!

use crate::config::WordSize;
use crate::image::ImageBuffer;
use crate::partition::Block;
use byteorder::{ByteOrder, LittleEndian};

/// Packs the word starting at byte `offset` of the image
pub fn pack_word(image: &ImageBuffer, offset: usize, word_size: WordSize, fill: u32) -> u32 {
    let bytes = image.as_bytes();
    if offset >= bytes.len() {
        return fill & word_size.mask();
    }

    let n = word_size.bytes();
    let available = &bytes[offset..bytes.len().min(offset + n)];

    let mut lanes = [0u8; 4];
    lanes[..available.len()].copy_from_slice(available);
    LittleEndian::read_uint(&lanes, n) as u32
}

/// Iterator over the words of a block, from word index 0 onwards
#[derive(Debug, Clone)]
pub struct Words<'a> {
    image: &'a ImageBuffer,
    start: usize,
    word_size: WordSize,
    fill: u32,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next >= self.count {
            return None;
        }

        let offset = self.start + self.next * self.word_size.bytes();
        self.next += 1;
        Some(pack_word(self.image, offset, self.word_size, self.fill))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Words<'_> {}

/// The words of `block`. Doesn't copy the image.
pub fn pack_block<'a>(
    block: &Block,
    image: &'a ImageBuffer,
    word_size: WordSize,
    fill: u32,
) -> Words<'a> {
    Words {
        image,
        start: block.start,
        word_size,
        fill,
        next: 0,
        count: block.word_count(word_size),
    }
}
