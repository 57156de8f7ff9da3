use super::FormatError;
use std::io::{self, Write};

/// One word per line, 8 uppercase hex digits, nothing else
pub fn write<W, I>(w: &mut W, words: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = u32>,
{
    for word in words {
        writeln!(w, "{word:08X}")?;
    }
    Ok(())
}

pub fn read_words(text: &str) -> Result<Vec<u32>, FormatError> {
    text.lines()
        .enumerate()
        .map(|(i, l)| {
            let valid = l.len() == 8 && l.bytes().all(|b| b.is_ascii_hexdigit());
            valid
                .then(|| u32::from_str_radix(l, 16).ok())
                .flatten()
                .ok_or_else(|| FormatError::MalformedLine {
                    line: i + 1,
                    text: l.to_owned(),
                })
        })
        .collect()
}
