use super::{FormatError, Header, PROGRAM_NAME, VERSION};
use std::io::{self, Write};
use std::time::UNIX_EPOCH;

fn write_header<W: Write>(w: &mut W, header: &Header) -> io::Result<()> {
    match header.block {
        Some(index) => writeln!(w, "-- Auto-generated MIF file for Block {index}")?,
        None => writeln!(w, "-- Single complete MIF file")?,
    }
    writeln!(w, "-- Generated by {PROGRAM_NAME} version {VERSION}")?;

    let what = if header.block.is_some() { "Block" } else { "Total" };
    writeln!(
        w,
        "-- {what} size: {} bytes, {} words",
        header.size_bytes, header.word_count
    )?;
    writeln!(w, "-- Block type: {}", header.block_type.name())?;
    writeln!(w, "-- Fill pattern: 0x{:08X}", header.fill_pattern)?;

    // A clock before 1970 isn't worth failing over
    let seconds = header
        .generated
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    writeln!(w, "-- Generated: {seconds} (seconds since the Unix epoch)")?;
    writeln!(w)?;

    writeln!(w, "DEPTH = {};", header.word_count)?;
    writeln!(w, "WIDTH = {};", header.word_size.bits())?;
    writeln!(w, "ADDRESS_RADIX = HEX;")?;
    writeln!(w, "DATA_RADIX = HEX;")
}

/// Writes a complete MIF file. Data is always printed with 8 hex digits, WIDTH says how many
/// bits of it matter.
pub fn write<W, I>(w: &mut W, header: &Header, words: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = u32>,
{
    write_header(w, header)?;

    writeln!(w, "CONTENT")?;
    writeln!(w, "BEGIN")?;
    for (addr, word) in words.into_iter().enumerate() {
        writeln!(w, "{addr:04X} : {word:08X};")?;
    }
    writeln!(w, "END;")
}

/// Reads the words back from the CONTENT section of a MIF file
pub fn read_content(text: &str) -> Result<Vec<u32>, FormatError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    lines
        .by_ref()
        .find(|(_, l)| *l == "CONTENT")
        .ok_or(FormatError::MissingContent)?;
    lines
        .by_ref()
        .find(|(_, l)| !l.is_empty())
        .filter(|(_, l)| *l == "BEGIN")
        .ok_or(FormatError::MissingContent)?;

    let mut words = Vec::new();
    for (line, l) in lines {
        if l.is_empty() || l.starts_with("--") {
            continue;
        }
        if l == "END;" {
            return Ok(words);
        }

        let malformed = || FormatError::MalformedLine {
            line,
            text: l.to_owned(),
        };

        let (addr, data) = l
            .strip_suffix(';')
            .and_then(|l| l.split_once(':'))
            .ok_or_else(malformed)?;
        let addr = usize::from_str_radix(addr.trim(), 16).map_err(|_| malformed())?;
        let data = u32::from_str_radix(data.trim(), 16).map_err(|_| malformed())?;

        if addr != words.len() {
            return Err(FormatError::UnexpectedAddress {
                line,
                expected: words.len(),
                found: addr,
            });
        }
        words.push(data);
    }

    Err(FormatError::MissingEnd)
}
