//!
//! Output filename templates, e.g. `firmware_%02d.mif`. The pattern is parsed once when the
//! configuration is built, so rendering a block's filename can't fail later on.
//!

use crate::error::TemplateError;
use std::path::PathBuf;

/// Widest `%Nd` padding accepted
pub const MAX_WIDTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `%d`, `%5d`, `%02d`...
    Index { width: usize, zero_pad: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    segments: Vec<Segment>,
}

impl FilenameTemplate {
    /// Parses a pattern with at most one integer placeholder. `%%` stands for a literal `%`.
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            let zero_pad = chars.next_if_eq(&'0').is_some();
            let mut width = 0usize;
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                width = width
                    .checked_mul(10)
                    .and_then(|w| w.checked_add(digit.to_digit(10).unwrap_or(0) as usize))
                    .filter(|&w| w <= MAX_WIDTH)
                    .ok_or_else(|| TemplateError::WidthTooLarge(pattern.to_owned()))?;
            }

            match chars.next() {
                Some('d' | 'i' | 'u') => {}
                Some(conversion) => {
                    return Err(TemplateError::UnsupportedConversion {
                        pattern: pattern.to_owned(),
                        conversion,
                    })
                }
                None => return Err(TemplateError::Unterminated(pattern.to_owned())),
            }

            if segments.iter().any(|s| matches!(s, Segment::Index { .. })) {
                return Err(TemplateError::MultiplePlaceholders(pattern.to_owned()));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Index { width, zero_pad });
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Like [`parse`](Self::parse), but the pattern *must* contain a placeholder
    pub fn parse_indexed(pattern: &str) -> Result<Self, TemplateError> {
        let template = Self::parse(pattern)?;
        if !template.has_placeholder() {
            return Err(TemplateError::MissingPlaceholder(pattern.to_owned()));
        }
        Ok(template)
    }

    pub fn has_placeholder(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Index { .. }))
    }

    /// The concrete path for block `index`
    pub fn render(&self, index: usize) -> PathBuf {
        let mut name = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => name.push_str(s),
                Segment::Index {
                    width,
                    zero_pad: true,
                } => name.push_str(&format!("{index:0width$}")),
                Segment::Index {
                    width,
                    zero_pad: false,
                } => name.push_str(&format!("{index:width$}")),
            }
        }
        PathBuf::from(name)
    }
}
