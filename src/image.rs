use crate::error::{Action, Error};
use std::fs;
use std::io::Read;
use std::path::Path;

/// The whole input binary, loaded once and never modified afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    bytes: Vec<u8>,
}

impl ImageBuffer {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Reads the complete file at `path`. The content is taken as-is.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| Error::io(Action::OpenInput, path, e))?;

        let expected = file
            .metadata()
            .map_err(|e| Error::io(Action::OpenInput, path, e))?
            .len();

        Self::read_from(file, expected, path)
    }

    /// Reads exactly `expected` bytes from `reader`. `path` is only used in error messages.
    pub fn read_from<R: Read>(reader: R, expected: u64, path: &Path) -> Result<Self, Error> {
        let mut bytes = Vec::with_capacity(expected as usize);
        reader
            .take(expected)
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io(Action::ReadInput, path, e))?;

        if (bytes.len() as u64) < expected {
            return Err(Error::Read {
                path: path.to_owned(),
                expected,
                read: bytes.len() as u64,
            });
        }

        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
