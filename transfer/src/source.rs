use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::Result;

/// Uniform interface over the two kinds of upload input.
///
/// A seekable file has a known length and can in principle be re-read; a
/// sequential stream (stdin, a pipe) has unknown length and each byte can
/// be read exactly once, so no failed chunk can ever be retried from it.
pub enum UploadSource {
    Seekable { path: PathBuf, length: u64 },
    Sequential { reader: Box<dyn Read> },
}

impl UploadSource {
    /// Source backed by a local file; the length is fixed at stat time.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let length = std::fs::metadata(&path)?.len();
        Ok(Self::Seekable { path, length })
    }

    pub fn stdin() -> Self {
        Self::sequential(Box::new(std::io::stdin()))
    }

    /// Forward-only source of unknown length.
    pub fn sequential(reader: Box<dyn Read>) -> Self {
        Self::Sequential { reader }
    }

    /// `Some(n)` for files, `None` for sequential streams.
    pub fn total_length(&self) -> Option<u64> {
        match self {
            Self::Seekable { length, .. } => Some(*length),
            Self::Sequential { .. } => None,
        }
    }

    /// Whether a failed chunk could be re-read from this source. Always
    /// false for sequential streams: consuming them is destructive.
    pub fn retry_supported(&self) -> bool {
        matches!(self, Self::Seekable { .. })
    }

    /// Open the underlying readable handle. Consumes the source: one
    /// handle per session.
    pub fn into_reader(self) -> Result<Box<dyn Read>> {
        match self {
            Self::Seekable { path, .. } => Ok(Box::new(File::open(path)?)),
            Self::Sequential { reader } => Ok(reader),
        }
    }
}
