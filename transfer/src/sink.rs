use std::io::Write;
use std::path::PathBuf;

use crate::error::{Result, TransferError};

/// Destination for downloaded bytes.
///
/// A concrete file path is checked for prior existence and never
/// overwritten; the stdout sink has no such check.
pub enum OutputSink {
    File(PathBuf),
    Stdout,
    #[cfg(test)]
    Buffer(BufferSink),
}

impl OutputSink {
    /// Fail fast if the destination cannot be written, before any remote
    /// call is made or any byte is produced.
    pub fn ensure_writable(&self) -> Result<()> {
        match self {
            OutputSink::File(path) if path.exists() => {
                Err(TransferError::DestinationExists(path.clone()))
            },
            _ => Ok(()),
        }
    }

    /// Open the writer. Consumes the sink: one writer per session, owned
    /// by the engine until the session ends.
    pub fn into_writer(self) -> Result<Box<dyn Write>> {
        match self {
            OutputSink::File(path) => {
                let file = std::fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&path)?;
                Ok(Box::new(file))
            },
            OutputSink::Stdout => Ok(Box::new(std::io::stdout())),
            #[cfg(test)]
            OutputSink::Buffer(bp) => Ok(Box::new(bp)),
        }
    }
}

/// Shared in-memory sink, only used in tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    inner: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl BufferSink {
    pub fn value(&self) -> Vec<u8> {
        self.inner.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| std::io::Error::other(format!("{e}")))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
