use std::io::Read;

/// Fixed-capacity staging buffer for one transfer chunk.
///
/// Reused chunk-to-chunk within a session; never reads past its capacity.
/// Read errors propagate to the caller untouched; retry policy, if any,
/// lives above this layer.
pub struct ChunkBuffer {
    buf: Vec<u8>,
    len: usize,
}

impl ChunkBuffer {
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be nonzero");
        Self {
            buf: vec![0u8; chunk_size],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Read up to `capacity` bytes from `reader`, looping over short reads.
    /// Returns the byte count staged (possibly 0) and whether the source
    /// reported end-of-stream.
    pub fn fill(&mut self, reader: &mut dyn Read) -> std::io::Result<(usize, bool)> {
        let mut filled = 0;
        let mut eof = false;

        while filled < self.buf.len() {
            let n = reader.read(&mut self.buf[filled..])?;
            if n == 0 {
                eof = true;
                break;
            }
            filled += n;
        }

        self.len = filled;
        Ok((filled, eof))
    }

    /// The bytes staged by the last `fill`.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
