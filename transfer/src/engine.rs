use std::io::Write;

use drive_client::{Compression, DownloadLocation, RemoteObjectEndpoint};
use drive_types::FileMetadata;
use progress_tracking::ProgressSink;
use tracing::debug;

use crate::chunk::ChunkBuffer;
use crate::error::{Result, TransferError};
use crate::session::TransferSession;
use crate::sink::OutputSink;
use crate::source::UploadSource;

/// 10 MiB, fixed for the lifetime of a session.
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Drives the chunked request/response loop for both directions.
///
/// Strictly single-threaded and blocking: one chunk in flight at a time,
/// in order, no engine-level retry. A failed chunk from a sequential
/// source is unrecoverable by construction: the consumed bytes are gone.
pub struct TransferEngine<'a, E: RemoteObjectEndpoint> {
    endpoint: &'a E,
    progress: &'a dyn ProgressSink,
    chunk_size: usize,
}

impl<'a, E: RemoteObjectEndpoint> TransferEngine<'a, E> {
    pub fn new(endpoint: &'a E, progress: &'a dyn ProgressSink) -> Self {
        Self {
            endpoint,
            progress,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be nonzero");
        self.chunk_size = chunk_size;
        self
    }

    /// Stream `source` into a new remote object described by `metadata`.
    /// Returns the total byte count transmitted.
    pub fn upload(&self, source: UploadSource, metadata: &FileMetadata) -> Result<u64> {
        // Compressing an unseekable stream defeats resumability and hurts
        // throughput, so sequential sources pin compression off.
        let compression = if source.retry_supported() {
            Compression::Allowed
        } else {
            Compression::Disabled
        };

        let mut session = TransferSession::new(source.total_length(), self.progress);
        let result = self.run_upload(&mut session, source, metadata, compression);
        if result.is_err() {
            session.fail();
        }
        result
    }

    fn run_upload(
        &self,
        session: &mut TransferSession,
        source: UploadSource,
        metadata: &FileMetadata,
        compression: Compression,
    ) -> Result<u64> {
        session.initiation_started();
        let remote = self.endpoint.begin_resumable_upload(metadata, compression)?;
        session.initiation_complete();
        debug!(
            "upload session open: title={} total={:?} chunk_size={}",
            metadata.title,
            session.total(),
            self.chunk_size
        );

        let mut reader = source.into_reader()?;
        let mut buffer = ChunkBuffer::new(self.chunk_size);
        let mut offset = 0u64;

        loop {
            let (n, eof) = buffer.fill(reader.as_mut())?;

            if n == 0 {
                // EOF landed on a chunk boundary, or the stream was empty:
                // finalize with an empty request carrying the now-known total.
                self.endpoint.upload_chunk(&remote, offset, &[], Some(offset))?;
                break;
            }

            let next = offset + n as u64;
            let finalize = if eof || session.total() == Some(next) {
                Some(next)
            } else {
                None
            };
            self.endpoint
                .upload_chunk(&remote, offset, buffer.as_slice(), finalize)?;
            offset = next;
            session.advance(n as u64);

            if finalize.is_some() {
                break;
            }
        }

        Ok(session.complete())
    }

    /// Stream the remote object named `name` under folder `parent` into
    /// `sink`. Returns the total byte count received.
    pub fn download(&self, name: &str, parent: &str, sink: OutputSink) -> Result<u64> {
        // Refuse an existing destination before any remote call is made.
        sink.ensure_writable()?;

        let location = self.endpoint.resolve_download_location(name, parent)?;
        debug!(
            "download location resolved: name={name} size={} chunk_size={}",
            location.size, self.chunk_size
        );

        let mut session = TransferSession::new(Some(location.size), self.progress);
        let result = self.run_download(&mut session, &location, sink);
        if result.is_err() {
            session.fail();
        }
        result
    }

    fn run_download(
        &self,
        session: &mut TransferSession,
        location: &DownloadLocation,
        sink: OutputSink,
    ) -> Result<u64> {
        let mut writer = sink.into_writer()?;
        let total = location.size;
        let mut offset = 0u64;

        while offset < total {
            let want = (total - offset).min(self.chunk_size as u64);
            let bytes = self.endpoint.get_range(location, offset, want)?;
            if bytes.is_empty() {
                return Err(TransferError::UnexpectedEof {
                    got: offset,
                    expected: total,
                });
            }

            writer.write_all(&bytes)?;
            offset += bytes.len() as u64;
            session.advance(bytes.len() as u64);
        }

        writer.flush()?;
        Ok(session.complete())
    }
}
