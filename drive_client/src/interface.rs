use drive_types::FileMetadata;

use crate::error::Result;

/// Transport-level content-compression policy for an upload session.
///
/// Sequential (unseekable) sources must never be compressed on the wire:
/// resumability depends on byte offsets over the raw stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Allowed,
    Disabled,
}

/// Server-side resumable upload context. Chunks are PUT against
/// `session_url` in order and the session is finalized with the last one.
#[derive(Clone, Debug)]
pub struct UploadSession {
    pub session_url: String,
    pub compression: Compression,
}

/// Transient, possibly time-limited reference to a remote object's content,
/// resolved immediately before the download byte loop.
#[derive(Clone, Debug)]
pub struct DownloadLocation {
    pub url: String,
    pub size: u64,
}

/// The remote-storage operations the transfer engine depends on.
pub trait RemoteObjectEndpoint {
    /// Open a resumable upload session for a new object.
    fn begin_resumable_upload(
        &self,
        metadata: &FileMetadata,
        compression: Compression,
    ) -> Result<UploadSession>;

    /// Transmit one chunk at `offset`. `finalize` carries the total object
    /// length on the last chunk; a non-final chunk passes `None`. An empty
    /// `data` is only valid when finalizing (zero-length streams, or EOF
    /// discovered right after a full chunk).
    fn upload_chunk(
        &self,
        session: &UploadSession,
        offset: u64,
        data: &[u8],
        finalize: Option<u64>,
    ) -> Result<()>;

    /// Resolve the current content location of the named remote object.
    fn resolve_download_location(&self, name: &str, parent: &str) -> Result<DownloadLocation>;

    /// Fetch `[offset, offset+len)` of the object's content. The returned
    /// buffer may be shorter than `len` at the end of the object.
    fn get_range(&self, location: &DownloadLocation, offset: u64, len: u64) -> Result<Vec<u8>>;
}
