//! Chunked, resumable streaming transfer engine.
//!
//! Moves arbitrarily large byte streams between the local process and a
//! remote object endpoint in bounded-size chunks, without ever holding more
//! than one chunk in memory. Handles seekable files and unseekable
//! stdin/stdout streams uniformly and reports progress after every chunk.

pub mod chunk;
pub mod engine;
pub mod error;
pub mod session;
pub mod sink;
pub mod source;

pub use chunk::ChunkBuffer;
pub use engine::{TransferEngine, DEFAULT_CHUNK_SIZE};
pub use error::{Result, TransferError};
pub use session::{TransferSession, TransferState};
pub use sink::OutputSink;
pub use source::UploadSource;
