use std::path::PathBuf;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Destination '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Remote endpoint error: {0}")]
    Client(#[from] drive_client::DriveClientError),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("remote object ended early: got {got} of {expected} bytes")]
    UnexpectedEof { got: u64, expected: u64 },
}

pub type Result<T> = std::result::Result<T, TransferError>;
