use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DriveClientError {
    #[error("Folder '{0}' not found")]
    FolderNotFound(String),

    #[error("Folder '{0}' matched more than one folder")]
    FolderAmbiguous(String),

    #[error("File '{0}' not found")]
    FileNotFound(String),

    #[error("File '{0}' matched more than one document")]
    FileAmbiguous(String),

    #[error("File '{0}' has no downloadable content")]
    NoContent(String),

    #[error("Invalid Arguments")]
    InvalidArguments,

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Parse Error: {0}")]
    ParseError(#[from] url::ParseError),

    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Serialization Error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Other Internal Error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DriveClientError>;

impl PartialEq for DriveClientError {
    fn eq(&self, other: &DriveClientError) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}
