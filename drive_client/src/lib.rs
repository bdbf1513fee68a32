pub mod auth;
pub mod error;
pub mod http_client;
pub mod interface;
pub mod remote;

pub use auth::{AuthConfig, TokenProvider};
pub use error::{DriveClientError, Result};
pub use http_client::HttpClient;
pub use interface::{Compression, DownloadLocation, RemoteObjectEndpoint, UploadSession};
pub use remote::DriveClient;

pub const DEFAULT_API_ENDPOINT: &str = "https://www.googleapis.com/drive/v2";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/drive/v2";
