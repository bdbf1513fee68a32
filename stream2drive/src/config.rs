use std::path::PathBuf;

use anyhow::{Context, Result};
use drive_client::AuthConfig;
use transfer::DEFAULT_CHUNK_SIZE;

/// Startup configuration, resolved once and injected everywhere below.
///
/// The data directory is the platform application-data path; nothing
/// downstream computes paths on its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_endpoint: String,
    pub upload_endpoint: String,
    pub chunk_size: usize,
    pub data_dir: PathBuf,
    pub token: Option<String>,
}

impl Config {
    pub fn resolve() -> Result<Self> {
        let data_dir = match std::env::var_os("GDRIVE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .context("no application data directory on this platform")?
                .join("stream2drive"),
        };

        let token = match std::env::var("GDRIVE_TOKEN") {
            Ok(token) if !token.is_empty() => Some(token),
            _ => token_from_file(&data_dir),
        };

        Ok(Self {
            api_endpoint: std::env::var("GDRIVE_API_ENDPOINT")
                .unwrap_or_else(|_| drive_client::DEFAULT_API_ENDPOINT.to_owned()),
            upload_endpoint: std::env::var("GDRIVE_UPLOAD_ENDPOINT")
                .unwrap_or_else(|_| drive_client::DEFAULT_UPLOAD_ENDPOINT.to_owned()),
            chunk_size: parse_chunk_size(std::env::var("GDRIVE_CHUNK_SIZE").ok())?,
            data_dir,
            token,
        })
    }

    pub fn auth_config(&self) -> Option<AuthConfig> {
        self.token.as_deref().map(AuthConfig::bearer)
    }
}

fn parse_chunk_size(value: Option<String>) -> Result<usize> {
    match value {
        None => Ok(DEFAULT_CHUNK_SIZE),
        Some(raw) => {
            let n: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid GDRIVE_CHUNK_SIZE '{raw}'"))?;
            anyhow::ensure!(n > 0, "GDRIVE_CHUNK_SIZE must be nonzero");
            Ok(n)
        },
    }
}

fn token_from_file(data_dir: &std::path::Path) -> Option<String> {
    let raw = std::fs::read_to_string(data_dir.join("token")).ok()?;
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}
