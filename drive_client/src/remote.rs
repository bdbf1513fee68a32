use anyhow::anyhow;
use drive_types::{FileEntry, FileList, FileMetadata, FOLDER_MIME_TYPE};
use reqwest::header::{CONTENT_ENCODING, CONTENT_RANGE, LOCATION, RANGE};
use reqwest::{Method, StatusCode, Url};
use tracing::debug;

use crate::auth::AuthConfig;
use crate::error::{DriveClientError, Result};
use crate::http_client::HttpClient;
use crate::interface::{Compression, DownloadLocation, RemoteObjectEndpoint, UploadSession};

/// Client for the Drive v2 API: metadata queries plus the resumable
/// upload / ranged download protocol the transfer engine drives.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: HttpClient,
    api_endpoint: String,
    upload_endpoint: String,
}

impl DriveClient {
    pub fn new(
        api_endpoint: &str,
        upload_endpoint: &str,
        auth: &Option<AuthConfig>,
        user_agent: &str,
    ) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(auth, user_agent)?,
            api_endpoint: api_endpoint.trim_end_matches('/').to_owned(),
            upload_endpoint: upload_endpoint.trim_end_matches('/').to_owned(),
        })
    }

    fn query(&self, q: &str) -> Result<Vec<FileEntry>> {
        let url = Url::parse(&format!("{}/files", self.api_endpoint))?;
        debug!("query: GET {url} q={q}");
        let response = self
            .http
            .request(Method::GET, url)?
            .query(&[("q", q)])
            .send()?
            .error_for_status()?;
        let list: FileList = response.json()?;
        Ok(list.items)
    }

    /// Resolve a folder name to its id. Zero matches and multiple matches
    /// are distinct errors.
    pub fn find_folder(&self, name: &str) -> Result<String> {
        let q = format!(
            "title='{}' and mimeType='{FOLDER_MIME_TYPE}' and trashed=false",
            escape_query_value(name)
        );
        let mut items = self.query(&q)?;
        match items.len() {
            0 => Err(DriveClientError::FolderNotFound(name.to_owned())),
            1 => Ok(items.remove(0).id),
            _ => Err(DriveClientError::FolderAmbiguous(name.to_owned())),
        }
    }

    /// Look up a single non-folder file by title inside `parent`.
    pub fn find_file(&self, name: &str, parent: &str) -> Result<FileEntry> {
        let q = format!(
            "title='{}' and '{parent}' in parents and mimeType!='{FOLDER_MIME_TYPE}' and trashed=false",
            escape_query_value(name)
        );
        let mut items = self.query(&q)?;
        match items.len() {
            0 => Err(DriveClientError::FileNotFound(name.to_owned())),
            1 => Ok(items.remove(0)),
            _ => Err(DriveClientError::FileAmbiguous(name.to_owned())),
        }
    }

    /// All non-folder files inside `parent`, for `list` and `md5`.
    pub fn list_files(&self, parent: &str) -> Result<Vec<FileEntry>> {
        let q = format!(
            "'{parent}' in parents and mimeType!='{FOLDER_MIME_TYPE}' and trashed=false"
        );
        self.query(&q)
    }
}

impl RemoteObjectEndpoint for DriveClient {
    fn begin_resumable_upload(
        &self,
        metadata: &FileMetadata,
        compression: Compression,
    ) -> Result<UploadSession> {
        let url = Url::parse(&format!("{}/files", self.upload_endpoint))?;
        debug!("upload session: POST {url} title={}", metadata.title);

        let response = self
            .http
            .request(Method::POST, url)?
            .query(&[("uploadType", "resumable")])
            .header("X-Upload-Content-Type", &metadata.mime_type)
            .json(metadata)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveClientError::InternalError(anyhow!(
                "unexpected status {status} opening upload session"
            )));
        }

        let session_url = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                DriveClientError::InternalError(anyhow!(
                    "upload session response missing Location header"
                ))
            })?;

        Ok(UploadSession {
            session_url,
            compression,
        })
    }

    fn upload_chunk(
        &self,
        session: &UploadSession,
        offset: u64,
        data: &[u8],
        finalize: Option<u64>,
    ) -> Result<()> {
        let url = Url::parse(&session.session_url)?;

        let content_range = match (data.len(), finalize) {
            (0, Some(total)) => format!("bytes */{total}"),
            (0, None) => return Err(DriveClientError::InvalidArguments),
            (len, finalize) => {
                let end = offset + len as u64 - 1;
                match finalize {
                    Some(total) => format!("bytes {offset}-{end}/{total}"),
                    None => format!("bytes {offset}-{end}/*"),
                }
            },
        };

        debug!("upload chunk: PUT {} bytes ({content_range})", data.len());
        let mut req = self
            .http
            .request(Method::PUT, url)?
            .header(CONTENT_RANGE, content_range)
            .body(data.to_vec());
        if session.compression == Compression::Disabled {
            req = req.header(CONTENT_ENCODING, "identity");
        }

        let status = req.send()?.status();
        match (finalize, status) {
            // 308 acknowledges a non-final chunk of a resumable session.
            (None, StatusCode::PERMANENT_REDIRECT) => Ok(()),
            (Some(_), s) if s.is_success() => Ok(()),
            (_, s) => Err(DriveClientError::InternalError(anyhow!(
                "unexpected status {s} uploading chunk at offset {offset}"
            ))),
        }
    }

    fn resolve_download_location(&self, name: &str, parent: &str) -> Result<DownloadLocation> {
        let entry = self.find_file(name, parent)?;
        let url = entry
            .download_url
            .ok_or_else(|| DriveClientError::NoContent(name.to_owned()))?;
        let size = entry
            .file_size
            .ok_or_else(|| DriveClientError::NoContent(name.to_owned()))?;
        Ok(DownloadLocation { url, size })
    }

    fn get_range(&self, location: &DownloadLocation, offset: u64, len: u64) -> Result<Vec<u8>> {
        if len == 0 {
            return Err(DriveClientError::InvalidArguments);
        }
        let url = Url::parse(&location.url)?;
        let end = offset + len - 1;

        let response = self
            .http
            .request(Method::GET, url)?
            .header(RANGE, format!("bytes={offset}-{end}"))
            .send()?
            .error_for_status()?;
        let body = response.bytes()?;

        if body.len() as u64 > len {
            return Err(DriveClientError::InternalError(anyhow!(
                "range request returned {} bytes, expected at most {len}",
                body.len()
            )));
        }

        Ok(body.to_vec())
    }
}

/// The v2 query language quotes values with single quotes.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client_for(server: &MockServer) -> DriveClient {
        DriveClient::new(
            &server.url(""),
            &server.url(""),
            &Some(AuthConfig::bearer("tok")),
            "stream2drive-test",
        )
        .unwrap()
    }

    #[test]
    fn begin_resumable_upload_returns_session_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/files")
                .query_param("uploadType", "resumable")
                .header("x-upload-content-type", "text/plain")
                .header("authorization", "Bearer tok")
                .json_body_partial(r#"{"title":"notes.txt","mimeType":"text/plain"}"#);
            then.status(200)
                .header("Location", server.url("/session/abc"));
        });

        let client = client_for(&server);
        let session = client
            .begin_resumable_upload(&FileMetadata::new("notes.txt", "text/plain"), Compression::Allowed)
            .unwrap();

        mock.assert();
        assert_eq!(session.session_url, server.url("/session/abc"));
        assert_eq!(session.compression, Compression::Allowed);
    }

    #[test]
    fn begin_resumable_upload_without_location_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/files");
            then.status(200);
        });

        let client = client_for(&server);
        let err = client
            .begin_resumable_upload(&FileMetadata::new("a", "text/plain"), Compression::Allowed)
            .unwrap_err();
        assert!(matches!(err, DriveClientError::InternalError(_)));
    }

    #[test]
    fn non_final_chunk_sends_open_content_range() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/session/abc")
                .header("content-range", "bytes 0-9/*");
            then.status(308);
        });

        let client = client_for(&server);
        let session = UploadSession {
            session_url: server.url("/session/abc"),
            compression: Compression::Allowed,
        };
        client.upload_chunk(&session, 0, &[7u8; 10], None).unwrap();
        mock.assert();
    }

    #[test]
    fn final_chunk_sends_total_length() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/session/abc")
                .header("content-range", "bytes 10-14/15");
            then.status(200);
        });

        let client = client_for(&server);
        let session = UploadSession {
            session_url: server.url("/session/abc"),
            compression: Compression::Allowed,
        };
        client
            .upload_chunk(&session, 10, &[7u8; 5], Some(15))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn empty_finalize_uses_star_range() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/session/abc")
                .header("content-range", "bytes */0");
            then.status(200);
        });

        let client = client_for(&server);
        let session = UploadSession {
            session_url: server.url("/session/abc"),
            compression: Compression::Allowed,
        };
        client.upload_chunk(&session, 0, &[], Some(0)).unwrap();
        mock.assert();

        // An empty chunk that is not finalizing is a caller bug.
        let err = client.upload_chunk(&session, 0, &[], None).unwrap_err();
        assert!(matches!(err, DriveClientError::InvalidArguments));
    }

    #[test]
    fn sequential_sessions_pin_identity_encoding() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/session/abc")
                .header("content-encoding", "identity");
            then.status(308);
        });

        let client = client_for(&server);
        let session = UploadSession {
            session_url: server.url("/session/abc"),
            compression: Compression::Disabled,
        };
        client.upload_chunk(&session, 0, &[1u8; 4], None).unwrap();
        mock.assert();
    }

    #[test]
    fn unexpected_chunk_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/session/abc");
            then.status(200); // non-final chunks must see 308
        });

        let client = client_for(&server);
        let session = UploadSession {
            session_url: server.url("/session/abc"),
            compression: Compression::Allowed,
        };
        let err = client.upload_chunk(&session, 0, &[1u8; 4], None).unwrap_err();
        assert!(matches!(err, DriveClientError::InternalError(_)));
    }

    #[test]
    fn get_range_passes_range_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/content")
                .header("range", "bytes=5-14");
            then.status(206).body("0123456789");
        });

        let client = client_for(&server);
        let location = DownloadLocation {
            url: server.url("/content"),
            size: 100,
        };
        let bytes = client.get_range(&location, 5, 10).unwrap();
        mock.assert();
        assert_eq!(bytes, b"0123456789");
    }

    #[test]
    fn get_range_rejects_oversized_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/content");
            then.status(200).body("way more bytes than asked for");
        });

        let client = client_for(&server);
        let location = DownloadLocation {
            url: server.url("/content"),
            size: 100,
        };
        let err = client.get_range(&location, 0, 4).unwrap_err();
        assert!(matches!(err, DriveClientError::InternalError(_)));
    }

    #[test]
    fn folder_lookup_distinguishes_missing_from_ambiguous() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/files").query_param(
                "q",
                format!("title='missing' and mimeType='{FOLDER_MIME_TYPE}' and trashed=false"),
            );
            then.status(200).json_body(json!({ "items": [] }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/files").query_param(
                "q",
                format!("title='dup' and mimeType='{FOLDER_MIME_TYPE}' and trashed=false"),
            );
            then.status(200).json_body(json!({
                "items": [
                    { "id": "1", "title": "dup" },
                    { "id": "2", "title": "dup" },
                ]
            }));
        });

        let client = client_for(&server);
        assert!(matches!(
            client.find_folder("missing").unwrap_err(),
            DriveClientError::FolderNotFound(_)
        ));
        assert!(matches!(
            client.find_folder("dup").unwrap_err(),
            DriveClientError::FolderAmbiguous(_)
        ));
    }

    #[test]
    fn find_file_scopes_query_to_parent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/files").query_param(
                "q",
                format!(
                    "title='report.pdf' and 'folder1' in parents and \
                     mimeType!='{FOLDER_MIME_TYPE}' and trashed=false"
                ),
            );
            then.status(200).json_body(json!({
                "items": [{
                    "id": "f42",
                    "title": "report.pdf",
                    "fileSize": "1024",
                    "downloadUrl": "https://example.invalid/dl/f42"
                }]
            }));
        });

        let client = client_for(&server);
        let entry = client.find_file("report.pdf", "folder1").unwrap();
        mock.assert();
        assert_eq!(entry.id, "f42");
        assert_eq!(entry.file_size, Some(1024));
    }

    #[test]
    fn resolve_download_location_requires_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/files");
            then.status(200).json_body(json!({
                "items": [{ "id": "g1", "title": "doc" }]
            }));
        });

        let client = client_for(&server);
        let err = client.resolve_download_location("doc", "root").unwrap_err();
        assert!(matches!(err, DriveClientError::NoContent(_)));
    }
}
