// src/github/contents.rs
// =============================================================================
// Directory listings and file bodies from the contents API:
//   GET /repos/{owner}/{repo}/contents/{path}?ref={ref}
//
// The same endpoint answers with an array (a directory) or a single object
// (a file, symlink or submodule). list_directory() always returns a Vec so
// callers never care which one came back.
//
// get_file() unwraps the metadata envelope:
// - encoding "base64": strip the line breaks GitHub wraps the payload with,
//   then decode
// - any other encoding: the content field is the text itself
// - no inline content but a download_url (big files): fetch that raw
// - body isn't JSON at all: refetch the same address as raw bytes
// =============================================================================

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::client::{Accept, GithubClient};
use super::coordinate::RepoCoordinate;
use crate::error::{GithubError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// Decoded from the envelope's base64 payload
    Base64,
    /// The envelope's content field, taken literally
    Plain,
    /// Fetched as raw bytes (download_url or non-JSON endpoint)
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBody {
    pub path: String,
    pub bytes: Vec<u8>,
    pub encoding: BodyEncoding,
}

impl FileBody {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Many(Vec<ContentEntry>),
    One(ContentEntry),
}

#[derive(Deserialize)]
struct FileEnvelope {
    #[serde(flatten)]
    entry: ContentEntry,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl GithubClient {
    pub fn contents_url(&self, coord: &RepoCoordinate, path: &str, r#ref: Option<&str>) -> Url {
        let mut url = self.api_url(
            ["repos", coord.owner.as_str(), coord.repo.as_str(), "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        );
        if let Some(r) = r#ref.filter(|r| !r.is_empty()) {
            url.query_pairs_mut().append_pair("ref", r);
        }
        url
    }

    pub async fn list_directory(
        &self,
        coord: &RepoCoordinate,
        path: &str,
        r#ref: Option<&str>,
    ) -> Result<Vec<ContentEntry>> {
        let url = self.contents_url(coord, path, r#ref);
        let listing: Listing = self.get_json(url).await?;
        Ok(match listing {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        })
    }

    pub async fn get_file(
        &self,
        coord: &RepoCoordinate,
        path: &str,
        r#ref: Option<&str>,
    ) -> Result<FileBody> {
        let url = self.contents_url(coord, path, r#ref);
        self.fetch_file_body(url, path).await
    }

    /// Fetches a file metadata envelope at `url` and decodes its body.
    /// `path` only labels the result and error messages.
    pub(crate) async fn fetch_file_body(&self, url: Url, path: &str) -> Result<FileBody> {
        let response = self.request(url.clone(), Accept::Json).await?;

        let value: serde_json::Value = match serde_json::from_slice(&response.body) {
            Ok(value) => value,
            Err(e) => {
                debug!("{} is not a JSON envelope ({}), fetching raw", url, e);
                let raw = self.request(url, Accept::Raw).await?;
                return Ok(FileBody {
                    path: path.to_string(),
                    bytes: raw.body,
                    encoding: BodyEncoding::Raw,
                });
            }
        };

        if value.is_array() {
            return Err(GithubError::Decode(format!("{} is a directory, not a file", path)));
        }

        let envelope: FileEnvelope = serde_json::from_value(value)
            .map_err(|e| GithubError::Decode(format!("{}: {}", path, e)))?;
        self.decode_envelope(envelope).await
    }

    async fn decode_envelope(&self, envelope: FileEnvelope) -> Result<FileBody> {
        let FileEnvelope {
            entry,
            content,
            encoding,
        } = envelope;
        let content = content.unwrap_or_default();

        if encoding.as_deref() == Some("base64") {
            return Ok(FileBody {
                bytes: decode_base64_content(&content)
                    .map_err(|e| GithubError::Decode(format!("{}: {}", entry.path, e)))?,
                path: entry.path,
                encoding: BodyEncoding::Base64,
            });
        }

        if content.is_empty() {
            if let Some(download_url) = &entry.download_url {
                let url = Url::parse(download_url)
                    .map_err(|e| GithubError::Decode(format!("{}: {}", download_url, e)))?;
                debug!("{} has no inline content, downloading {}", entry.path, url);
                let raw = self.request(url, Accept::Raw).await?;
                return Ok(FileBody {
                    path: entry.path,
                    bytes: raw.body,
                    encoding: BodyEncoding::Raw,
                });
            }
        }

        Ok(FileBody {
            path: entry.path,
            bytes: content.into_bytes(),
            encoding: BodyEncoding::Plain,
        })
    }
}

/// Decodes a contents-API base64 payload. GitHub wraps the encoded text
/// with newlines; they are not part of the data.
pub fn decode_base64_content(encoded: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(compact)
}
