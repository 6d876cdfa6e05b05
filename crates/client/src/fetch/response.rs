//! Response model shared by the network and the cache bucket.

use bytes::Bytes;
use folio_core::{CachedEntry, Error, ResponseType};
use reqwest::StatusCode;
use url::Url;

/// A response served to the page, from the network or the cache.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: StatusCode,
    pub response_type: ResponseType,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Snapshot this response as a cache entry for `method` + `url`.
    pub fn to_entry(&self, method: &str, url: &str) -> CachedEntry {
        CachedEntry {
            url: url.to_string(),
            method: method.to_ascii_uppercase(),
            status: self.status.as_u16(),
            response_type: self.response_type,
            headers: self.headers.clone(),
            body: self.body.to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl TryFrom<CachedEntry> for Response {
    type Error = Error;

    fn try_from(entry: CachedEntry) -> Result<Self, Self::Error> {
        let url = Url::parse(&entry.url).map_err(|e| Error::CorruptEntry(format!("{}: {e}", entry.url)))?;
        let status =
            StatusCode::from_u16(entry.status).map_err(|e| Error::CorruptEntry(format!("status {}: {e}", entry.status)))?;
        Ok(Self {
            url,
            status,
            response_type: entry.response_type,
            headers: entry.headers,
            body: Bytes::from(entry.body),
        })
    }
}
