//! Blocking Google Photos Library API client
//!
//! Thin pass-through behind [`super::RemoteService`]: albums list/create,
//! text enrichment for descriptions, raw byte upload and mediaItems
//! batchCreate. Authentication is out of scope; the caller supplies a
//! ready-to-use bearer token.

use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use super::{AlbumDescriptor, AttachItem, AttachResult, RemoteService, UploadToken};
use crate::error::{Result, SyncError};

const DEFAULT_BASE_URL: &str = "https://photoslibrary.googleapis.com/v1";
const ALBUM_PAGE_SIZE: usize = 50;

/// Google Photos Library API client
pub struct PhotosClient {
    http: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumsPage {
    #[serde(default)]
    albums: Vec<ApiAlbum>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAlbum {
    id: String,
    #[serde(default)]
    title: String,
    /// The API reports the count as a decimal string
    #[serde(default)]
    media_items_count: Option<String>,
}

impl From<ApiAlbum> for AlbumDescriptor {
    fn from(album: ApiAlbum) -> Self {
        let media_count = album
            .media_items_count
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        AlbumDescriptor {
            id: album.id,
            title: album.title,
            media_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchCreateResponse {
    #[serde(default)]
    new_media_item_results: Vec<MediaItemResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaItemResult {
    #[serde(default)]
    status: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl PhotosClient {
    /// Build a client for the production API endpoint
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    /// Build a client against a custom endpoint (used by tests)
    pub fn with_base_url(token: String, base_url: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            http,
            token,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl RemoteService for PhotosClient {
    fn list_albums(&self) -> Result<Vec<AlbumDescriptor>> {
        let mut albums = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(self.url("albums"))
                .bearer_auth(&self.token)
                .query(&[("pageSize", ALBUM_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let page: AlbumsPage = request.send()?.error_for_status()?.json()?;
            albums.extend(page.albums.into_iter().map(AlbumDescriptor::from));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(albums)
    }

    fn create_album(&self, title: &str) -> Result<AlbumDescriptor> {
        let body = json!({ "album": { "title": title } });
        let album: ApiAlbum = self
            .http
            .post(self.url("albums"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(album.into())
    }

    fn append_description(&self, album: &AlbumDescriptor, chunk: &str) -> Result<()> {
        let body = json!({
            "newEnrichmentItem": { "textEnrichment": { "text": chunk } },
            "albumPosition": { "position": "FIRST_IN_ALBUM" },
        });
        self.http
            .post(self.url(&format!("albums/{}:addEnrichment", album.id)))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn upload_bytes(&self, path: &Path) -> Result<UploadToken> {
        let bytes = std::fs::read(path)?;
        let token = self
            .http
            .post(self.url("uploads"))
            .bearer_auth(&self.token)
            .header("Content-Type", "application/octet-stream")
            .header("X-Goog-Upload-Protocol", "raw")
            .body(bytes)
            .send()?
            .error_for_status()?
            .text()?;
        if token.is_empty() {
            return Err(SyncError::RemoteApi {
                message: format!("empty upload token for {}", path.display()),
            });
        }
        Ok(UploadToken(token))
    }

    fn batch_attach(
        &self,
        album: &AlbumDescriptor,
        items: &[AttachItem],
    ) -> Result<Vec<AttachResult>> {
        let new_media_items: Vec<_> = items
            .iter()
            .map(|item| {
                json!({
                    "description": item.caption.clone().unwrap_or_default(),
                    "simpleMediaItem": {
                        "uploadToken": item.token.0,
                        "fileName": item.item_id,
                    },
                })
            })
            .collect();
        let body = json!({
            "albumId": album.id,
            "newMediaItems": new_media_items,
        });
        let response: BatchCreateResponse = self
            .http
            .post(self.url("mediaItems:batchCreate"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        // Results come back positionally; pair them with our item ids
        let results = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let error = response.new_media_item_results.get(i).and_then(|r| {
                    r.status.as_ref().and_then(|s| match s.code {
                        Some(0) | None => None,
                        Some(code) => Some(format!(
                            "{} (code {code})",
                            s.message.as_deref().unwrap_or("attach failed")
                        )),
                    })
                });
                AttachResult {
                    item_id: item.item_id.clone(),
                    error,
                }
            })
            .collect();
        Ok(results)
    }
}
