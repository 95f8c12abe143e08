//! Album metadata and caption extraction rules
//!
//! Operates on the text fragments pulled out of the export pages by
//! [`crate::dom`]. The first fragment of the index page is the album title,
//! the second the description heading, and the rest the description body.
//!
//! The remote description call renders latest-first, so the submission
//! order produced here is deliberately reversed: body fragments are
//! concatenated in reverse fragment order, re-chunked to the remote's text
//! limit, and submitted reversed-chunks-first with the heading last. That
//! yields the heading on top on the remote side.

use crate::error::{Result, SyncError};

/// Maximum characters the remote accepts per description call
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Album title plus optional description extracted from the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMeta {
    pub title: String,
    pub description: Option<AlbumDescription>,
}

/// Description heading and body chunks, each chunk within the remote's limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDescription {
    pub heading: String,
    pub chunks: Vec<String>,
}

impl AlbumDescription {
    /// The exact order in which chunks must be sent to the remote:
    /// chunks reversed, heading last
    pub fn submission_order(&self) -> Vec<&str> {
        self.chunks
            .iter()
            .rev()
            .map(String::as_str)
            .chain(std::iter::once(self.heading.as_str()))
            .collect()
    }
}

/// Extract the album title and description from the index page fragments.
///
/// Fragments are expected pre-trimmed and non-empty (the DOM layer filters).
/// No fragments at all is fatal for the bundle; a title with no further
/// fragments is a normal, description-less album.
pub fn extract_album_meta(bundle: &str, fragments: &[String]) -> Result<AlbumMeta> {
    let Some(title) = fragments.first() else {
        return Err(SyncError::MissingTitle {
            bundle: bundle.to_string(),
        });
    };

    let description = fragments.get(1).map(|heading| {
        let body: String = fragments[2..]
            .iter()
            .rev()
            .map(String::as_str)
            .collect();
        AlbumDescription {
            heading: heading.clone(),
            chunks: chunk_text(&body, MAX_DESCRIPTION_CHARS),
        }
    });

    Ok(AlbumMeta {
        title: title.clone(),
        description,
    })
}

/// Normalize a raw caption: trimmed, blank treated as absent
pub fn extract_caption(raw: Option<String>) -> Option<String> {
    raw.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

/// Split text into chunks of at most `limit` characters, preserving order.
/// Splits on character boundaries; empty input yields no chunks.
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
