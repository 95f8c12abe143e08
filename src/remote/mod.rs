//! Remote photo service surface
//!
//! The orchestrator talks to the remote through the [`RemoteService`]
//! trait: list/create albums, append description text, upload raw bytes for
//! an opaque token, and batch-attach tokens to an album. The concrete
//! transport lives in [`photos`]; tests substitute a recording mock.

pub mod photos;

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Opaque handle returned by the remote after a raw upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken(pub String);

/// A remote album, resolved by title or freshly created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDescriptor {
    /// Remote identifier
    pub id: String,
    /// Album title, the sole matching key
    pub title: String,
    /// Remote media count observed at resolution time
    pub media_count: u64,
}

/// One entry of a batch-attach call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachItem {
    pub token: UploadToken,
    pub item_id: String,
    pub caption: Option<String>,
}

/// Per-item outcome of a batch-attach call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachResult {
    pub item_id: String,
    /// Remote-reported error for this item, if any
    pub error: Option<String>,
}

/// Blocking remote photo service operations, called sequentially
pub trait RemoteService {
    /// All albums visible to the account
    fn list_albums(&self) -> Result<Vec<AlbumDescriptor>>;

    /// Create a new, empty album with the given title
    fn create_album(&self, title: &str) -> Result<AlbumDescriptor>;

    /// Append one description text chunk to an album. The remote renders
    /// the latest appended chunk first.
    fn append_description(&self, album: &AlbumDescriptor, chunk: &str) -> Result<()>;

    /// Upload raw file bytes, returning the token needed to attach them
    fn upload_bytes(&self, path: &Path) -> Result<UploadToken>;

    /// Attach up to [`crate::batch::MAX_BATCH_ATTACH_ITEMS`] uploaded items
    /// to an album, in order
    fn batch_attach(
        &self,
        album: &AlbumDescriptor,
        items: &[AttachItem],
    ) -> Result<Vec<AttachResult>>;
}

/// Title-to-descriptor lookup, populated once per run from `list_albums`
///
/// Title equality is the sole matching key; two bundles resolve to the same
/// descriptor only when their extracted titles are identical strings.
#[derive(Debug, Default)]
pub struct AlbumRegistry {
    by_title: HashMap<String, AlbumDescriptor>,
}

impl AlbumRegistry {
    /// Build the registry from one `list_albums` pass
    pub fn populate(remote: &impl RemoteService) -> Result<Self> {
        let mut by_title = HashMap::new();
        for album in remote.list_albums()? {
            by_title.insert(album.title.clone(), album);
        }
        Ok(Self { by_title })
    }

    /// Look up an album by exact title
    pub fn get(&self, title: &str) -> Option<&AlbumDescriptor> {
        self.by_title.get(title)
    }

    /// Record a freshly created album
    pub fn insert(&mut self, album: AlbumDescriptor) {
        self.by_title.insert(album.title.clone(), album);
    }

    /// Number of known albums
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// Whether no albums are known
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticRemote(Vec<AlbumDescriptor>);

    impl RemoteService for StaticRemote {
        fn list_albums(&self) -> Result<Vec<AlbumDescriptor>> {
            Ok(self.0.clone())
        }
        fn create_album(&self, _title: &str) -> Result<AlbumDescriptor> {
            unreachable!("not exercised")
        }
        fn append_description(&self, _album: &AlbumDescriptor, _chunk: &str) -> Result<()> {
            unreachable!("not exercised")
        }
        fn upload_bytes(&self, _path: &Path) -> Result<UploadToken> {
            unreachable!("not exercised")
        }
        fn batch_attach(
            &self,
            _album: &AlbumDescriptor,
            _items: &[AttachItem],
        ) -> Result<Vec<AttachResult>> {
            unreachable!("not exercised")
        }
    }

    fn album(id: &str, title: &str) -> AlbumDescriptor {
        AlbumDescriptor {
            id: id.to_string(),
            title: title.to_string(),
            media_count: 0,
        }
    }

    #[test]
    fn test_registry_populate_and_lookup() {
        let remote = StaticRemote(vec![album("1", "Trip"), album("2", "Winter")]);
        let registry = AlbumRegistry::populate(&remote).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Trip").map(|a| a.id.as_str()), Some("1"));
        assert!(registry.get("trip").is_none());
    }

    #[test]
    fn test_registry_insert() {
        let mut registry = AlbumRegistry::default();
        assert!(registry.is_empty());
        registry.insert(album("9", "New"));
        assert_eq!(registry.get("New").map(|a| a.id.as_str()), Some("9"));
    }

    #[test]
    fn test_registry_title_is_exact_match() {
        let remote = StaticRemote(vec![album("1", "My Trip")]);
        let registry = AlbumRegistry::populate(&remote).unwrap();
        assert!(registry.get("My Trip ").is_none());
        assert!(registry.get("My Trip").is_some());
    }
}
