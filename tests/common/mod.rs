//! Shared test fixtures: a recording mock remote and bundle-tree builders

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use albumsync::error::{Result, SyncError};
use albumsync::remote::{
    AlbumDescriptor, AttachItem, AttachResult, RemoteService, UploadToken,
};

/// One recorded remote call, in order of occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    ListAlbums,
    CreateAlbum(String),
    AppendDescription(String),
    Upload(String),
    /// Attached (item_id, caption) pairs, one batch per call
    BatchAttach(Vec<(String, Option<String>)>),
}

/// In-memory remote that records every call
#[derive(Default)]
pub struct RecordingRemote {
    pub albums: Vec<AlbumDescriptor>,
    pub fail_upload_files: HashSet<String>,
    calls: RefCell<Vec<RemoteCall>>,
}

impl RecordingRemote {
    pub fn with_album(title: &str, media_count: u64) -> Self {
        Self {
            albums: vec![AlbumDescriptor {
                id: "existing".to_string(),
                title: title.to_string(),
                media_count,
            }],
            ..Self::default()
        }
    }

    pub fn failing_uploads(names: &[&str]) -> Self {
        Self {
            fail_upload_files: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RemoteCall::Upload(_)))
            .count()
    }

    pub fn attach_batches(&self) -> Vec<Vec<(String, Option<String>)>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RemoteCall::BatchAttach(items) => Some(items),
                _ => None,
            })
            .collect()
    }
}

impl RemoteService for RecordingRemote {
    fn list_albums(&self) -> Result<Vec<AlbumDescriptor>> {
        self.calls.borrow_mut().push(RemoteCall::ListAlbums);
        Ok(self.albums.clone())
    }

    fn create_album(&self, title: &str) -> Result<AlbumDescriptor> {
        self.calls
            .borrow_mut()
            .push(RemoteCall::CreateAlbum(title.to_string()));
        Ok(AlbumDescriptor {
            id: format!("created-{title}"),
            title: title.to_string(),
            media_count: 0,
        })
    }

    fn append_description(&self, _album: &AlbumDescriptor, chunk: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(RemoteCall::AppendDescription(chunk.to_string()));
        Ok(())
    }

    fn upload_bytes(&self, path: &Path) -> Result<UploadToken> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.calls.borrow_mut().push(RemoteCall::Upload(name.clone()));
        if self.fail_upload_files.contains(&name) {
            return Err(SyncError::RemoteApi {
                message: format!("upload rejected: {name}"),
            });
        }
        Ok(UploadToken(format!("tok-{name}")))
    }

    fn batch_attach(
        &self,
        _album: &AlbumDescriptor,
        items: &[AttachItem],
    ) -> Result<Vec<AttachResult>> {
        self.calls.borrow_mut().push(RemoteCall::BatchAttach(
            items
                .iter()
                .map(|i| (i.item_id.clone(), i.caption.clone()))
                .collect(),
        ));
        Ok(items
            .iter()
            .map(|i| AttachResult {
                item_id: i.item_id.clone(),
                error: None,
            })
            .collect())
    }
}

/// Write one bundle directory under `root` with the default layout names
pub fn write_bundle(
    root: &Path,
    name: &str,
    index_fragments: &[&str],
    images: &[&str],
    captions: &[(&str, &str)],
) -> PathBuf {
    let bundle_root = root.join(name);
    std::fs::create_dir_all(bundle_root.join("hrimages")).unwrap();
    std::fs::create_dir_all(bundle_root.join("imagepages")).unwrap();

    let spans: String = index_fragments
        .iter()
        .map(|f| format!("<span>{f}</span>"))
        .collect();
    std::fs::write(
        bundle_root.join("index.html"),
        format!("<html><body>{spans}</body></html>"),
    )
    .unwrap();

    for image in images {
        std::fs::write(bundle_root.join("hrimages").join(image), b"jpegdata").unwrap();
    }
    for (item_id, caption) in captions {
        std::fs::write(
            bundle_root.join("imagepages").join(format!("{item_id}.html")),
            format!("<html><body><div class=\"imagetitle\">{caption}</div></body></html>"),
        )
        .unwrap();
    }
    bundle_root
}
