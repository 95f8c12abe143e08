//! Sync orchestration
//!
//! Drives one bundle at a time through album resolution, media enumeration,
//! per-image caption extraction and upload, batching and batched attach.
//! Execution is strictly sequential; every remote call blocks.
//!
//! Failure containment: bundle-fatal errors (missing index page, missing
//! title, missing media folder, a failed attach batch) abort only the
//! current bundle. Per-image failures are collected as typed outcomes and
//! the pass continues; nothing propagates past a single bundle.

use std::path::{Path, PathBuf};

use crate::batch::{self, MAX_BATCH_ATTACH_ITEMS};
use crate::bundle::{self, LocalBundle};
use crate::config::BundleLayout;
use crate::dom;
use crate::error::{Result, SyncError};
use crate::extract;
use crate::progress::{self, ProgressPool};
use crate::remote::{AlbumDescriptor, AlbumRegistry, AttachItem, RemoteService, UploadToken};

/// Pool index of the message/upload bar
pub const UPLOAD_BAR: usize = 0;
/// Pool index of the per-image bar
pub const IMAGE_BAR: usize = 1;
/// Bars the orchestrator expects in its pool
pub const REQUIRED_BARS: usize = 2;

/// One local image awaiting upload
#[derive(Debug, Clone)]
pub struct PendingMediaItem {
    pub path: PathBuf,
    /// File name with the export prefix stripped and extension removed
    pub item_id: String,
    pub caption: Option<String>,
}

/// A pending item plus the token the remote returned for its bytes
#[derive(Debug, Clone)]
pub struct UploadedMediaItem {
    pub item: PendingMediaItem,
    pub token: UploadToken,
}

/// A per-image failure recorded during the upload pass
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub item_id: String,
    pub reason: String,
}

/// Result of syncing one bundle
#[derive(Debug)]
pub enum BundleOutcome {
    /// Media was uploaded and attached
    Synced {
        uploaded: usize,
        attached: usize,
        failures: Vec<UploadFailure>,
    },
    /// The remote album already holds at least as many items as the bundle
    UpToDate,
}

/// Per-run tally over all bundles
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub synced: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

/// Drives bundle synchronization against a remote service
pub struct SyncOrchestrator<'a, R: RemoteService> {
    remote: &'a R,
    registry: AlbumRegistry,
    layout: BundleLayout,
    verbose: bool,
}

impl<'a, R: RemoteService> SyncOrchestrator<'a, R> {
    /// Build an orchestrator, populating the album registry with one
    /// `list_albums` call
    pub fn new(remote: &'a R, layout: BundleLayout) -> Result<Self> {
        let registry = AlbumRegistry::populate(remote)?;
        Ok(Self {
            remote,
            registry,
            layout,
            verbose: false,
        })
    }

    /// Log one line per uploaded image in addition to the stage messages
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sync every bundle subdirectory under `root`, containing failures at
    /// the bundle boundary. Returns the per-run tally; the only errors that
    /// escape are those raised before any bundle is touched.
    pub fn sync_root(&mut self, root: &Path, pool: &mut ProgressPool) -> Result<RunReport> {
        let mut report = RunReport::default();
        for bundle_root in bundle::bundle_roots(root)? {
            pool.bar(UPLOAD_BAR).reset();
            pool.bar(IMAGE_BAR).reset();

            let bundle = match LocalBundle::scan(&bundle_root) {
                Ok(bundle) => bundle,
                Err(e) => {
                    pool.write(&progress::error(&format!(
                        "{}: {e}",
                        bundle_root.display()
                    )));
                    report.failed += 1;
                    continue;
                }
            };

            pool.write(&progress::info(&format!("Processing {}", bundle.name)));
            match self.sync_bundle(&bundle, pool) {
                Ok(BundleOutcome::Synced {
                    uploaded,
                    attached,
                    failures,
                }) => {
                    report.synced += 1;
                    pool.write(&progress::info(&format!(
                        "{}: synced ({uploaded} uploaded, {attached} attached, {} skipped)",
                        bundle.name,
                        failures.len()
                    )));
                }
                Ok(BundleOutcome::UpToDate) => {
                    report.up_to_date += 1;
                    pool.write(&progress::info(&format!("{}: up to date", bundle.name)));
                }
                Err(e) => {
                    report.failed += 1;
                    pool.write(&progress::error(&format!(
                        "Failed to process {}: {e}",
                        bundle.name
                    )));
                }
            }
        }
        Ok(report)
    }

    /// Sync one bundle end to end
    pub fn sync_bundle(
        &mut self,
        bundle: &LocalBundle,
        pool: &mut ProgressPool,
    ) -> Result<BundleOutcome> {
        let album = self.resolve_album(bundle, pool)?;
        let Some(images) = self.enumerate_media(bundle, &album, pool)? else {
            return Ok(BundleOutcome::UpToDate);
        };
        let (uploaded, failures) = self.upload_media(bundle, images, pool);
        let uploaded_count = uploaded.len();
        let attached = self.attach_media(bundle, &album, uploaded, pool)?;
        Ok(BundleOutcome::Synced {
            uploaded: uploaded_count,
            attached,
            failures,
        })
    }

    /// Resolve the bundle's remote album by title, creating it (and
    /// submitting its description) when no existing album matches
    fn resolve_album(
        &mut self,
        bundle: &LocalBundle,
        pool: &mut ProgressPool,
    ) -> Result<AlbumDescriptor> {
        pool.write(&progress::info("Acquiring album"));
        if !bundle.has_file(&self.layout.index_file) {
            return Err(SyncError::MissingIndex {
                bundle: bundle.name.clone(),
                file: self.layout.index_file.clone(),
            });
        }

        let html = std::fs::read_to_string(bundle.path_of(&self.layout.index_file))?;
        let fragments = dom::index_fragments(&html);
        let meta = extract::extract_album_meta(&bundle.name, &fragments)?;

        if let Some(existing) = self.registry.get(&meta.title) {
            return Ok(existing.clone());
        }

        let album = self.remote.create_album(&meta.title)?;
        match &meta.description {
            Some(description) => {
                // The remote renders latest-first; submission_order is
                // already reversed so the heading ends up on top
                for chunk in description.submission_order() {
                    self.remote.append_description(&album, chunk)?;
                }
            }
            None => pool.write(&progress::info("No album description found")),
        }
        self.registry.insert(album.clone());
        Ok(album)
    }

    /// List the bundle's images, or `None` when the remote album already
    /// holds at least as many items (count heuristic, no identity check)
    fn enumerate_media(
        &self,
        bundle: &LocalBundle,
        album: &AlbumDescriptor,
        pool: &mut ProgressPool,
    ) -> Result<Option<Vec<PathBuf>>> {
        if !bundle.has_dir(&self.layout.media_dir) {
            return Err(SyncError::MissingMediaFolder {
                bundle: bundle.name.clone(),
                folder: self.layout.media_dir.clone(),
            });
        }
        let images = bundle::media_files(&bundle.path_of(&self.layout.media_dir))?;
        if album.media_count >= images.len() as u64 {
            pool.write(&progress::info("Already has all media. Skipping"));
            return Ok(None);
        }
        Ok(Some(images))
    }

    /// Upload every image, collecting per-image failures instead of
    /// aborting. The image bar advances one unit per image either way so
    /// its total stays accurate.
    fn upload_media(
        &self,
        bundle: &LocalBundle,
        images: Vec<PathBuf>,
        pool: &mut ProgressPool,
    ) -> (Vec<UploadedMediaItem>, Vec<UploadFailure>) {
        pool.write(&progress::info("Uploading media"));
        let total = images.len();
        pool.bar(IMAGE_BAR).set_total(total as u64);
        pool.bar(IMAGE_BAR).reset();

        let mut uploaded = Vec::new();
        let mut failures = Vec::new();
        for (i, path) in images.into_iter().enumerate() {
            pool.bar(UPLOAD_BAR)
                .set_message(&format!("Uploading {}/{total}", i + 1));
            let item_id = self.item_id(&path);
            match self.upload_one(bundle, &path, &item_id, pool) {
                Ok(item) => {
                    if self.verbose {
                        pool.write(&progress::info(&format!("Uploaded {item_id}")));
                    }
                    uploaded.push(item);
                }
                Err(reason) => {
                    pool.write(&progress::error(&format!("{item_id}: {reason}")));
                    failures.push(UploadFailure { item_id, reason });
                }
            }
            pool.bar(IMAGE_BAR).update(1);
        }

        if !failures.is_empty() {
            pool.write(&progress::warning(&format!(
                "{} of {total} images were not uploaded",
                failures.len()
            )));
        }
        (uploaded, failures)
    }

    /// Upload a single image after extracting its caption from the paired
    /// detail page. An unreadable detail page or a failed upload skips the
    /// image; a readable page without a caption only loses the caption.
    fn upload_one(
        &self,
        bundle: &LocalBundle,
        path: &Path,
        item_id: &str,
        pool: &mut ProgressPool,
    ) -> std::result::Result<UploadedMediaItem, String> {
        let detail_path = bundle
            .path_of(&self.layout.detail_dir)
            .join(format!("{item_id}.html"));
        let html = std::fs::read_to_string(&detail_path)
            .map_err(|e| format!("detail page {}: {e}", detail_path.display()))?;
        let caption = extract::extract_caption(dom::caption_text(&html));
        if caption.is_none() {
            pool.write(&progress::warning(&format!("{item_id} has no description!")));
        }

        let token = self
            .remote
            .upload_bytes(path)
            .map_err(|e| e.to_string())?;
        Ok(UploadedMediaItem {
            item: PendingMediaItem {
                path: path.to_path_buf(),
                item_id: item_id.to_string(),
                caption,
            },
            token,
        })
    }

    /// Attach uploaded items batch by batch, in order. A failed batch call
    /// abandons the remaining batches of this bundle.
    fn attach_media(
        &self,
        bundle: &LocalBundle,
        album: &AlbumDescriptor,
        uploaded: Vec<UploadedMediaItem>,
        pool: &mut ProgressPool,
    ) -> Result<usize> {
        if uploaded.is_empty() {
            return Ok(0);
        }
        pool.write(&progress::info("Attaching uploaded media to album"));

        let mut attached = 0;
        for (index, chunk) in batch::partition(uploaded, MAX_BATCH_ATTACH_ITEMS)
            .into_iter()
            .enumerate()
        {
            let items: Vec<AttachItem> = chunk
                .iter()
                .map(|u| AttachItem {
                    token: u.token.clone(),
                    item_id: u.item.item_id.clone(),
                    caption: u.item.caption.clone(),
                })
                .collect();
            let results = self.remote.batch_attach(album, &items).map_err(|e| {
                SyncError::BatchAttachFailed {
                    bundle: bundle.name.clone(),
                    batch: index,
                    reason: e.to_string(),
                }
            })?;
            for result in &results {
                if let Some(error) = &result.error {
                    pool.write(&progress::warning(&format!(
                        "{}: {error}",
                        result.item_id
                    )));
                }
            }
            // Items the remote rejected inside a successful call do not
            // count as attached
            attached += results.iter().filter(|r| r.error.is_none()).count();
        }
        Ok(attached)
    }

    /// Derive the item identifier: file stem with the export prefix stripped
    fn item_id(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match stem.strip_prefix(&self.layout.image_prefix) {
            Some(stripped) => stripped.to_string(),
            None => stem,
        }
    }
}
