//! Bundle layout configuration (albumsync.yaml)
//!
//! Describes how an exported album bundle is laid out on disk: the index
//! page name, the high-resolution media folder, the per-image detail-pages
//! folder and the prefix the export tool puts on image file names. Defaults
//! match the export tool's output; an optional `albumsync.yaml` next to the
//! bundles overrides them, and CLI flags override both.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SyncError};

/// Optional configuration file name, looked up in the root directory
pub const CONFIG_FILE: &str = "albumsync.yaml";

/// Names of the files and folders that make up one exported bundle
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BundleLayout {
    /// Index page carrying the album title and description labels
    pub index_file: String,

    /// Folder of high-resolution images, one file per media item
    pub media_dir: String,

    /// Folder of per-image detail pages, `<item-id>.html` each
    pub detail_dir: String,

    /// Prefix the export tool adds to image file names ("hr" by default);
    /// stripped when deriving the item identifier
    pub image_prefix: String,
}

impl Default for BundleLayout {
    fn default() -> Self {
        Self {
            index_file: "index.html".to_string(),
            media_dir: "hrimages".to_string(),
            detail_dir: "imagepages".to_string(),
            image_prefix: "hr".to_string(),
        }
    }
}

impl BundleLayout {
    /// Parse a layout from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let layout: Self = serde_yaml::from_str(yaml)?;
        Ok(layout)
    }

    /// Load `albumsync.yaml` from the root directory, or fall back to defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(&path)?;
        Self::from_yaml(&yaml).map_err(|e| match e {
            SyncError::ConfigParseFailed { reason, .. } => SyncError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Overlay CLI-provided names on top of the loaded layout
    pub fn apply_overrides(
        &mut self,
        index_file: Option<String>,
        media_dir: Option<String>,
        detail_dir: Option<String>,
        image_prefix: Option<String>,
    ) {
        if let Some(v) = index_file {
            self.index_file = v;
        }
        if let Some(v) = media_dir {
            self.media_dir = v;
        }
        if let Some(v) = detail_dir {
            self.detail_dir = v;
        }
        if let Some(v) = image_prefix {
            self.image_prefix = v;
        }
    }
}
