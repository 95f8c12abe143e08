//! Local bundle discovery
//!
//! A bundle is one export directory representing a single album. Scanning
//! takes a flat snapshot of the directory (files and subdirectories directly
//! under it); re-scanning builds a new snapshot.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Snapshot of one exported album directory
#[derive(Debug, Clone)]
pub struct LocalBundle {
    /// Bundle root directory
    pub root: PathBuf,
    /// File names directly under the root
    pub files: Vec<String>,
    /// Subdirectory names directly under the root
    pub dirs: Vec<String>,
    /// Display name, the root's final path segment
    pub name: String,
}

impl LocalBundle {
    /// Take a snapshot of a bundle directory
    pub fn scan(path: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().is_dir() {
                dirs.push(name);
            } else if entry.file_type().is_file() {
                files.push(name);
            }
        }
        files.sort();
        dirs.sort();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            root: path.to_path_buf(),
            files,
            dirs,
            name,
        })
    }

    /// Whether a file with this name exists directly under the root
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    /// Whether a subdirectory with this name exists directly under the root
    pub fn has_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d == name)
    }

    /// Absolute path of a name under the bundle root
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// List the bundle roots under a directory: every direct subdirectory,
/// in sorted order
pub fn bundle_roots(root: &Path) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if entry.file_type().is_dir() {
            roots.push(entry.into_path());
        }
    }
    roots.sort();
    Ok(roots)
}

/// List the image files of a media folder, in sorted order
pub fn media_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
