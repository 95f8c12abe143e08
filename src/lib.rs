//! albumsync - photo-album bundle uploader
//!
//! Synchronizes locally exported photo-album bundles (an index page,
//! per-image detail pages and a folder of high-resolution images per album)
//! with a remote photo-hosting service: resolves or creates the matching
//! remote album, extracts per-image captions, uploads each image and
//! attaches the uploads in capacity-bounded batches, skipping albums that
//! are already synced.

pub mod batch;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod progress;
pub mod remote;
pub mod sync;
