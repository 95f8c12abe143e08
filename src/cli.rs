//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::Parser;
use std::path::PathBuf;

/// albumsync - photo-album bundle uploader
///
/// Synchronize locally exported photo-album bundles with a remote photo
/// hosting service.
#[derive(Parser, Debug)]
#[command(
    name = "albumsync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Sync exported photo-album bundles to a remote photo service",
    long_about = "albumsync uploads locally exported photo-album bundles (an index page, \
                  per-image detail pages and a folder of high-resolution images per album) \
                  to a remote photo service, creating or reusing the matching remote album \
                  and skipping albums that are already synced.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  albumsync ./exported-albums --token $TOKEN\n    \
                  ALBUMSYNC_TOKEN=$TOKEN albumsync ./exported-albums\n    \
                  albumsync ./exported-albums --media-dir fullsize --image-prefix big"
)]
pub struct Cli {
    /// Root directory containing one exported album bundle per subdirectory
    pub root: PathBuf,

    /// Access token for the remote photo service
    #[arg(long, env = "ALBUMSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name of the index page inside each bundle
    #[arg(long, value_name = "FILE")]
    pub index_file: Option<String>,

    /// Name of the high-resolution images folder inside each bundle
    #[arg(long, value_name = "DIR")]
    pub media_dir: Option<String>,

    /// Name of the per-image detail-pages folder inside each bundle
    #[arg(long, value_name = "DIR")]
    pub detail_dir: Option<String>,

    /// Prefix stripped from image file names when deriving item identifiers
    #[arg(long, value_name = "PREFIX")]
    pub image_prefix: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
