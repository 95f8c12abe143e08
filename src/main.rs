//! albumsync - photo-album bundle uploader
//!
//! Thin binary entry point: validates the root directory, builds the remote
//! client and the progress pool, and hands the run to the orchestrator.
//! Per-bundle failures are logged and never abort the run; only startup
//! misconfiguration exits non-zero.

use clap::Parser;
use std::path::Path;

use albumsync::cli::Cli;
use albumsync::config::BundleLayout;
use albumsync::error::{Result, SyncError};
use albumsync::progress::{self, BarOptions, ProgressPool};
use albumsync::remote::photos::PhotosClient;
use albumsync::sync::{REQUIRED_BARS, SyncOrchestrator};

/// Check that the supplied root exists and is a directory
fn check_root(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(SyncError::InvalidRoot {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut layout = BundleLayout::load_or_default(&cli.root)?;
    layout.apply_overrides(
        cli.index_file,
        cli.media_dir,
        cli.detail_dir,
        cli.image_prefix,
    );
    if cli.verbose {
        println!(
            "{}",
            progress::info(&format!(
                "Using layout: index '{}', media '{}/', details '{}/', image prefix '{}'",
                layout.index_file, layout.media_dir, layout.detail_dir, layout.image_prefix
            ))
        );
    }

    let token = cli.token.ok_or(SyncError::MissingToken)?;
    let client = PhotosClient::new(token)?;

    let mut pool = ProgressPool::for_stdout(
        REQUIRED_BARS,
        BarOptions::default(),
        vec![
            BarOptions {
                desc: Some("upload".to_string()),
                ..BarOptions::default()
            },
            BarOptions {
                desc: Some("images".to_string()),
                ..BarOptions::default()
            },
        ],
    )?;

    let mut orchestrator = SyncOrchestrator::new(&client, layout)?.with_verbose(cli.verbose);
    let report = orchestrator.sync_root(&cli.root, &mut pool)?;
    pool.write(&progress::info(&format!(
        "Done: {} synced, {} up to date, {} failed",
        report.synced, report.up_to_date, report.failed
    )));
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = check_root(&cli.root) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_root_directory() {
        let temp = TempDir::new().unwrap();
        assert!(check_root(temp.path()).is_ok());
    }

    #[test]
    fn test_check_root_missing() {
        let temp = TempDir::new().unwrap();
        let result = check_root(&temp.path().join("does-not-exist"));
        assert!(matches!(result, Err(SyncError::InvalidRoot { .. })));
    }

    #[test]
    fn test_check_root_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            check_root(&file),
            Err(SyncError::InvalidRoot { .. })
        ));
    }
}
