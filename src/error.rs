//! Error types and handling for albumsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only bundle-fatal and run-fatal conditions are modelled here. Non-fatal
//! conditions (a missing caption, a single failed upload) are logged at the
//! point of occurrence and never cross a function boundary as errors.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for albumsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    // Bundle errors (fatal for one bundle, the run continues)
    #[error("{bundle}: index page '{file}' not found")]
    #[diagnostic(
        code(albumsync::bundle::missing_index),
        help("Every bundle directory must contain the exported index page")
    )]
    MissingIndex { bundle: String, file: String },

    #[error("{bundle}: index page contains no album title")]
    #[diagnostic(
        code(albumsync::bundle::missing_title),
        help("The first non-empty text label of the index page is used as the album title")
    )]
    MissingTitle { bundle: String },

    #[error("{bundle}: media folder '{folder}/' not found")]
    #[diagnostic(
        code(albumsync::bundle::missing_media_folder),
        help("The high-resolution images folder name can be changed with --media-dir")
    )]
    MissingMediaFolder { bundle: String, folder: String },

    #[error("{bundle}: failed to attach batch {batch}: {reason}")]
    #[diagnostic(
        code(albumsync::remote::batch_attach_failed),
        help("Remaining batches of this bundle are abandoned; re-run to retry")
    )]
    BatchAttachFailed {
        bundle: String,
        batch: usize,
        reason: String,
    },

    // Startup errors (fatal for the whole run)
    #[error("progress pool misconfigured: {bars} bars but {options} option sets")]
    #[diagnostic(
        code(albumsync::progress::bar_count_mismatch),
        help("Declare exactly one option set per requested progress bar")
    )]
    BarCountMismatch { bars: usize, options: usize },

    #[error("no access token provided")]
    #[diagnostic(
        code(albumsync::remote::missing_token),
        help("Pass --token or set the ALBUMSYNC_TOKEN environment variable")
    )]
    MissingToken,

    #[error("root path is not a directory: {path}")]
    #[diagnostic(
        code(albumsync::fs::invalid_root),
        help("The root must be an existing directory with one bundle per subdirectory")
    )]
    InvalidRoot { path: String },

    // Remote service errors
    #[error("remote service error: {message}")]
    #[diagnostic(code(albumsync::remote::api_error))]
    RemoteApi { message: String },

    // Configuration errors
    #[error("failed to parse configuration file: {path}")]
    #[diagnostic(code(albumsync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(albumsync::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RemoteApi {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::MissingIndex {
            bundle: "trip-2019".to_string(),
            file: "index.html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "trip-2019: index page 'index.html' not found"
        );
    }

    #[test]
    fn test_error_code() {
        let err = SyncError::MissingTitle {
            bundle: "trip".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("albumsync::bundle::missing_title".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: [unclosed");
        let err: SyncError = parse_result.unwrap_err().into();
        assert!(matches!(err, SyncError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_bar_count_mismatch_display() {
        let err = SyncError::BarCountMismatch { bars: 2, options: 3 };
        assert!(err.to_string().contains("2 bars"));
        assert!(err.to_string().contains("3 option sets"));
    }

    #[test]
    fn test_batch_attach_failed_display() {
        let err = SyncError::BatchAttachFailed {
            bundle: "trip".to_string(),
            batch: 1,
            reason: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("batch 1"));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
