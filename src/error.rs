//! Error taxonomy for the transform.
//!
//! A filter mismatch is deliberately not represented here: it is a
//! pass-through signal (`Ok(None)` from the load hook), not a failure.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type TransformResult<T> = Result<T, TransformError>;

/// Failures surfaced to the host build process.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Source asset missing or unreadable during classification. Fatal for
    /// the module being loaded.
    #[error("failed to read asset {path}")]
    Read {
        /// Source path of the asset that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// One or more externalized assets failed to copy during finalization.
    /// Fatal for the build as a whole; every failing pair is listed.
    #[error("failed to copy {} asset(s): {}", .0.len(), format_failures(.0))]
    Copy(Vec<CopyFailure>),

    /// Invalid option value, such as a filter rule that is not a valid glob
    /// pattern. Raised when the transform is constructed, never as a silent
    /// false match.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A hook was invoked outside its lifecycle phase, e.g. finalizing twice
    /// or loading a module after finalization.
    #[error("{0}")]
    Lifecycle(&'static str),
}

/// A single failed copy recorded during finalization.
#[derive(Debug)]
pub struct CopyFailure {
    /// Source path the copy read from.
    pub source: PathBuf,
    /// Resolved destination path the copy wrote to.
    pub destination: PathBuf,
    /// Underlying I/O error.
    pub error: std::io::Error,
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.source.display(),
            self.destination.display(),
            self.error
        )
    }
}

fn format_failures(failures: &[CopyFailure]) -> String {
    failures
        .iter()
        .map(CopyFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
