//! Error taxonomy for the data pipeline.
//!
//! End-of-file is deliberately absent: running out of lines is the
//! normal end of an epoch and is reported as `Pull::Exhausted`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for data pipeline fallible operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A manifest entry points at a file that is not on disk.
    #[error("source file '{}' does not exist", .path.display())]
    SourceFileMissing { path: PathBuf },

    #[error("cannot read manifest '{}': {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest '{}' does not list any project", .path.display())]
    ManifestEmpty { path: PathBuf },

    /// A line that is not valid UTF-8. Never fatal: the stream logs it
    /// and moves on to the next line.
    #[error("line {line} of '{}' is not valid UTF-8", .path.display())]
    MalformedLine { path: PathBuf, line: usize },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// The rotation cap was reached: that many files in a row hit
    /// end-of-file before filling a single batch.
    #[error(
        "no complete batch from {attempts} files in a row over '{}'",
        .manifest.display()
    )]
    NoCompleteBatch { manifest: PathBuf, attempts: usize },

    #[error("cannot start the corruption worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
