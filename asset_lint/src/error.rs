use std::path::PathBuf;

use thiserror::Error;

/// Fatal precondition failures. Anything here aborts the whole check;
/// per-file decode problems never surface through this type, they are
/// swallowed where they occur and the file is skipped.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("content root not found: {0}")]
    MissingContentRoot(PathBuf),

    #[error("scan root not found: {0}")]
    MissingScanRoot(PathBuf),

    #[error("settings file not found: {0}")]
    MissingSettings(PathBuf),

    #[error("build manifest not found: {0}")]
    MissingBuildManifest(PathBuf),

    #[error("config file {path} is invalid: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("read failed for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
