//! Checks whether a path is a real, fully downloaded file.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Extension of the stub files iCloud Drive leaves for files that are not downloaded yet.
pub const PLACEHOLDER_EXTENSION: &str = "icloud";

/// Result of probing a candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// Regular file that exists locally and can be read.
    Materialized,
    NotFound,
    /// Directory or other non-regular entry.
    NotAFile,
    /// Cloud placeholder for a file that has not been downloaded.
    Placeholder,
    PermissionDenied,
    /// Any other I/O error while probing.
    Inaccessible(io::ErrorKind),
}

impl AccessStatus {
    #[must_use]
    pub const fn is_materialized(self) -> bool {
        matches!(self, Self::Materialized)
    }

    fn from_io_error(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            kind => Self::Inaccessible(kind),
        }
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialized => write!(f, "available"),
            Self::NotFound => write!(f, "file not found"),
            Self::NotAFile => write!(f, "not a regular file"),
            Self::Placeholder => write!(f, "cloud file not downloaded"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Inaccessible(kind) => write!(f, "inaccessible: {kind}"),
        }
    }
}

/// Classify a candidate path.
///
/// A file counts as materialized when it is a regular file,
/// does not have one of the given placeholder extensions,
/// and can be opened for reading.
/// Extensions are compared case-insensitively.
#[must_use]
pub fn probe_access(path: &Path, placeholder_extensions: &[String]) -> AccessStatus {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(error) => return AccessStatus::from_io_error(&error),
    };
    if !metadata.is_file() {
        return AccessStatus::NotAFile;
    }
    if is_placeholder(path, placeholder_extensions) {
        return AccessStatus::Placeholder;
    }
    match File::open(path) {
        Ok(_) => AccessStatus::Materialized,
        Err(error) => AccessStatus::from_io_error(&error),
    }
}

/// Check a path with the default iCloud placeholder extension.
#[must_use]
pub fn is_materialized(path: &Path) -> bool {
    probe_access(path, &[PLACEHOLDER_EXTENSION.to_string()]).is_materialized()
}

fn is_placeholder(path: &Path, placeholder_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            placeholder_extensions
                .iter()
                .any(|placeholder| placeholder.trim_start_matches('.').eq_ignore_ascii_case(extension))
        })
}
