use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::decode::AccessStatus;

/// Whether the original file is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    Copy,
    Move,
}

impl PlacementMode {
    #[must_use]
    pub const fn from_preserve_original(preserve_original: bool) -> Self {
        if preserve_original { Self::Copy } else { Self::Move }
    }

    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Move => "Move",
        }
    }
}

/// A file that was placed into its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: PlacementMode,
}

/// Why a file was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Missing, not a regular file, or a cloud placeholder.
    NotMaterialized(AccessStatus),
    AccessDenied,
    /// Copy or move failed.
    PlacementFailed(String),
}

impl SkipReason {
    /// Permission errors while probing are reported as access denied.
    #[must_use]
    pub const fn from_access(status: AccessStatus) -> Self {
        match status {
            AccessStatus::PermissionDenied => Self::AccessDenied,
            status => Self::NotMaterialized(status),
        }
    }

    /// Classify a placement error.
    ///
    /// Any permission error in the error chain is reported as access denied.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        let permission_denied = error
            .chain()
            .filter_map(|cause| cause.downcast_ref::<io::Error>())
            .any(|io_error| io_error.kind() == io::ErrorKind::PermissionDenied);

        if permission_denied {
            Self::AccessDenied
        } else {
            Self::PlacementFailed(format!("{error:#}"))
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMaterialized(status) => write!(f, "not materialized ({status})"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::PlacementFailed(message) => write!(f, "placement failed: {message}"),
        }
    }
}

/// A file that was not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct Summary {
    pub placed: Vec<Placement>,
    pub skipped: Vec<Skipped>,
    /// Placements were only planned, nothing was changed on disk.
    pub dryrun: bool,
}

impl Summary {
    #[must_use]
    pub const fn new(dryrun: bool) -> Self {
        Self {
            placed: Vec::new(),
            skipped: Vec::new(),
            dryrun,
        }
    }

    #[must_use]
    pub const fn processed_count(&self) -> usize {
        self.placed.len()
    }

    #[must_use]
    pub const fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.placed.is_empty() && self.skipped.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.dryrun { "would be processed" } else { "processed" };
        write!(
            f,
            "{} file(s) {action}, {} skipped",
            self.processed_count(),
            self.skipped_count()
        )
    }
}
