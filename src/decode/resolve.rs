use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::decode::access::{PLACEHOLDER_EXTENSION, probe_access};
use crate::decode::name::{
    NamingStyle, decoded_file_name, entry_exists, first_free_name, is_valid_file_name, normalize_path,
};
use crate::decode::summary::{Placement, PlacementMode, SkipReason, Skipped, Summary};

/// Where decoded files are placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Single target directory, created if missing.
    Directory(PathBuf),
    /// Next to each source file.
    SourceDirectory,
}

/// Resolver settings shared by every batch.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub naming: NamingStyle,
    pub placeholder_extensions: Vec<String>,
    pub dryrun: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            naming: NamingStyle::default(),
            placeholder_extensions: vec![PLACEHOLDER_EXTENSION.to_string()],
            dryrun: false,
        }
    }
}

/// The target directory could not be created, so no file in the batch can be placed.
#[derive(Debug)]
pub struct TargetDirectoryError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for TargetDirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to create target directory '{}': {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for TargetDirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decodes file names and places the files into a destination.
#[derive(Debug, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    #[must_use]
    pub const fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Decode and place every path of one batch.
    ///
    /// Paths are normalized and deduplicated, then processed in order.
    /// Files that fail are recorded as skipped and the batch continues.
    ///
    /// # Errors
    /// Returns an error only if the target directory cannot be created.
    pub fn resolve_batch<S: AsRef<str>>(
        &self,
        paths: &[S],
        destination: &Destination,
        preserve_original: bool,
    ) -> Result<Summary, TargetDirectoryError> {
        let mode = PlacementMode::from_preserve_original(preserve_original);

        if let Destination::Directory(directory) = destination
            && !self.options.dryrun
        {
            fs::create_dir_all(directory).map_err(|source| TargetDirectoryError {
                path: directory.clone(),
                source,
            })?;
        }

        let mut summary = Summary::new(self.options.dryrun);
        let mut reserved: HashSet<PathBuf> = HashSet::new();

        for path in paths
            .iter()
            .map(|raw_path| normalize_path(raw_path.as_ref()))
            .unique()
            .map(PathBuf::from)
        {
            let status = probe_access(&path, &self.options.placeholder_extensions);
            if !status.is_materialized() {
                summary.skipped.push(Skipped {
                    path,
                    reason: SkipReason::from_access(status),
                });
                continue;
            }

            let target_directory = match destination {
                Destination::Directory(directory) => directory.clone(),
                Destination::SourceDirectory => source_directory(&path),
            };
            let decoded_name = decoded_file_name(&path);

            match self.place(&path, &target_directory, &decoded_name, mode, &mut reserved) {
                Ok(final_path) => summary.placed.push(Placement {
                    source: path,
                    destination: final_path,
                    mode,
                }),
                Err(error) => summary.skipped.push(Skipped {
                    reason: SkipReason::from_error(&error),
                    path,
                }),
            }
        }

        Ok(summary)
    }

    /// Place a single file into the target directory under a collision-free name.
    ///
    /// Copies the file and its timestamps when `preserve_original` is set,
    /// otherwise moves it.
    ///
    /// # Errors
    /// Returns an error if the decoded name is not a valid file name or the copy or move fails.
    pub fn place_file(
        &self,
        source: &Path,
        target_directory: &Path,
        decoded_name: &str,
        preserve_original: bool,
    ) -> Result<PathBuf> {
        self.place(
            source,
            target_directory,
            decoded_name,
            PlacementMode::from_preserve_original(preserve_original),
            &mut HashSet::new(),
        )
    }

    fn place(
        &self,
        source: &Path,
        target_directory: &Path,
        decoded_name: &str,
        mode: PlacementMode,
        reserved: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        if !is_valid_file_name(decoded_name) {
            anyhow::bail!("Decoded name is not a valid file name: '{decoded_name}'");
        }

        // Moving a file onto itself would only rename it to a numbered copy
        if mode == PlacementMode::Move
            && source.file_name() == Some(OsStr::new(decoded_name))
            && same_directory(&source_directory(source), target_directory)
        {
            return Ok(source.to_path_buf());
        }

        let final_name = first_free_name(target_directory, decoded_name, self.options.naming, |candidate| {
            reserved.contains(candidate) || entry_exists(candidate)
        });
        let destination = target_directory.join(final_name);

        if self.options.dryrun {
            reserved.insert(destination.clone());
            return Ok(destination);
        }

        match mode {
            PlacementMode::Copy => copy_preserving_times(source, &destination)?,
            PlacementMode::Move => move_file(source, &destination)?,
        }
        Ok(destination)
    }
}

/// Parent directory of a file, using `.` for bare file names.
fn source_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Copy file contents and permissions, then carry over access and modification times.
fn copy_preserving_times(source: &Path, destination: &Path) -> Result<()> {
    let metadata =
        fs::metadata(source).with_context(|| format!("Failed to read metadata for {}", source.display()))?;

    discard_on_error(
        fs::copy(source, destination)
            .with_context(|| format!("Failed to copy {} to {}", source.display(), destination.display())),
        destination,
    )?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    discard_on_error(
        File::options()
            .write(true)
            .open(destination)
            .or_else(|_| File::open(destination))
            .and_then(|file| file.set_times(times))
            .with_context(|| format!("Failed to preserve file times for {}", destination.display())),
        destination,
    )
}

/// Remove a partially placed destination when a placement step fails.
fn discard_on_error<T>(result: Result<T>, destination: &Path) -> Result<T> {
    if result.is_err() {
        let _ = fs::remove_file(destination);
    }
    result
}

/// Rename the file, falling back to copy and delete across filesystems.
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            copy_preserving_times(source, destination)?;
            discard_on_error(
                fs::remove_file(source).with_context(|| format!("Failed to remove original {}", source.display())),
                destination,
            )
        }
        Err(error) => Err(error)
            .with_context(|| format!("Failed to move {} to {}", source.display(), destination.display())),
    }
}
