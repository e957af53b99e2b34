use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use fndecode::decode::{Destination, Placement, Skipped, Summary};

use crate::config::Config;

/// Simple file logger for batch operations with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/fndecode/fndecode_<timestamp>.log
    pub(crate) fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let log_dir = home_dir.join("logs").join(env!("CARGO_PKG_NAME"));
        Self::in_directory(&log_dir)
    }

    pub(crate) fn in_directory(log_dir: &Path) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let log_path = log_dir.join(format!(
            "{}_{}.log",
            env!("CARGO_PKG_NAME"),
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        ));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: log_path,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log the batch settings
    pub(crate) fn log_init(&mut self, config: &Config) {
        let destination = match &config.destination {
            Destination::Directory(path) => path.display().to_string(),
            Destination::SourceDirectory => "<source directory>".to_string(),
        };
        let _ = writeln!(self.writer, "[{}] INIT \"{destination}\"", Self::timestamp());
        let _ = writeln!(self.writer, "  files: {}", config.paths.len());
        let _ = writeln!(self.writer, "  preserve_original: {}", config.preserve_original);
        let _ = writeln!(self.writer, "  naming: {:?}", config.options.naming);
        let _ = writeln!(
            self.writer,
            "  placeholder_extensions: {:?}",
            config.options.placeholder_extensions
        );
        let _ = writeln!(self.writer, "  dryrun: {}", config.options.dryrun);
        let _ = self.writer.flush();
    }

    pub(crate) fn log_placement(&mut self, placement: &Placement) {
        let _ = writeln!(
            self.writer,
            "[{}] {} \"{}\" -> \"{}\"",
            Self::timestamp(),
            placement.mode.verb().to_uppercase(),
            placement.source.display(),
            placement.destination.display()
        );
    }

    pub(crate) fn log_skipped(&mut self, skipped: &Skipped) {
        let _ = writeln!(
            self.writer,
            "[{}] SKIP \"{}\": {}",
            Self::timestamp(),
            skipped.path.display(),
            skipped.reason
        );
    }

    /// Log the final counts and flush
    pub(crate) fn log_summary(&mut self, summary: &Summary) {
        let _ = writeln!(self.writer, "[{}] DONE {summary}", Self::timestamp());
        let _ = self.writer.flush();
    }
}
