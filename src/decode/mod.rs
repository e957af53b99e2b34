//! Batch filename decoding.
//!
//! Fixes percent-encoded file names (for example `Quarterly%20Report.pdf` synced from cloud storage)
//! by decoding the name and copying or moving the file into a target directory
//! without overwriting anything that already exists there.
//!
//! The [`Resolver`] is stateless between batches:
//! callers hand it the raw paths of one user action together with a [`Destination`]
//! and get back a [`Summary`] of placed and skipped files.

mod access;
mod config;
mod name;
mod resolve;
mod summary;

pub use access::{AccessStatus, PLACEHOLDER_EXTENSION, is_materialized, probe_access};
pub use config::DecodeConfig;
pub use name::{
    NamingStyle, decode_name, decoded_file_name, is_valid_file_name, normalize_path, parse_drop_payload,
    unique_file_name,
};
pub use resolve::{Destination, Resolver, ResolverOptions, TargetDirectoryError};
pub use summary::{Placement, PlacementMode, SkipReason, Skipped, Summary};
