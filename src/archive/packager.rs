//! ZIP packaging of slice artifacts.
//!
//! # Determinism
//!
//! Entries are written in input order, `Stored` (the slices are already
//! compressed images), with a fixed 1980-01-01 timestamp and fixed
//! permissions. The same artifacts therefore always produce the same bytes.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use bytes::Bytes;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{ArchiveError, SplitError};
use crate::slice::{is_bare_file_name, SliceArtifact};

/// MIME type of the produced archive.
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";

/// Unix permissions recorded for every entry.
const ENTRY_PERMISSIONS: u32 = 0o644;

/// A packaged set of slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    /// Suggested download file name
    pub name: String,

    /// Serialized ZIP container
    pub data: Bytes,

    /// Number of entries in the container
    pub entry_count: usize,
}

/// Pack `artifacts` into a ZIP archive, one entry per artifact.
///
/// # Errors
///
/// - `InvalidArgument` if `artifacts` is empty
/// - `Packaging(DuplicateEntry)` if two artifacts share a file name
/// - `Packaging(MissingContent)` if an artifact has no bytes
/// - `Packaging(Zip)` if the writer fails
///
/// Nothing is returned unless every entry was written.
pub fn build_archive(
    artifacts: &[SliceArtifact],
    name: impl Into<String>,
) -> Result<Archive, SplitError> {
    if artifacts.is_empty() {
        return Err(SplitError::invalid("cannot build an archive with no slices"));
    }

    let mut seen = HashSet::with_capacity(artifacts.len());
    for artifact in artifacts {
        if !is_bare_file_name(&artifact.filename) {
            return Err(ArchiveError::UnsafeEntryName {
                name: artifact.filename.clone(),
            }
            .into());
        }
        if artifact.data.is_empty() {
            return Err(ArchiveError::MissingContent {
                name: artifact.filename.clone(),
            }
            .into());
        }
        if !seen.insert(artifact.filename.as_str()) {
            return Err(ArchiveError::DuplicateEntry {
                name: artifact.filename.clone(),
            }
            .into());
        }
    }

    let data = write_zip(artifacts)?;
    let name = name.into();
    debug!(
        archive = %name,
        entries = artifacts.len(),
        bytes = data.len(),
        "Built archive"
    );

    Ok(Archive {
        name,
        data,
        entry_count: artifacts.len(),
    })
}

fn write_zip(artifacts: &[SliceArtifact]) -> Result<Bytes, ArchiveError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for artifact in artifacts {
        writer.start_file(artifact.filename.as_str(), options)?;
        writer
            .write_all(&artifact.data)
            .map_err(|e| ArchiveError::Zip {
                message: e.to_string(),
            })?;
    }

    let cursor = writer.finish()?;
    Ok(Bytes::from(cursor.into_inner()))
}
