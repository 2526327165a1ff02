//! Archive packaging.
//!
//! Bundles rendered slices into a single ZIP container that any standard
//! archive tool can open. Entry names come from
//! [`assign_filename`](crate::slice::assign_filename), entry bytes are the
//! encoded slices unchanged.

mod packager;

pub use packager::{build_archive, Archive, ARCHIVE_MIME_TYPE};
