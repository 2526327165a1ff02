//! Output file naming.
//!
//! Slice files are named `{prefix}_{index}.{ext}` with the index zero-padded
//! to the number of digits in the slice count, so `img_02.png` sorts before
//! `img_10.png` in every file listing.

use std::path::Path;

/// Prefix used when the caller supplies an empty one.
pub const DEFAULT_PREFIX: &str = "split";

/// Suffix appended to the prefix to name the archive.
pub const ARCHIVE_SUFFIX: &str = "_all.zip";

/// Number of decimal digits in `n` (`0` has one digit).
pub fn decimal_digits(n: usize) -> usize {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Return `prefix`, or [`DEFAULT_PREFIX`] if it is blank.
pub fn effective_prefix(prefix: &str) -> &str {
    if prefix.trim().is_empty() {
        DEFAULT_PREFIX
    } else {
        prefix
    }
}

/// Check that `prefix` yields bare file names.
///
/// Path separators, drive colons and control characters are rejected, so a
/// slice name can never address a location outside the archive root or the
/// output directory.
pub fn check_prefix(prefix: &str) -> Result<(), String> {
    match prefix.chars().find(|&c| is_forbidden_char(c)) {
        Some(c) => Err(format!("prefix {:?} must not contain {:?}", prefix, c)),
        None => Ok(()),
    }
}

/// Whether `name` is a single path component safe to write anywhere.
pub fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.chars().any(is_forbidden_char)
}

fn is_forbidden_char(c: char) -> bool {
    matches!(c, '/' | '\\' | ':') || c.is_control()
}

/// Name of the file holding slice `index` (1-based) out of `total_count`.
///
/// ```
/// use image_splitter::slice::assign_filename;
///
/// assert_eq!(assign_filename("img", 3, 12, "png"), "img_03.png");
/// assert_eq!(assign_filename("img", 3, 150, "png"), "img_003.png");
/// assert_eq!(assign_filename("", 1, 2, "jpg"), "split_1.jpg");
/// ```
pub fn assign_filename(prefix: &str, index: usize, total_count: usize, extension: &str) -> String {
    let width = decimal_digits(total_count);
    format!(
        "{}_{:0width$}.{}",
        effective_prefix(prefix),
        index,
        extension,
        width = width
    )
}

/// Name of the archive bundling all slices of `prefix`.
pub fn archive_name(prefix: &str) -> String {
    format!("{}{}", effective_prefix(prefix), ARCHIVE_SUFFIX)
}

/// Derive a prefix from a source file name by dropping its directory and
/// its last extension.
///
/// Names without a usable stem (e.g. `.hidden`) are returned whole.
pub fn default_prefix(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    match base.rfind('.') {
        Some(dot) if dot > 0 => base[..dot].to_string(),
        _ => base.to_string(),
    }
}
