//! Slice layer.
//!
//! Partitioning, naming and the orchestration that turns one source image
//! into an ordered set of encoded slices.
//!
//! # Components
//!
//! - [`compute_heights`]: integer partition of the image height
//! - [`slice_windows`]: cumulative offsets for each slice
//! - [`summarize`]: min/max preview of a partition
//! - [`assign_filename`]: zero-padded, sort-stable file names
//! - [`SplitOptions`]: settings for one split
//! - [`SliceService`]: decode → partition → render pipeline
//!
//! # Example
//!
//! ```
//! use image_splitter::slice::{assign_filename, compute_heights, slice_windows, SplitMode};
//!
//! let heights = compute_heights(100, 3, SplitMode::Balanced).unwrap();
//! assert_eq!(heights, vec![34, 33, 33]);
//!
//! let windows = slice_windows(&heights);
//! assert_eq!(windows[2].offset_y, 67);
//!
//! assert_eq!(assign_filename("img", 3, 12, "png"), "img_03.png");
//! ```

mod naming;
mod options;
mod partition;
mod service;

pub use naming::{
    archive_name, assign_filename, check_prefix, decimal_digits, default_prefix, effective_prefix,
    is_bare_file_name,
    ARCHIVE_SUFFIX, DEFAULT_PREFIX,
};
pub use options::{
    total_height, SliceArtifact, SplitOptions, DEFAULT_SLICE_COUNT, MIN_SLICE_COUNT,
};
pub use partition::{
    compute_heights, slice_windows, summarize, HeightSummary, SliceWindow, SplitMode,
};
pub use service::{package, SliceProgress, SliceService};
