//! Slice partitioning.
//!
//! Splits an image height into per-slice row counts. The arithmetic is
//! integer-only so the same inputs always produce the same boundaries, and
//! the cumulative offsets derived from a partition tile `[0, total_height)`
//! with no gap and no overlap.
//!
//! # Modes
//!
//! - [`SplitMode::Balanced`]: the first `total % count` slices get one extra
//!   row, so all heights are within 1px of each other.
//! - [`SplitMode::Last`]: every slice gets `total / count` rows and the final
//!   slice also takes the remainder.
//!
//! ```text
//! total = 100, count = 3
//!
//! balanced  [34, 33, 33]   offsets 0, 34, 67
//! last      [33, 33, 34]   offsets 0, 33, 66
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

// =============================================================================
// SplitMode
// =============================================================================

/// Remainder-distribution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Spread the remainder over the first slices
    #[default]
    Balanced,

    /// Put the whole remainder on the final slice
    Last,
}

impl SplitMode {
    /// Lowercase name as accepted by [`FromStr`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Balanced => "balanced",
            SplitMode::Last => "last",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(SplitMode::Balanced),
            "last" => Ok(SplitMode::Last),
            other => Err(format!(
                "unknown split mode '{}' (expected 'balanced' or 'last')",
                other
            )),
        }
    }
}

// =============================================================================
// Heights
// =============================================================================

/// Compute the height of every slice.
///
/// The result has exactly `slice_count` entries and sums to `total_height`.
/// When `total_height < slice_count` some entries are 0; rejecting that is
/// left to the caller (the codec refuses zero-height windows).
///
/// # Errors
///
/// Returns [`SplitError::InvalidArgument`] if `slice_count` is 0.
pub fn compute_heights(
    total_height: u32,
    slice_count: u32,
    mode: SplitMode,
) -> Result<Vec<u32>, SplitError> {
    if slice_count < 1 {
        return Err(SplitError::invalid("slice count must be at least 1"));
    }

    let base = total_height / slice_count;
    let remainder = total_height % slice_count;

    let heights = match mode {
        SplitMode::Balanced => (0..slice_count)
            .map(|i| if i < remainder { base + 1 } else { base })
            .collect(),
        SplitMode::Last => {
            let mut heights = vec![base; slice_count as usize];
            // slice_count >= 1, so there is always a last element
            if let Some(last) = heights.last_mut() {
                *last += remainder;
            }
            heights
        }
    };

    Ok(heights)
}

// =============================================================================
// Windows
// =============================================================================

/// One slice's row range within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliceWindow {
    /// 1-based position of the slice
    pub index: usize,

    /// First source row of the slice
    pub offset_y: u32,

    /// Number of rows in the slice
    pub height: u32,
}

impl SliceWindow {
    /// One past the last source row.
    pub fn end_y(&self) -> u32 {
        self.offset_y + self.height
    }
}

/// Pair each height with its cumulative Y offset.
///
/// `offset(0) = 0` and `offset(i) = offset(i - 1) + height(i - 1)`.
pub fn slice_windows(heights: &[u32]) -> Vec<SliceWindow> {
    let mut offset_y = 0u32;
    heights
        .iter()
        .enumerate()
        .map(|(i, &height)| {
            let window = SliceWindow {
                index: i + 1,
                offset_y,
                height,
            };
            offset_y += height;
            window
        })
        .collect()
}

// =============================================================================
// Summary
// =============================================================================

/// Smallest and largest slice height of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeightSummary {
    pub min: u32,
    pub max: u32,
}

impl HeightSummary {
    /// Min/max of an already computed partition (`None` if empty).
    pub fn of(heights: &[u32]) -> Option<Self> {
        let min = heights.iter().copied().min()?;
        let max = heights.iter().copied().max()?;
        Some(Self { min, max })
    }
}

impl fmt::Display for HeightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{} px", self.min)
        } else {
            write!(f, "{} - {} px", self.min, self.max)
        }
    }
}

/// Preview the height range a split would produce.
///
/// Returns `None` when there is nothing to split (zero height or zero
/// slices), otherwise the min/max of [`compute_heights`].
pub fn summarize(total_height: u32, slice_count: u32, mode: SplitMode) -> Option<HeightSummary> {
    if total_height == 0 {
        return None;
    }
    let heights = compute_heights(total_height, slice_count, mode).ok()?;
    HeightSummary::of(&heights)
}

// =============================================================================
// Tests
// =============================================================================
