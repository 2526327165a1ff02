//! Split options and produced artifacts.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{
    is_valid_quality, BackgroundColor, OutputFormat, RenderSettings, DEFAULT_QUALITY, MAX_QUALITY,
    MIN_QUALITY,
};
use crate::error::SplitError;

use super::naming::{archive_name, check_prefix};
use super::partition::SplitMode;

/// Smallest slice count a split accepts.
pub const MIN_SLICE_COUNT: u32 = 2;

/// Default number of slices.
pub const DEFAULT_SLICE_COUNT: u32 = 2;

// =============================================================================
// SplitOptions
// =============================================================================

/// Settings for one split request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Number of slices (at least 2)
    pub slice_count: u32,

    /// Remainder-distribution policy
    pub mode: SplitMode,

    /// Encoding of every slice
    pub format: OutputFormat,

    /// JPEG quality fraction in `[0.1, 1.0]`
    pub quality: f32,

    /// File name prefix; blank means `"split"`
    pub prefix: String,

    /// Fill under transparent pixels for JPEG output
    pub background: BackgroundColor,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            slice_count: DEFAULT_SLICE_COUNT,
            mode: SplitMode::default(),
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            prefix: String::new(),
            background: BackgroundColor::default(),
        }
    }
}

impl SplitOptions {
    /// Options with the given slice count and defaults elsewhere.
    pub fn new(slice_count: u32) -> Self {
        Self {
            slice_count,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_background(mut self, background: BackgroundColor) -> Self {
        self.background = background;
        self
    }

    /// Check the options before any work starts.
    ///
    /// Quality is only checked for JPEG output since PNG ignores it.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.slice_count < MIN_SLICE_COUNT {
            return Err(SplitError::invalid(format!(
                "slice count must be at least {}, got {}",
                MIN_SLICE_COUNT, self.slice_count
            )));
        }

        if self.format == OutputFormat::Jpeg && !is_valid_quality(self.quality) {
            return Err(SplitError::invalid(format!(
                "quality must be between {} and {}, got {}",
                MIN_QUALITY, MAX_QUALITY, self.quality
            )));
        }

        check_prefix(&self.prefix).map_err(SplitError::invalid)?;

        Ok(())
    }

    /// Name of the archive for these options.
    pub fn archive_name(&self) -> String {
        archive_name(&self.prefix)
    }

    pub(crate) fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            format: self.format,
            quality: self.quality,
            background: self.background,
        }
    }
}

// =============================================================================
// SliceArtifact
// =============================================================================

/// One encoded slice, ready to be written or packaged.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceArtifact {
    /// 1-based position of the slice
    pub index: usize,

    /// Width in pixels (the source width)
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Encoded image bytes
    pub data: Bytes,

    /// Archive entry / file name
    pub filename: String,
}

/// Sum of the heights of `artifacts`.
pub fn total_height(artifacts: &[SliceArtifact]) -> u64 {
    artifacts.iter().map(|a| a.height as u64).sum()
}
