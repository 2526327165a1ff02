//! Output format, JPEG quality and background color.

use std::fmt;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Default JPEG quality as a fraction.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Lowest accepted JPEG quality fraction.
pub const MIN_QUALITY: f32 = 0.1;

/// Highest accepted JPEG quality fraction.
pub const MAX_QUALITY: f32 = 1.0;

// =============================================================================
// OutputFormat
// =============================================================================

/// Encoding used for every slice of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, keeps the alpha channel
    #[default]
    Png,

    /// Lossy, no alpha; composited over a background color
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("png"),
            OutputFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(format!(
                "unknown output format '{}' (expected 'png' or 'jpeg')",
                other
            )),
        }
    }
}

// =============================================================================
// Quality
// =============================================================================

/// Validate a JPEG quality fraction.
#[inline]
pub fn is_valid_quality(quality: f32) -> bool {
    (MIN_QUALITY..=MAX_QUALITY).contains(&quality)
}

/// Map a quality fraction to the encoder's 1-100 scale.
///
/// Out-of-range and NaN inputs are clamped.
#[inline]
pub fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return (DEFAULT_QUALITY * 100.0).round() as u8;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

// =============================================================================
// BackgroundColor
// =============================================================================

/// Opaque fill painted under JPEG slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(pub Rgb<u8>);

impl BackgroundColor {
    pub const WHITE: BackgroundColor = BackgroundColor(Rgb([0xff, 0xff, 0xff]));

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        BackgroundColor(Rgb([r, g, b]))
    }

    pub fn rgb(&self) -> Rgb<u8> {
        self.0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        BackgroundColor::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0 .0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for BackgroundColor {
    type Err = String;

    /// Parse `#rrggbb` or `#rgb`, with or without the `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{}': not a hex color", s));
        }

        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|e| format!("invalid color '{}': {}", s, e))
        };

        match hex.len() {
            6 => Ok(BackgroundColor::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(BackgroundColor::new(r * 17, g * 17, b * 17))
            }
            _ => Err(format!(
                "invalid color '{}': expected #rrggbb or #rgb",
                s
            )),
        }
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_string()
    }
}
