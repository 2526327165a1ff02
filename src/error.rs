use thiserror::Error;

/// Errors produced while decoding the source image
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// No bytes were supplied
    #[error("Source image is empty")]
    Empty,

    /// Bytes do not look like any supported image format (should map to HTTP 415)
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    /// Format was recognized but the data could not be decoded
    #[error("Corrupt image data: {message}")]
    Corrupt { message: String },
}

/// Errors produced while rendering a single slice
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Requested window has no pixels
    #[error("Cannot render a {width}x{height} slice")]
    ZeroArea { width: u32, height: u32 },

    /// Requested window extends past the bottom of the source image
    #[error("Slice at row {y} with height {height} exceeds image height {image_height}")]
    OutOfBounds {
        y: u32,
        height: u32,
        image_height: u32,
    },

    /// Encoder rejected the pixels
    #[error("Encoding failed: {message}")]
    Encode { message: String },
}

/// Errors produced while packing slices into an archive
#[derive(Debug, Clone, Error)]
pub enum ArchiveError {
    /// Two artifacts resolved to the same entry name
    #[error("Duplicate archive entry: {name}")]
    DuplicateEntry { name: String },

    /// Entry name is not a bare file name
    #[error("Archive entry name {name:?} is not a plain file name")]
    UnsafeEntryName { name: String },

    /// Artifact carries no encoded bytes
    #[error("Archive entry {name} has no content")]
    MissingContent { name: String },

    /// Error from the ZIP writer
    #[error("ZIP error: {message}")]
    Zip { message: String },
}

/// Top-level error for every split and packaging operation
#[derive(Debug, Clone, Error)]
pub enum SplitError {
    /// Options or inputs rejected before any work started
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Source image could not be decoded
    #[error("Decode failure: {0}")]
    Decode(#[from] DecodeError),

    /// A slice could not be rendered; the whole batch is aborted
    #[error("Render failure on slice {index}: {source}")]
    Render {
        index: usize,
        #[source]
        source: RenderError,
    },

    /// Archive serialization failed
    #[error("Packaging failure: {0}")]
    Packaging(#[from] ArchiveError),
}

impl SplitError {
    /// Shorthand for an [`SplitError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        SplitError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Attach a 1-based slice index to a render error.
    pub fn render(index: usize, source: RenderError) -> Self {
        SplitError::Render { index, source }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Zip {
            message: err.to_string(),
        }
    }
}
