//! HTTP request handlers for the image splitter API.
//!
//! # Endpoints
//!
//! - `POST /split` - Split the uploaded image and return a ZIP of the slices
//! - `GET /plan` - Preview slice heights for a given image height
//! - `GET /health` - Health check endpoint

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::archive::ARCHIVE_MIME_TYPE;
use crate::codec::{BackgroundColor, ImageCodec, OutputFormat, RasterCodec, DEFAULT_QUALITY};
use crate::error::{DecodeError, SplitError};
use crate::slice::{
    compute_heights, default_prefix, package, slice_windows, HeightSummary, SliceService,
    SplitMode, SplitOptions, DEFAULT_SLICE_COUNT,
};

/// Header carrying the number of slices in a `/split` response.
pub const SLICE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-slice-count");

/// Header carrying the comma-separated slice heights in a `/split` response.
pub const SLICE_HEIGHTS_HEADER: HeaderName = HeaderName::from_static("x-slice-heights");

/// Default upper bound on the slice count accepted over HTTP.
pub const DEFAULT_MAX_SLICES: u32 = 50;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the slice service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<C: RasterCodec = ImageCodec> {
    /// The slice service for processing split requests
    pub slice_service: SliceService<C>,

    /// Largest slice count a request may ask for
    pub max_slices: u32,
}

impl<C: RasterCodec + 'static> AppState<C> {
    /// Create a new application state with the given slice service.
    pub fn new(slice_service: SliceService<C>) -> Self {
        Self {
            slice_service,
            max_slices: DEFAULT_MAX_SLICES,
        }
    }

    /// Set the largest accepted slice count.
    pub fn with_max_slices(mut self, max_slices: u32) -> Self {
        self.max_slices = max_slices;
        self
    }

    fn check_slice_count(&self, slices: u32) -> Result<(), SplitError> {
        if slices > self.max_slices {
            return Err(SplitError::invalid(format!(
                "slice count {} exceeds the maximum of {}",
                slices, self.max_slices
            )));
        }
        Ok(())
    }
}

impl<C: RasterCodec> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            slice_service: self.slice_service.clone(),
            max_slices: self.max_slices,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for split requests.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SplitQueryParams {
    /// Number of slices (default: 2)
    pub slices: u32,

    /// `balanced` or `last` (default: balanced)
    pub mode: SplitMode,

    /// `png` or `jpeg` (default: png)
    pub format: OutputFormat,

    /// JPEG quality 0.1-1.0 (default: 0.8)
    pub quality: f32,

    /// File name prefix for the slices
    pub prefix: Option<String>,

    /// Original file name, used to derive a prefix when none is given
    pub filename: Option<String>,

    /// JPEG background color (default: #ffffff)
    pub background: BackgroundColor,
}

impl Default for SplitQueryParams {
    fn default() -> Self {
        Self {
            slices: DEFAULT_SLICE_COUNT,
            mode: SplitMode::default(),
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            prefix: None,
            filename: None,
            background: BackgroundColor::default(),
        }
    }
}

impl SplitQueryParams {
    /// Resolve the slice prefix: explicit prefix, then file name stem, then
    /// the default.
    pub fn resolve_prefix(&self) -> String {
        match (&self.prefix, &self.filename) {
            (Some(prefix), _) if !prefix.trim().is_empty() => prefix.clone(),
            (_, Some(filename)) if !filename.trim().is_empty() => default_prefix(filename),
            _ => String::new(),
        }
    }

    /// Convert to split options.
    pub fn to_options(&self) -> SplitOptions {
        SplitOptions::new(self.slices)
            .with_mode(self.mode)
            .with_format(self.format)
            .with_quality(self.quality)
            .with_prefix(self.resolve_prefix())
            .with_background(self.background)
    }
}

/// Query parameters for plan requests.
#[derive(Debug, Deserialize)]
pub struct PlanQueryParams {
    /// Source image height in pixels
    pub height: u32,

    /// Number of slices (default: 2)
    #[serde(default = "default_slices")]
    pub slices: u32,

    /// `balanced` or `last` (default: balanced)
    #[serde(default)]
    pub mode: SplitMode,
}

fn default_slices() -> u32 {
    DEFAULT_SLICE_COUNT
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_argument", "decode_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from the plan endpoint.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Height of every slice, in order
    pub heights: Vec<u32>,

    /// First row of every slice
    pub offsets: Vec<u32>,

    /// Preview label, e.g. "33 - 34 px" (absent for an empty image)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Smallest slice height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,

    /// Largest slice height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl PlanResponse {
    /// Partition `height` rows into `slices` and describe the result.
    ///
    /// The summary is absent for a zero-height image.
    pub fn compute(height: u32, slices: u32, mode: SplitMode) -> Result<Self, SplitError> {
        let heights = compute_heights(height, slices, mode)?;
        let offsets = slice_windows(&heights).iter().map(|w| w.offset_y).collect();
        let summary = if height == 0 {
            None
        } else {
            HeightSummary::of(&heights)
        };

        Ok(Self {
            heights,
            offsets,
            summary: summary.map(|s| s.to_string()),
            min: summary.map(|s| s.min),
            max: summary.map(|s| s.max),
        })
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert SplitError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 4xx errors are logged at WARN level (client errors)
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for SplitError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            // 400 Bad Request - Invalid parameters
            SplitError::InvalidArgument { .. } => (StatusCode::BAD_REQUEST, "invalid_argument"),

            // 400 for an empty body, 415 for unknown formats, 422 for broken images
            SplitError::Decode(DecodeError::Empty) => (StatusCode::BAD_REQUEST, "empty_body"),
            SplitError::Decode(DecodeError::UnsupportedFormat { .. }) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_format")
            }
            SplitError::Decode(DecodeError::Corrupt { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "decode_error")
            }

            // 500 Internal Server Error - processing errors
            SplitError::Render { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            SplitError::Packaging(_) => (StatusCode::INTERNAL_SERVER_ERROR, "packaging_error"),
        };
        let message = self.to_string();

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle split requests.
///
/// # Endpoint
///
/// `POST /split`
///
/// # Body
///
/// The raw image file (PNG, JPEG, GIF, BMP or WebP).
///
/// # Query Parameters
///
/// - `slices`: Number of slices (default: 2, max: server `max_slices`)
/// - `mode`: `balanced` or `last` (default: balanced)
/// - `format`: `png` or `jpeg` (default: png)
/// - `quality`: JPEG quality 0.1-1.0 (default: 0.8)
/// - `prefix`: Slice file name prefix
/// - `filename`: Original file name; its stem is the prefix when `prefix` is absent
/// - `background`: JPEG background color, URL-encoded hex (default: %23ffffff)
///
/// # Response
///
/// - `200 OK`: ZIP archive with `Content-Type: application/zip`
/// - `400 Bad Request`: Invalid options or empty body
/// - `413 Payload Too Large`: Upload exceeds the configured limit
/// - `415 Unsupported Media Type`: Body is not a supported image
/// - `422 Unprocessable Entity`: Image data is corrupt
/// - `500 Internal Server Error`: Rendering or packaging error
///
/// # Headers
///
/// - `Content-Disposition: attachment; filename="{prefix}_all.zip"`
/// - `X-Slice-Count: {n}`
/// - `X-Slice-Heights: {h1},{h2},...`
pub async fn split_handler<C: RasterCodec + 'static>(
    State(state): State<AppState<C>>,
    Query(query): Query<SplitQueryParams>,
    body: Bytes,
) -> Result<Response, SplitError> {
    state.check_slice_count(query.slices)?;
    let options = query.to_options();

    let artifacts = state.slice_service.process_image(body, &options).await?;

    let heights = artifacts
        .iter()
        .map(|a| a.height.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let archive = package(artifacts, options.archive_name()).await?;

    info!(
        archive = %archive.name,
        entries = archive.entry_count,
        bytes = archive.data.len(),
        "Split complete"
    );

    let headers = [
        (header::CONTENT_TYPE, ARCHIVE_MIME_TYPE.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&archive.name)),
        (header::CACHE_CONTROL, "no-store".to_string()),
        (SLICE_COUNT_HEADER, archive.entry_count.to_string()),
        (SLICE_HEIGHTS_HEADER, heights),
    ];

    Ok((StatusCode::OK, headers, archive.data).into_response())
}

/// Handle plan requests.
///
/// # Endpoint
///
/// `GET /plan?height={h}&slices={n}&mode={mode}`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "heights": [34, 33, 33],
///   "offsets": [0, 34, 67],
///   "summary": "33 - 34 px",
///   "min": 33,
///   "max": 34
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Zero slices or more than `max_slices`
pub async fn plan_handler<C: RasterCodec + 'static>(
    State(state): State<AppState<C>>,
    Query(query): Query<PlanQueryParams>,
) -> Result<Json<PlanResponse>, SplitError> {
    state.check_slice_count(query.slices)?;

    let plan = PlanResponse::compute(query.height, query.slices, query.mode)?;

    debug!(
        height = query.height,
        slices = query.slices,
        mode = %query.mode,
        "Planned split"
    );

    Ok(Json(plan))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build an attachment header value, replacing characters that cannot
/// appear in a quoted ASCII header.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

// =============================================================================
// Tests
// =============================================================================
