//! Router configuration for the image splitter.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! upload limits and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health          - Health check
//! /plan            - Preview slice heights (GET)
//! /split           - Split an uploaded image into a ZIP (POST)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use image_splitter::server::routes::{create_router, RouterConfig};
//! use image_splitter::slice::SliceService;
//!
//! let config = RouterConfig::new()
//!     .with_max_upload_bytes(20 * 1024 * 1024)
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(SliceService::new(), config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, plan_handler, split_handler, AppState, DEFAULT_MAX_SLICES,
    SLICE_COUNT_HEADER, SLICE_HEIGHTS_HEADER,
};
use crate::codec::RasterCodec;
use crate::slice::SliceService;

/// Default upload limit: 50MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Largest slice count a request may ask for
    pub max_slices: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Uploads are limited to 50MB
    /// - At most 50 slices per request
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_slices: DEFAULT_MAX_SLICES,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the request body limit in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Set the largest accepted slice count.
    pub fn with_max_slices(mut self, max_slices: u32) -> Self {
        self.max_slices = max_slices;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Health, plan and split routes
/// - Request body limit on uploads
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<C>(slice_service: SliceService<C>, config: RouterConfig) -> Router
where
    C: RasterCodec + 'static,
{
    let app_state = AppState::new(slice_service).with_max_slices(config.max_slices);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/plan", get(plan_handler::<C>))
        .route(
            "/split",
            post(split_handler::<C>).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .with_state(app_state)
        .layer(cors);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION, SLICE_COUNT_HEADER, SLICE_HEIGHTS_HEADER])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
