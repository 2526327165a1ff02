//! HTTP server layer for the image splitter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /split  ·  GET /plan  ·  GET /health                │
//! │                                                                 │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐  │
//! │  │         handlers          │  │          routes           │  │
//! │  │ (requests, error mapping) │  │ (CORS, limits, tracing)   │  │
//! │  └───────────────────────────┘  └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, plan_handler, split_handler, AppState, ErrorResponse, HealthResponse,
    PlanQueryParams, PlanResponse, SplitQueryParams, DEFAULT_MAX_SLICES, SLICE_COUNT_HEADER,
    SLICE_HEIGHTS_HEADER,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_BYTES};
