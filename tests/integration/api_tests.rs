//! API integration tests for the HTTP endpoints.
//!
//! Tests verify:
//! - Split uploads return a ZIP with the expected entries and headers
//! - Plan and health responses
//! - HTTP status codes for invalid options, bad uploads and limits

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use image_splitter::slice::SliceService;
use image_splitter::{create_router, RouterConfig};

use super::test_utils::{
    create_png, garbage_bytes, is_valid_jpeg, is_valid_zip, read_zip_entries, truncated_png,
};

fn test_router() -> Router {
    create_router(SliceService::new(), RouterConfig::new().with_tracing(false))
}

fn split_request(query: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/split{}", query))
        .header("content-type", "application/octet-stream")
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Split Endpoint
// =============================================================================

#[tokio::test]
async fn test_split_returns_archive() {
    let response = test_router()
        .oneshot(split_request("?slices=3&prefix=banner", create_png(10, 100)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "application/zip");
    assert_eq!(
        headers.get("content-disposition").unwrap(),
        "attachment; filename=\"banner_all.zip\""
    );
    assert_eq!(headers.get("x-slice-count").unwrap(), "3");
    assert_eq!(headers.get("x-slice-heights").unwrap(), "34,33,33");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_zip(&body));

    let names: Vec<String> = read_zip_entries(&body)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["banner_1.png", "banner_2.png", "banner_3.png"]);
}

#[tokio::test]
async fn test_split_with_filename_and_jpeg() {
    let response = test_router()
        .oneshot(split_request(
            "?slices=2&mode=last&format=jpeg&quality=0.7&filename=holiday.photo.png",
            create_png(8, 9),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"holiday.photo_all.zip\""
    );
    assert_eq!(response.headers().get("x-slice-heights").unwrap(), "4,5");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let entries = read_zip_entries(&body);
    assert_eq!(entries[0].0, "holiday.photo_1.jpg");
    assert_eq!(entries[1].0, "holiday.photo_2.jpg");
    assert!(entries.iter().all(|(_, data)| is_valid_jpeg(data)));
}

#[tokio::test]
async fn test_split_defaults() {
    let response = test_router()
        .oneshot(split_request("", create_png(4, 4)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"split_all.zip\""
    );
    assert_eq!(response.headers().get("x-slice-count").unwrap(), "2");
}

#[tokio::test]
async fn test_split_with_background_color() {
    let response = test_router()
        .oneshot(split_request(
            "?format=jpg&background=%23102030",
            create_png(4, 4),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Split Errors
// =============================================================================

#[tokio::test]
async fn test_split_invalid_slice_count() {
    let response = test_router()
        .oneshot(split_request("?slices=1", create_png(4, 10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "invalid_argument");
    assert_eq!(error["status"], 400);
}

#[tokio::test]
async fn test_split_invalid_quality() {
    let response = test_router()
        .oneshot(split_request("?format=jpeg&quality=0", create_png(4, 10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "invalid_argument");
}

#[tokio::test]
async fn test_split_path_like_prefix_rejected() {
    for query in ["?prefix=..%2F..%2Fevil", "?prefix=%2Ftmp%2Fabs", "?prefix=..%5Cevil"] {
        let response = test_router()
            .oneshot(split_request(query, create_png(4, 10)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", query);
        let error = json_body(response).await;
        assert_eq!(error["error"], "invalid_argument");
    }
}

#[tokio::test]
async fn test_split_filename_directories_dropped() {
    let response = test_router()
        .oneshot(split_request(
            "?filename=..%2F..%2Fuploads%2Fevil.png",
            create_png(4, 10),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let names: Vec<String> = read_zip_entries(&body)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["evil_1.png", "evil_2.png"]);
}

#[tokio::test]
async fn test_split_unknown_mode_rejected() {
    let response = test_router()
        .oneshot(split_request("?mode=middle", create_png(4, 10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_split_too_many_slices_for_image() {
    let response = test_router()
        .oneshot(split_request("?slices=8", create_png(4, 5)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "invalid_argument");
}

#[tokio::test]
async fn test_split_exceeds_max_slices() {
    let router = create_router(
        SliceService::new(),
        RouterConfig::new().with_max_slices(5).with_tracing(false),
    );

    let response = router
        .oneshot(split_request("?slices=6", create_png(4, 100)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert!(error["message"].as_str().unwrap().contains("maximum of 5"));
}

#[tokio::test]
async fn test_split_empty_body() {
    let response = test_router()
        .oneshot(split_request("", Vec::new()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "empty_body");
}

#[tokio::test]
async fn test_split_unsupported_format() {
    let response = test_router()
        .oneshot(split_request("", garbage_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let error = json_body(response).await;
    assert_eq!(error["error"], "unsupported_format");
}

#[tokio::test]
async fn test_split_corrupt_image() {
    let response = test_router()
        .oneshot(split_request("", truncated_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = json_body(response).await;
    assert_eq!(error["error"], "decode_error");
}

#[tokio::test]
async fn test_split_upload_too_large() {
    let router = create_router(
        SliceService::new(),
        RouterConfig::new()
            .with_max_upload_bytes(64)
            .with_tracing(false),
    );

    let response = router
        .oneshot(split_request("", vec![0u8; 1024]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_split_requires_post() {
    let response = test_router().oneshot(get_request("/split")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Plan and Health
// =============================================================================

#[tokio::test]
async fn test_plan_balanced() {
    let response = test_router()
        .oneshot(get_request("/plan?height=100&slices=3"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    assert_eq!(plan["heights"], serde_json::json!([34, 33, 33]));
    assert_eq!(plan["offsets"], serde_json::json!([0, 34, 67]));
    assert_eq!(plan["summary"], "33 - 34 px");
    assert_eq!(plan["min"], 33);
    assert_eq!(plan["max"], 34);
}

#[tokio::test]
async fn test_plan_last_mode_uniform() {
    let response = test_router()
        .oneshot(get_request("/plan?height=90&slices=3&mode=last"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    assert_eq!(plan["heights"], serde_json::json!([30, 30, 30]));
    assert_eq!(plan["summary"], "30 px");
}

#[tokio::test]
async fn test_plan_errors() {
    let response = test_router()
        .oneshot(get_request("/plan?height=100&slices=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_router()
        .oneshot(get_request("/plan?height=100&slices=51"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_router()
        .oneshot(get_request("/plan?slices=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let response = test_router().oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}
