//! End-to-end split tests through the slice service.
//!
//! Tests verify:
//! - Slice dimensions and pixel content for each partition mode
//! - File naming and ordering
//! - JPEG output and background flattening
//! - Decode and argument failures

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use image::GenericImageView;

use image_splitter::codec::{BackgroundColor, OutputFormat, SourceFormat};
use image_splitter::error::{DecodeError, SplitError};
use image_splitter::slice::{SliceService, SplitMode, SplitOptions};

use super::test_utils::{
    create_gif, create_jpeg, create_png, create_transparent_png, decode, garbage_bytes,
    is_valid_jpeg, is_valid_png, row_color, truncated_png,
};

// =============================================================================
// Partition Scenarios
// =============================================================================

#[tokio::test]
async fn test_split_balanced_heights() {
    let service = SliceService::new();
    let options = SplitOptions::new(3).with_prefix("banner");

    let artifacts = service
        .process_image(Bytes::from(create_png(16, 100)), &options)
        .await
        .unwrap();

    let heights: Vec<u32> = artifacts.iter().map(|a| a.height).collect();
    assert_eq!(heights, vec![34, 33, 33]);

    let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, vec!["banner_1.png", "banner_2.png", "banner_3.png"]);

    for (i, artifact) in artifacts.iter().enumerate() {
        assert_eq!(artifact.index, i + 1);
        assert_eq!(artifact.width, 16);
        assert!(is_valid_png(&artifact.data));
    }
}

#[tokio::test]
async fn test_split_last_mode_heights() {
    let service = SliceService::new();
    let options = SplitOptions::new(3).with_mode(SplitMode::Last);

    let artifacts = service
        .process_image(Bytes::from(create_png(16, 100)), &options)
        .await
        .unwrap();

    let heights: Vec<u32> = artifacts.iter().map(|a| a.height).collect();
    assert_eq!(heights, vec![33, 33, 34]);
}

#[tokio::test]
async fn test_split_small_image_names() {
    let service = SliceService::new();
    let options = SplitOptions::new(4).with_prefix("x");

    let artifacts = service
        .process_image(Bytes::from(create_png(5, 10)), &options)
        .await
        .unwrap();

    let heights: Vec<u32> = artifacts.iter().map(|a| a.height).collect();
    assert_eq!(heights, vec![3, 3, 2, 2]);

    let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, vec!["x_1.png", "x_2.png", "x_3.png", "x_4.png"]);
}

#[tokio::test]
async fn test_split_names_sort_in_order() {
    let service = SliceService::new();
    let options = SplitOptions::new(12).with_prefix("img");

    let artifacts = service
        .process_image(Bytes::from(create_png(4, 120)), &options)
        .await
        .unwrap();

    assert_eq!(artifacts[2].filename, "img_03.png");
    assert_eq!(artifacts[11].filename, "img_12.png");

    let names: Vec<String> = artifacts.iter().map(|a| a.filename.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_split_blank_prefix_uses_default() {
    let service = SliceService::new();
    let options = SplitOptions::new(2).with_prefix("   ");

    let artifacts = service
        .process_image(Bytes::from(create_png(4, 10)), &options)
        .await
        .unwrap();

    assert_eq!(artifacts[0].filename, "split_1.png");
    assert_eq!(options.archive_name(), "split_all.zip");
}

// =============================================================================
// Pixel Content
// =============================================================================

#[tokio::test]
async fn test_slices_tile_source_rows() {
    let service = SliceService::new();
    let options = SplitOptions::new(4);

    let artifacts = service
        .process_image(Bytes::from(create_png(3, 37)), &options)
        .await
        .unwrap();

    // Every source row appears exactly once, in order.
    let mut source_row = 0;
    for artifact in &artifacts {
        let slice = decode(&artifact.data).to_rgba8();
        assert_eq!(slice.dimensions(), (3, artifact.height));

        for y in 0..slice.height() {
            assert_eq!(*slice.get_pixel(0, y), row_color(source_row));
            assert_eq!(*slice.get_pixel(2, y), row_color(source_row));
            source_row += 1;
        }
    }
    assert_eq!(source_row, 37);
}

#[tokio::test]
async fn test_split_jpeg_output() {
    let service = SliceService::new();
    let options = SplitOptions::new(2)
        .with_format(OutputFormat::Jpeg)
        .with_quality(0.9)
        .with_prefix("photo");

    let artifacts = service
        .process_image(Bytes::from(create_png(20, 30)), &options)
        .await
        .unwrap();

    assert_eq!(artifacts[0].filename, "photo_1.jpg");
    assert_eq!(artifacts[1].filename, "photo_2.jpg");
    for artifact in &artifacts {
        assert!(is_valid_jpeg(&artifact.data));
        assert_eq!(decode(&artifact.data).dimensions(), (20, 15));
    }
}

#[tokio::test]
async fn test_split_jpeg_flattens_transparency() {
    let service = SliceService::new();
    let options = SplitOptions::new(2)
        .with_format(OutputFormat::Jpeg)
        .with_quality(1.0)
        .with_background(BackgroundColor::new(255, 0, 0));

    let artifacts = service
        .process_image(Bytes::from(create_transparent_png(16, 16)), &options)
        .await
        .unwrap();

    let pixel = decode(&artifacts[0].data).to_rgb8().get_pixel(8, 4).0;
    assert!(pixel[0] > 240, "expected red background, got {:?}", pixel);
    assert!(pixel[1] < 20, "expected red background, got {:?}", pixel);
    assert!(pixel[2] < 20, "expected red background, got {:?}", pixel);
}

#[tokio::test]
async fn test_split_jpeg_and_gif_sources() {
    let service = SliceService::new();
    let options = SplitOptions::new(2);

    let image = service.decode(Bytes::from(create_jpeg(24, 10))).await.unwrap();
    assert_eq!(image.format(), SourceFormat::Jpeg);

    let artifacts = service
        .process_image(Bytes::from(create_jpeg(24, 10)), &options)
        .await
        .unwrap();
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().all(|a| a.width == 24 && a.height == 5));

    let artifacts = service
        .process_image(Bytes::from(create_gif(8, 9)), &options)
        .await
        .unwrap();
    let heights: Vec<u32> = artifacts.iter().map(|a| a.height).collect();
    assert_eq!(heights, vec![5, 4]);
}

// =============================================================================
// Progress
// =============================================================================

#[tokio::test]
async fn test_progress_reported_in_order() {
    let service = SliceService::new();
    let options = SplitOptions::new(5);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    service
        .process_image_with_progress(Bytes::from(create_png(2, 50)), &options, move |p| {
            sink.lock().unwrap().push((p.completed, p.total, p.window.offset_y));
        })
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![(1, 5, 0), (2, 5, 10), (3, 5, 20), (4, 5, 30), (5, 5, 40)]
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_split_rejects_bad_input() {
    let service = SliceService::new();
    let options = SplitOptions::new(2);

    let result = service.process_image(Bytes::new(), &options).await;
    assert!(matches!(result, Err(SplitError::Decode(DecodeError::Empty))));

    let result = service
        .process_image(Bytes::from(garbage_bytes()), &options)
        .await;
    assert!(matches!(
        result,
        Err(SplitError::Decode(DecodeError::UnsupportedFormat { .. }))
    ));

    let result = service
        .process_image(Bytes::from(truncated_png()), &options)
        .await;
    assert!(matches!(
        result,
        Err(SplitError::Decode(DecodeError::Corrupt { .. }))
    ));
}

#[tokio::test]
async fn test_split_rejects_invalid_options_before_decoding() {
    let service = SliceService::new();

    // Garbage input never reaches the decoder when options are invalid.
    let result = service
        .process_image(Bytes::from(garbage_bytes()), &SplitOptions::new(1))
        .await;
    assert!(matches!(result, Err(SplitError::InvalidArgument { .. })));

    let options = SplitOptions::new(2)
        .with_format(OutputFormat::Jpeg)
        .with_quality(1.5);
    let result = service
        .process_image(Bytes::from(garbage_bytes()), &options)
        .await;
    assert!(matches!(result, Err(SplitError::InvalidArgument { .. })));
}

#[tokio::test]
async fn test_split_rejects_path_like_prefix() {
    let service = SliceService::new();

    for prefix in ["../../evil", "/tmp/abs", "nested/name"] {
        let options = SplitOptions::new(2).with_prefix(prefix);
        let result = service
            .process_image(Bytes::from(create_png(4, 10)), &options)
            .await;
        assert!(
            matches!(result, Err(SplitError::InvalidArgument { .. })),
            "prefix {:?} should be rejected",
            prefix
        );
    }
}

#[tokio::test]
async fn test_split_rejects_more_slices_than_rows() {
    let service = SliceService::new();
    let options = SplitOptions::new(6);

    let result = service
        .process_image(Bytes::from(create_png(10, 5)), &options)
        .await;
    match result {
        Err(SplitError::InvalidArgument { message }) => {
            assert!(message.contains("smaller than slice count"), "{}", message);
        }
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
}
