//! Archive integration tests.
//!
//! Tests verify:
//! - Round-trip of rendered slices through a ZIP archive
//! - Byte-identical output for identical input
//! - Failure on empty, duplicate or missing entries

use bytes::Bytes;

use image_splitter::archive::{build_archive, ARCHIVE_MIME_TYPE};
use image_splitter::error::{ArchiveError, SplitError};
use image_splitter::slice::{package, SliceArtifact, SliceService, SplitOptions};

use super::test_utils::{create_png, decode, is_valid_zip, read_zip_entries};

fn artifact(index: usize, filename: &str, data: &[u8]) -> SliceArtifact {
    SliceArtifact {
        index,
        width: 1,
        height: 1,
        data: Bytes::copy_from_slice(data),
        filename: filename.to_string(),
    }
}

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn test_archive_round_trip_of_rendered_slices() {
    let service = SliceService::new();
    let options = SplitOptions::new(7).with_prefix("scan");

    let artifacts = service
        .process_image(Bytes::from(create_png(12, 70)), &options)
        .await
        .unwrap();
    let archive = package(artifacts.clone(), options.archive_name())
        .await
        .unwrap();

    assert_eq!(archive.name, "scan_all.zip");
    assert_eq!(archive.entry_count, 7);
    assert!(is_valid_zip(&archive.data));

    let entries = read_zip_entries(&archive.data);
    assert_eq!(entries.len(), artifacts.len());
    for ((name, data), artifact) in entries.iter().zip(&artifacts) {
        assert_eq!(name, &artifact.filename);
        assert_eq!(data.as_slice(), artifact.data.as_ref());
        assert_eq!(decode(data).height(), 10);
    }
}

#[tokio::test]
async fn test_split_to_archive_matches_two_step_pipeline() {
    let service = SliceService::new();
    let options = SplitOptions::new(3).with_prefix("poster");
    let source = Bytes::from(create_png(9, 31));

    let one_step = service
        .split_to_archive(source.clone(), &options)
        .await
        .unwrap();

    let artifacts = service.process_image(source, &options).await.unwrap();
    let two_step = package(artifacts, options.archive_name()).await.unwrap();

    assert_eq!(one_step, two_step);
}

#[tokio::test]
async fn test_archive_is_deterministic() {
    let service = SliceService::new();
    let options = SplitOptions::new(4);
    let source = Bytes::from(create_png(6, 40));

    let first = service
        .split_to_archive(source.clone(), &options)
        .await
        .unwrap();
    let second = service.split_to_archive(source, &options).await.unwrap();

    assert_eq!(first.data, second.data);
}

#[test]
fn test_archive_preserves_arbitrary_bytes() {
    let artifacts = vec![
        artifact(1, "a_1.png", &[0u8; 64]),
        artifact(2, "a_2.png", &(0..=255).collect::<Vec<u8>>()),
        artifact(3, "a_3.png", b"PK\x03\x04 not a nested zip"),
    ];

    let archive = build_archive(&artifacts, "a_all.zip").unwrap();
    let entries = read_zip_entries(&archive.data);

    assert_eq!(entries.len(), 3);
    for ((name, data), artifact) in entries.iter().zip(&artifacts) {
        assert_eq!(name, &artifact.filename);
        assert_eq!(data.as_slice(), artifact.data.as_ref());
    }
    assert_eq!(ARCHIVE_MIME_TYPE, "application/zip");
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_archive_rejects_empty_input() {
    let result = build_archive(&[], "empty_all.zip");
    assert!(matches!(result, Err(SplitError::InvalidArgument { .. })));
}

#[test]
fn test_archive_rejects_duplicate_names() {
    let artifacts = vec![artifact(1, "x_1.png", b"one"), artifact(2, "x_1.png", b"two")];

    let result = build_archive(&artifacts, "x_all.zip");
    assert!(matches!(
        result,
        Err(SplitError::Packaging(ArchiveError::DuplicateEntry { ref name })) if name == "x_1.png"
    ));
}

#[tokio::test]
async fn test_archive_rejects_missing_content() {
    let artifacts = vec![artifact(1, "x_1.png", b"one"), artifact(2, "x_2.png", b"")];

    let result = package(artifacts, "x_all.zip".to_string()).await;
    assert!(matches!(
        result,
        Err(SplitError::Packaging(ArchiveError::MissingContent { ref name })) if name == "x_2.png"
    ));
}
