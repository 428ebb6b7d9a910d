/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::error::ErrorMetadata;
use aws_sdk_s3::operation::put_object::{PutObjectError, PutObjectOutput};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_smithy_mocks::{mock, mock_client, RuleMode};
use storage_dispatch::error::ErrorKind;
use storage_dispatch::{Client, ProviderKind, Settings, StorageTarget};

fn temp_file(name: &str, contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[tokio::test]
async fn r2_upload_end_to_end() {
    let settings = Settings::builder()
        .endpoint_url("https://abc123.r2.cloudflarestorage.com")
        .region("auto")
        .bucket_name("media")
        .access_key("test-access")
        .secret_key("test-secret")
        .build();
    let target = StorageTarget::resolve(&settings).unwrap();
    assert_eq!(target.provider(), ProviderKind::R2);
    assert!(target.skip_acl());

    let put_object = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| {
            r.acl.is_none()
                && r.bucket.as_deref() == Some("media")
                && r.key.as_deref() == Some("report.txt")
        })
        .then_output(|| PutObjectOutput::builder().e_tag("test-e-tag").build());
    let s3 = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);

    let (_dir, path) = temp_file("report.txt", b"quarterly numbers");
    let client = Client::with_s3_client(target, s3);

    let output = client.upload(&path).await.unwrap();
    assert_eq!(
        output.url(),
        "https://abc123.r2.cloudflarestorage.com/media/report.txt"
    );
}

#[tokio::test]
async fn spaces_upload_with_derived_location() {
    // No explicit bucket or region: both come from the endpoint host.
    let settings = Settings::builder()
        .endpoint_url("https://sgp-labs.nyc3.digitaloceanspaces.com")
        .access_key("test-access")
        .secret_key("test-secret")
        .build();
    let target = StorageTarget::resolve(&settings).unwrap();
    assert_eq!(target.provider(), ProviderKind::DigitalOceanSpaces);
    assert_eq!(target.bucket_name(), "sgp-labs");
    assert_eq!(target.region(), "nyc3");

    let put_object = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| {
            r.acl.as_ref() == Some(&ObjectCannedAcl::PublicRead)
                && r.bucket.as_deref() == Some("sgp-labs")
        })
        .then_output(|| PutObjectOutput::builder().build());
    let s3 = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);

    let (_dir, path) = temp_file("banner.png", b"\x89PNG");
    let client = Client::with_s3_client(target, s3);

    let output = client.upload(&path).await.unwrap();
    assert_eq!(
        output.url(),
        "https://sgp-labs.nyc3.digitaloceanspaces.com/sgp-labs/banner.png"
    );
}

#[tokio::test]
async fn upload_failure_carries_the_provider_verdict() {
    let settings = Settings::builder()
        .endpoint_url("http://minio.internal:9000")
        .region("us-east-1")
        .bucket_name("media")
        .access_key("test-access")
        .secret_key("test-secret")
        .build();
    let target = StorageTarget::resolve(&settings).unwrap();

    let put_object = mock!(aws_sdk_s3::Client::put_object).then_error(|| {
        PutObjectError::generic(
            ErrorMetadata::builder()
                .code("NoSuchBucket")
                .message("bucket `media` does not exist")
                .build(),
        )
    });
    let s3 = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);

    let (_dir, path) = temp_file("report.txt", b"quarterly numbers");
    let client = Client::with_s3_client(target, s3);

    let err = client.upload(&path).await.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Service(_)));
    assert_eq!(err.service_code(), Some("NoSuchBucket"));
}

#[test]
fn unconfigured_environment_fails_before_any_client_exists() {
    // Resolution is pure: with nothing configured it fails without a
    // client ever being constructed, so no request can have been made.
    let err = StorageTarget::resolve(&Settings::default()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Configuration);
    assert!(err.service_code().is_none());
}

#[test]
fn resolution_is_repeatable() {
    let settings = Settings::builder()
        .endpoint_url("https://cdn.example.com")
        .region("wnam")
        .bucket_name("media")
        .access_key("test-access")
        .secret_key("test-secret")
        .build();

    let first = StorageTarget::resolve(&settings).unwrap();
    let second = StorageTarget::resolve(&settings).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.provider(), ProviderKind::R2);
}
