/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::Instrument;

use crate::client::{Backend, Handle};
use crate::error::{self, Error};

/// Public base URL for objects in Google Cloud Storage.
const GCS_PUBLIC_URL_BASE: &str = "https://storage.googleapis.com";

/// Characters that should NOT be percent-encoded in object keys when
/// building public URLs.
const OBJECT_KEY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Result of a completed upload.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutput {
    pub(crate) url: String,
    pub(crate) e_tag: Option<String>,
}

impl UploadOutput {
    /// Publicly resolvable URL of the uploaded object.
    ///
    /// Constructed from the configured endpoint, the bucket, and the
    /// percent-encoded object key. The URL is not verified to be
    /// reachable; bucket-level permissions govern actual visibility.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Entity tag reported by the service, when available.
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }
}

pub(crate) async fn upload(handle: &Handle, path: &Path) -> Result<UploadOutput, Error> {
    let key = object_key(path)?;
    match &handle.backend {
        Backend::S3(client) => put_object(handle, client, path, &key).await,
        Backend::Gcs(client) => upload_gcs(handle, client, path, &key).await,
    }
}

/// Object keys are the file's base name: no directory components, no
/// deduplication. Re-uploading the same name overwrites, last write wins.
fn object_key(path: &Path) -> Result<String, Error> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            error::invalid_input(format!("path `{}` has no file name", path.display()))
        })
}

async fn put_object(
    handle: &Handle,
    client: &aws_sdk_s3::Client,
    path: &Path,
    key: &str,
) -> Result<UploadOutput, Error> {
    let target = &handle.target;
    let endpoint = target
        .endpoint_url()
        .ok_or_else(|| error::configuration("endpoint URL required for S3-compatible targets"))?;

    let body = ByteStream::from_path(path).await?;

    let mut req = client
        .put_object()
        .bucket(target.bucket_name())
        .key(key)
        .body(body);
    if target.skip_acl() {
        // R2 rejects per-object ACLs; bucket-level permissions apply instead
        tracing::debug!(bucket = target.bucket_name(), "uploading without ACL");
    } else {
        req = req.acl(ObjectCannedAcl::PublicRead);
    }

    let resp = req
        .send()
        .instrument(tracing::info_span!(
            "send-put-object",
            bucket = target.bucket_name(),
            key = key,
        ))
        .await?;

    Ok(UploadOutput {
        url: object_url(endpoint, target.bucket_name(), key),
        e_tag: resp.e_tag().map(str::to_owned),
    })
}

async fn upload_gcs(
    handle: &Handle,
    client: &google_cloud_storage::client::Client,
    path: &Path,
    key: &str,
) -> Result<UploadOutput, Error> {
    let target = &handle.target;
    let data = tokio::fs::read(path).await?;

    let req = UploadObjectRequest {
        bucket: target.bucket_name().to_owned(),
        ..Default::default()
    };
    let media = Media::new(key.to_owned());
    let object = client
        .upload_object(&req, data, &UploadType::Simple(media))
        .instrument(tracing::info_span!(
            "send-upload-object",
            bucket = target.bucket_name(),
            key = key,
        ))
        .await?;

    let e_tag = (!object.etag.is_empty()).then_some(object.etag);
    Ok(UploadOutput {
        url: object_url(GCS_PUBLIC_URL_BASE, target.bucket_name(), key),
        e_tag,
    })
}

/// Join endpoint, bucket, and percent-encoded object key with `/`.
fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        bucket,
        utf8_percent_encode(key, OBJECT_KEY_SET)
    )
}
