/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::SystemTime;

use aws_smithy_types::DateTime;
use google_cloud_storage::http::buckets::get::GetBucketRequest;
use google_cloud_storage::http::objects::list::ListObjectsRequest;
use tracing::Instrument;

use crate::client::{Backend, Handle};
use crate::error::Error;

/// A single object returned by [`list_recent`](crate::Client::list_recent).
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSummary {
    pub(crate) key: String,
    pub(crate) size: i64,
    pub(crate) last_modified: Option<SystemTime>,
}

impl ObjectSummary {
    /// The object's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The object's size in bytes.
    pub fn size(&self) -> i64 {
        self.size
    }

    /// When the object was last written, if the service reported it.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }
}

pub(crate) async fn verify_access(handle: &Handle) -> Result<(), Error> {
    let target = &handle.target;
    match &handle.backend {
        Backend::S3(client) => {
            client
                .head_bucket()
                .bucket(target.bucket_name())
                .send()
                .instrument(tracing::debug_span!(
                    "send-head-bucket",
                    bucket = target.bucket_name(),
                ))
                .await?;
        }
        Backend::Gcs(client) => {
            let req = GetBucketRequest {
                bucket: target.bucket_name().to_owned(),
                ..Default::default()
            };
            client
                .get_bucket(&req)
                .instrument(tracing::debug_span!(
                    "send-get-bucket",
                    bucket = target.bucket_name(),
                ))
                .await?;
        }
    }
    Ok(())
}

pub(crate) async fn list_recent(
    handle: &Handle,
    max_keys: i32,
) -> Result<Vec<ObjectSummary>, Error> {
    let target = &handle.target;
    let mut objects = match &handle.backend {
        Backend::S3(client) => {
            let resp = client
                .list_objects_v2()
                .bucket(target.bucket_name())
                .max_keys(max_keys)
                .send()
                .instrument(tracing::debug_span!(
                    "send-list-objects",
                    bucket = target.bucket_name(),
                ))
                .await?;

            resp.contents()
                .iter()
                .map(|object| ObjectSummary {
                    key: object.key().unwrap_or_default().to_owned(),
                    size: object.size().unwrap_or_default(),
                    last_modified: object.last_modified().cloned().and_then(system_time),
                })
                .collect::<Vec<_>>()
        }
        Backend::Gcs(client) => {
            let req = ListObjectsRequest {
                bucket: target.bucket_name().to_owned(),
                max_results: Some(max_keys),
                ..Default::default()
            };
            let resp = client
                .list_objects(&req)
                .instrument(tracing::debug_span!(
                    "send-list-objects",
                    bucket = target.bucket_name(),
                ))
                .await?;

            resp.items
                .unwrap_or_default()
                .into_iter()
                .map(|object| ObjectSummary {
                    key: object.name,
                    size: object.size,
                    last_modified: object.updated.map(SystemTime::from),
                })
                .collect()
        }
    };

    // newest first; objects without a timestamp sort last
    objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    Ok(objects)
}

fn system_time(value: DateTime) -> Option<SystemTime> {
    SystemTime::try_from(value).ok()
}
