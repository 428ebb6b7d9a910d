/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use google_cloud_storage::client::{Client as GcsClient, ClientConfig};

use crate::error::{self, Error};
use crate::operation;
use crate::operation::upload::UploadOutput;
use crate::operation::verify::ObjectSummary;
use crate::resolve::{ProviderKind, StorageTarget};

/// Storage client for a resolved backend.
///
/// A thin handle over the vendor SDK client: cheap to clone and safe to
/// share across tasks. Every operation is one independent request with no
/// shared mutable state and no caching. Retry policy, if any, belongs to
/// the caller.
#[derive(Debug, Clone)]
pub struct Client {
    handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations: the resolved target and the
/// vendor SDK client it maps to.
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) target: StorageTarget,
    pub(crate) backend: Backend,
}

pub(crate) enum Backend {
    S3(aws_sdk_s3::Client),
    Gcs(GcsClient),
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::S3(_) => f.write_str("Backend::S3"),
            Backend::Gcs(_) => f.write_str("Backend::Gcs"),
        }
    }
}

impl Client {
    /// Creates a new client for a resolved storage target.
    ///
    /// For S3-compatible targets this builds an SDK client from the
    /// target's endpoint, region, and static credentials. For Google Cloud
    /// Storage the SDK resolves ambient application-default credentials,
    /// which fails with a configuration error when none are available.
    pub async fn new(target: StorageTarget) -> Result<Client, Error> {
        let backend = match target.provider() {
            ProviderKind::Gcs => {
                let config = ClientConfig::default()
                    .with_auth()
                    .await
                    .map_err(error::configuration)?;
                Backend::Gcs(GcsClient::new(config))
            }
            _ => Backend::S3(build_s3_client(&target)?),
        };

        Ok(Client {
            handle: Arc::new(Handle { target, backend }),
        })
    }

    /// Creates a client that sends requests through an explicit S3 client.
    ///
    /// The target still controls bucket, object key, ACL selection, and
    /// result URL construction; only the transport-level client is
    /// replaced. Intended for callers that need custom SDK configuration,
    /// and for tests. The target must be S3-compatible.
    pub fn with_s3_client(target: StorageTarget, client: aws_sdk_s3::Client) -> Client {
        Client {
            handle: Arc::new(Handle {
                target,
                backend: Backend::S3(client),
            }),
        }
    }

    /// The resolved target this client operates against.
    pub fn target(&self) -> &StorageTarget {
        &self.handle.target
    }

    /// Upload a single local file, returning its public URL.
    ///
    /// The object key is the file's base name. The upload is a single
    /// request: one network write, no retry, no multipart splitting.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &storage_dispatch::Client) -> Result<(), storage_dispatch::error::Error> {
    /// let output = client.upload("report.txt").await?;
    /// println!("{}", output.url());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<UploadOutput, Error> {
        operation::upload::upload(&self.handle, path.as_ref()).await
    }

    /// Delete a single object.
    ///
    /// Deletion failures are reported, not swallowed; callers doing
    /// best-effort cleanup decide for themselves whether to ignore the
    /// result.
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        operation::delete::delete(&self.handle, key).await
    }

    /// List up to `max_keys` objects in the bucket, newest first.
    pub async fn list_recent(&self, max_keys: i32) -> Result<Vec<ObjectSummary>, Error> {
        operation::verify::list_recent(&self.handle, max_keys).await
    }

    /// Probe that the configured bucket exists and is reachable with the
    /// configured credentials.
    ///
    /// On failure the provider error code is preserved, so callers can
    /// distinguish a permission problem (`AccessDenied`) from a missing
    /// bucket (`NoSuchBucket`).
    pub async fn verify_access(&self) -> Result<(), Error> {
        operation::verify::verify_access(&self.handle).await
    }
}

fn build_s3_client(target: &StorageTarget) -> Result<aws_sdk_s3::Client, Error> {
    let endpoint = target
        .endpoint_url()
        .ok_or_else(|| error::configuration("endpoint URL required for S3-compatible targets"))?;
    let (access_key, secret_key) = target.static_credentials().ok_or_else(|| {
        error::configuration("static credentials required for S3-compatible targets")
    })?;

    let credentials = Credentials::new(access_key, secret_key, None, None, "storage-dispatch");
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(target.region().to_owned()))
        .endpoint_url(endpoint)
        .credentials_provider(credentials)
        // requests and advertised URLs both use the path-style form
        .force_path_style(true)
        .build();

    Ok(aws_sdk_s3::Client::from_conf(config))
}
