/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::env;
use std::fmt;

/// Environment key for the S3-compatible endpoint URL.
pub const ENV_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";

/// Environment key for the S3-compatible access key.
pub const ENV_ACCESS_KEY: &str = "S3_ACCESS_KEY";

/// Environment key for the S3-compatible secret key.
pub const ENV_SECRET_KEY: &str = "S3_SECRET_KEY";

/// Environment key for the S3-compatible bucket name.
pub const ENV_BUCKET_NAME: &str = "S3_BUCKET_NAME";

/// Environment key for the S3-compatible region.
pub const ENV_REGION: &str = "S3_REGION";

/// Environment key for the Google Cloud Storage bucket name.
pub const ENV_GCS_BUCKET_NAME: &str = "GCP_BUCKET_NAME";

/// Raw storage configuration consumed by provider resolution.
///
/// Values are carried exactly as configured; interpreting them is the job
/// of [`StorageTarget::resolve`](crate::resolve::StorageTarget::resolve).
#[derive(Clone, Default)]
pub struct Settings {
    pub(crate) endpoint_url: Option<String>,
    pub(crate) access_key: Option<String>,
    pub(crate) secret_key: Option<String>,
    pub(crate) bucket_name: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) gcs_bucket_name: Option<String>,
}

impl Settings {
    /// Create a new `Settings` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Read settings from process environment variables.
    ///
    /// Unset variables and variables set to the empty string are treated
    /// the same way: absent.
    pub fn from_env() -> Settings {
        Settings {
            endpoint_url: env_opt(ENV_ENDPOINT_URL),
            access_key: env_opt(ENV_ACCESS_KEY),
            secret_key: env_opt(ENV_SECRET_KEY),
            bucket_name: env_opt(ENV_BUCKET_NAME),
            region: env_opt(ENV_REGION),
            gcs_bucket_name: env_opt(ENV_GCS_BUCKET_NAME),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key", &self.access_key.as_ref().map(|_| "**redacted**"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "**redacted**"))
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("gcs_bucket_name", &self.gcs_bucket_name)
            .finish()
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// Fluent style builder for [Settings]
#[derive(Clone, Debug, Default)]
pub struct Builder {
    endpoint_url: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    bucket_name: Option<String>,
    region: Option<String>,
    gcs_bucket_name: Option<String>,
}

impl Builder {
    /// Set the S3-compatible endpoint URL.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the S3-compatible access key.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Set the S3-compatible secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the S3-compatible bucket name.
    pub fn bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    /// Set the S3-compatible region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the Google Cloud Storage bucket name.
    pub fn gcs_bucket_name(mut self, gcs_bucket_name: impl Into<String>) -> Self {
        self.gcs_bucket_name = Some(gcs_bucket_name.into());
        self
    }

    /// Consumes the builder and constructs [`Settings`]
    pub fn build(self) -> Settings {
        Settings {
            endpoint_url: self.endpoint_url,
            access_key: self.access_key,
            secret_key: self.secret_key,
            bucket_name: self.bucket_name,
            region: self.region,
            gcs_bucket_name: self.gcs_bucket_name,
        }
    }
}
