/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use url::Url;

use crate::config::{self, Settings};
use crate::error::{self, Error};

/// Cloudflare R2 endpoint hostnames contain this domain.
const R2_STORAGE_DOMAIN: &str = "r2.cloudflarestorage.com";

/// R2 location hints: auto, Western/Eastern North America, Western/Eastern
/// Europe, Asia-Pacific. Custom domains in front of R2 do not expose the R2
/// hostname, so the configured region doubles as a detection signal.
const R2_REGION_CODES: [&str; 6] = ["auto", "wnam", "enam", "weur", "eeur", "apac"];

const DIGITALOCEAN_DOMAIN: &str = "digitalocean";

/// The closed set of storage backends a deployment can target.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProviderKind {
    /// Cloudflare R2. S3-compatible, but rejects per-object ACLs.
    R2,

    /// DigitalOcean Spaces.
    DigitalOceanSpaces,

    /// AWS S3, MinIO, or any other S3-compatible service.
    GenericS3,

    /// Google Cloud Storage.
    Gcs,
}

impl ProviderKind {
    /// Whether uploads to this provider must omit the ACL parameter.
    pub fn skips_acl(&self) -> bool {
        matches!(self, ProviderKind::R2)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::R2 => "Cloudflare R2",
            ProviderKind::DigitalOceanSpaces => "DigitalOcean Spaces",
            ProviderKind::GenericS3 => "S3-compatible",
            ProviderKind::Gcs => "Google Cloud Storage",
        };
        f.write_str(name)
    }
}

/// Resolved configuration needed to perform storage operations against a
/// single backend.
///
/// A target is a pure function of the [`Settings`] it was resolved from:
/// nothing is read from the environment after construction and nothing is
/// cached across calls. Targets are immutable; resolving twice from equal
/// settings yields field-wise equal targets.
#[derive(Clone, Eq, PartialEq)]
pub struct StorageTarget {
    provider: ProviderKind,
    endpoint_url: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    bucket_name: String,
    region: String,
    skip_acl: bool,
}

impl StorageTarget {
    /// Resolve the storage target from raw settings.
    ///
    /// Endpoint-based (S3-compatible) configuration always takes priority
    /// over a GCS bucket when both are present: at most one backend is
    /// expected to be active per deployment, and the S3-compatible settings
    /// are checked first.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::error::ErrorKind::Configuration)
    /// error when no backend is configured, when the endpoint URL is
    /// malformed, or when settings the detected provider requires are
    /// missing.
    pub fn resolve(settings: &Settings) -> Result<StorageTarget, Error> {
        if let Some(endpoint) = settings.endpoint_url.as_deref() {
            return resolve_s3_compatible(endpoint, settings);
        }

        if let Some(bucket) = settings.gcs_bucket_name.as_deref() {
            tracing::debug!("detected Google Cloud Storage provider");
            return Ok(StorageTarget {
                provider: ProviderKind::Gcs,
                endpoint_url: None,
                access_key: None,
                secret_key: None,
                bucket_name: bucket.to_owned(),
                region: String::new(),
                skip_acl: false,
            });
        }

        Err(error::configuration("no cloud storage settings provided"))
    }

    /// Resolve a storage target from process environment variables.
    pub fn from_env() -> Result<StorageTarget, Error> {
        Self::resolve(&Settings::from_env())
    }

    /// The detected provider.
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// The configured endpoint URL. Absent for Google Cloud Storage.
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// The bucket objects are written to.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// The configured region. Empty for Google Cloud Storage.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Whether uploads through this target must omit the ACL parameter.
    pub fn skip_acl(&self) -> bool {
        self.skip_acl
    }

    /// Static credential pair for S3-compatible targets.
    pub(crate) fn static_credentials(&self) -> Option<(&str, &str)> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(access_key), Some(secret_key)) => Some((access_key, secret_key)),
            _ => None,
        }
    }
}

impl fmt::Debug for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageTarget")
            .field("provider", &self.provider)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key", &self.access_key.as_ref().map(|_| "**redacted**"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "**redacted**"))
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("skip_acl", &self.skip_acl)
            .finish()
    }
}

fn resolve_s3_compatible(endpoint: &str, settings: &Settings) -> Result<StorageTarget, Error> {
    let host = endpoint_host(endpoint)?;
    let configured_region = settings.region.as_deref().unwrap_or("");

    let provider = if host.contains(R2_STORAGE_DOMAIN) || is_r2_region(configured_region) {
        tracing::debug!("detected Cloudflare R2 storage provider");
        ProviderKind::R2
    } else if host.contains(DIGITALOCEAN_DOMAIN) {
        tracing::debug!("detected DigitalOcean Spaces storage provider");
        ProviderKind::DigitalOceanSpaces
    } else {
        tracing::debug!("detected S3-compatible storage provider");
        ProviderKind::GenericS3
    };

    let mut bucket_name = settings.bucket_name.clone();
    let mut region = settings.region.clone();
    if provider == ProviderKind::DigitalOceanSpaces && (bucket_name.is_none() || region.is_none()) {
        let (derived_bucket, derived_region) = split_spaces_host(&host)?;
        tracing::debug!(
            bucket = %derived_bucket,
            region = %derived_region,
            "derived missing Spaces settings from endpoint host"
        );
        bucket_name.get_or_insert(derived_bucket);
        region.get_or_insert(derived_region);
    }

    match (
        settings.access_key.clone(),
        settings.secret_key.clone(),
        bucket_name,
        region,
    ) {
        (Some(access_key), Some(secret_key), Some(bucket_name), Some(region)) => {
            Ok(StorageTarget {
                provider,
                endpoint_url: Some(endpoint.to_owned()),
                access_key: Some(access_key),
                secret_key: Some(secret_key),
                bucket_name,
                region,
                skip_acl: provider.skips_acl(),
            })
        }
        (access_key, secret_key, bucket_name, region) => {
            let mut missing = Vec::new();
            if access_key.is_none() {
                missing.push(config::ENV_ACCESS_KEY);
            }
            if secret_key.is_none() {
                missing.push(config::ENV_SECRET_KEY);
            }
            if bucket_name.is_none() {
                missing.push(config::ENV_BUCKET_NAME);
            }
            if region.is_none() {
                missing.push(config::ENV_REGION);
            }
            Err(error::configuration(format!(
                "missing required settings for {provider}: {}",
                missing.join(", ")
            )))
        }
    }
}

fn is_r2_region(region: &str) -> bool {
    R2_REGION_CODES
        .iter()
        .any(|code| region.eq_ignore_ascii_case(code))
}

fn endpoint_host(endpoint: &str) -> Result<String, Error> {
    let parsed = Url::parse(endpoint)
        .map_err(|err| error::configuration(format!("invalid endpoint URL `{endpoint}`: {err}")))?;
    match parsed.host_str() {
        Some(host) => Ok(host.to_ascii_lowercase()),
        None => Err(error::configuration(format!(
            "endpoint URL `{endpoint}` has no host"
        ))),
    }
}

/// Spaces endpoints look like `https://<bucket>.<region>.digitaloceanspaces.com`;
/// the first host label is the bucket, the second the region.
fn split_spaces_host(host: &str) -> Result<(String, String), Error> {
    let mut labels = host.split('.');
    match (labels.next(), labels.next()) {
        (Some(bucket), Some(region)) if !bucket.is_empty() && !region.is_empty() => {
            Ok((bucket.to_owned(), region.to_owned()))
        }
        _ => Err(error::configuration(format!(
            "cannot derive bucket and region from endpoint host `{host}`"
        ))),
    }
}
