/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Environment-driven dispatch across cloud object-storage providers.
//!
//! Deployments configure exactly one backend through environment
//! variables: an S3-compatible endpoint (Cloudflare R2, DigitalOcean
//! Spaces, AWS S3, MinIO, ...) or a Google Cloud Storage bucket. This
//! crate classifies the configured backend, validates the settings it
//! requires, and performs single-shot object operations through the
//! vendor SDK. Request signing, transport, and retries stay in the SDK;
//! the decision logic here is which provider is in play and whether an
//! upload may carry an ACL (R2 rejects per-object ACLs, everything else
//! gets `public-read`).
//!
//! # Examples
//!
//! Upload one file using the process environment:
//!
//! ```no_run
//! # async fn example() -> Result<(), storage_dispatch::error::Error> {
//! let output = storage_dispatch::upload_file("report.txt").await?;
//! println!("uploaded to {}", output.url());
//! # Ok(())
//! # }
//! ```
//!
//! Resolve once, then drive individual operations:
//!
//! ```no_run
//! # async fn example() -> Result<(), storage_dispatch::error::Error> {
//! let target = storage_dispatch::from_env()?;
//! let client = storage_dispatch::Client::new(target).await?;
//!
//! let uploaded = client.upload("report.txt").await?;
//! println!("uploaded to {}", uploaded.url());
//!
//! client.delete("report.txt").await?;
//! # Ok(())
//! # }
//! ```

/// Error types emitted by `storage-dispatch`
pub mod error;

/// Raw configuration settings and the environment boundary
pub mod config;

/// Provider detection and target resolution
pub mod resolve;

/// Client over the resolved storage backend
pub mod client;

/// Storage operations
pub mod operation;

pub use self::client::Client;
pub use self::config::Settings;
pub use self::operation::upload::UploadOutput;
pub use self::operation::verify::ObjectSummary;
pub use self::resolve::{ProviderKind, StorageTarget};

use std::path::Path;

use crate::error::Error;

/// Resolve a [`StorageTarget`] from process environment variables.
pub fn from_env() -> Result<StorageTarget, Error> {
    StorageTarget::from_env()
}

/// Upload a single file to the backend configured in the environment.
///
/// Configuration is re-resolved on every call and nothing is cached
/// between calls, so concurrent callers never share mutable state. The
/// returned output carries the object's publicly resolvable URL.
pub async fn upload_file(path: impl AsRef<Path>) -> Result<UploadOutput, Error> {
    let path = path.as_ref();
    let target = StorageTarget::from_env()?;
    let client = Client::new(target).await?;

    tracing::info!(
        path = %path.display(),
        provider = %client.target().provider(),
        "uploading file to cloud storage"
    );
    match client.upload(path).await {
        Ok(output) => {
            tracing::info!(url = output.url(), "file uploaded successfully");
            Ok(output)
        }
        Err(err) => {
            tracing::error!(error = %err, "error uploading file to cloud storage");
            Err(err)
        }
    }
}
