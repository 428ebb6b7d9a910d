/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of dispatch errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Required configuration is absent, ambiguous, or malformed
    Configuration,

    /// Operation input validation issues
    InputInvalid,

    /// I/O errors reading a local file
    IOError,

    /// The storage service reported a failure for a request
    Service(ServiceFailure),
}

/// Stores details about a failed service request
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceFailure {
    /// Error code reported by the provider, when one was attached to the
    /// response (e.g. `AccessDenied`, `NoSuchBucket`, `SignatureDoesNotMatch`).
    code: Option<String>,
}

impl ServiceFailure {
    /// The provider error code for this failure, if one was reported.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl Error {
    /// Creates a new dispatch [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The provider error code when this is a service failure.
    ///
    /// Lets callers branch on the provider's verdict (permission failure vs
    /// missing bucket) without digging through the source chain. `None` for
    /// local errors and for service failures without an attached code.
    pub fn service_code(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Service(failure) => failure.code(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Configuration => write!(f, "invalid storage configuration"),
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::Service(failure) => match failure.code() {
                Some(code) => write!(f, "storage service error ({code})"),
                None => write!(f, "storage service error"),
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

pub(crate) fn configuration<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::Configuration, err)
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let code = value.code().map(str::to_owned);
        Error::new(ErrorKind::Service(ServiceFailure { code }), value)
    }
}

impl From<google_cloud_storage::http::Error> for Error {
    fn from(value: google_cloud_storage::http::Error) -> Self {
        let code = match &value {
            google_cloud_storage::http::Error::Response(resp) => Some(resp.code.to_string()),
            _ => None,
        };
        Error::new(ErrorKind::Service(ServiceFailure { code }), value)
    }
}
