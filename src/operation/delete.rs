/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
use tracing::Instrument;

use crate::client::{Backend, Handle};
use crate::error::Error;

pub(crate) async fn delete(handle: &Handle, key: &str) -> Result<(), Error> {
    let target = &handle.target;
    match &handle.backend {
        Backend::S3(client) => {
            client
                .delete_object()
                .bucket(target.bucket_name())
                .key(key)
                .send()
                .instrument(tracing::debug_span!(
                    "send-delete-object",
                    bucket = target.bucket_name(),
                    key = key,
                ))
                .await?;
        }
        Backend::Gcs(client) => {
            let req = DeleteObjectRequest {
                bucket: target.bucket_name().to_owned(),
                object: key.to_owned(),
                ..Default::default()
            };
            client
                .delete_object(&req)
                .instrument(tracing::debug_span!(
                    "send-delete-object",
                    bucket = target.bucket_name(),
                    key = key,
                ))
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::{Client, Settings, StorageTarget};
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::delete_object::{DeleteObjectError, DeleteObjectOutput};
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    fn target() -> StorageTarget {
        let settings = Settings::builder()
            .endpoint_url("https://abc123.r2.cloudflarestorage.com")
            .access_key("test-access")
            .secret_key("test-secret")
            .bucket_name("media")
            .region("auto")
            .build();
        StorageTarget::resolve(&settings).unwrap()
    }

    #[tokio::test]
    async fn delete_issues_a_single_request() {
        let delete_object = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| {
                r.bucket.as_deref() == Some("media") && r.key.as_deref() == Some("report.txt")
            })
            .then_output(|| DeleteObjectOutput::builder().build());
        let s3 = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete_object]);

        let client = Client::with_s3_client(target(), s3);
        client.delete("report.txt").await.unwrap();
    }

    #[tokio::test]
    async fn delete_failure_is_reported_with_the_provider_code() {
        let delete_object = mock!(aws_sdk_s3::Client::delete_object).then_error(|| {
            DeleteObjectError::generic(ErrorMetadata::builder().code("AccessDenied").build())
        });
        let s3 = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete_object]);

        let client = Client::with_s3_client(target(), s3);
        let err = client.delete("report.txt").await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Service(_)));
        assert_eq!(err.service_code(), Some("AccessDenied"));
    }
}
