/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
pub(crate) mod input;
mod output;

use crate::error;
use crate::io::InputStream;
/// Request type for single request uploads
pub use input::{UploadInput, UploadInputBuilder};
/// Response type for uploads
pub use output::UploadOutput;
use tracing::Instrument;

use std::sync::Arc;

/// Operation struct for single object upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadInput,
    ) -> Result<UploadOutput, error::Error> {
        let UploadInput { bucket, key, body } = input;
        let result = put_object(&handle, &bucket, &key, body).await;
        if let Err(err) = &result {
            crate::operation::log_failure("upload", &bucket, &key, err);
        }
        result
    }
}

/// Send the entire `stream` as the body of a single `PutObject` request.
pub(crate) async fn put_object(
    handle: &crate::client::Handle,
    bucket: &str,
    key: &str,
    stream: InputStream,
) -> Result<UploadOutput, error::Error> {
    let content_length = stream.content_length();
    let content_length: i64 = content_length.try_into().map_err(|_| {
        error::invalid_input(format!("content_length:{} is invalid.", content_length))
    })?;
    let body = stream.into_byte_stream().await?;

    let mut req = handle
        .config
        .client()
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_length(content_length)
        .body(body)
        .customize();
    if handle.config.unsigned_payload() {
        req = req.disable_payload_signing();
    }

    let resp = req
        .send()
        .instrument(tracing::info_span!("send-put-object", bucket, key))
        .await?;

    tracing::trace!("uploaded {content_length} bytes to {bucket}/{key}");
    Ok(UploadOutput::from(resp))
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::io::InputStream;
    use aws_sdk_s3::operation::put_object::{PutObjectError, PutObjectOutput};
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_runtime::test_util::capture_test_logs::capture_test_logs;
    use aws_smithy_types::error::ErrorMetadata;
    use bytes::Bytes;
    use std::ops::Deref;
    use std::sync::Arc;

    fn test_client(s3_client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder()
            .client(s3_client)
            .unsigned_payload(true)
            .build()
            .unwrap();
        crate::Client::new(config)
    }

    #[tokio::test]
    async fn test_basic_upload_object() {
        let body = Bytes::from_static(b"every adolescent dog goes bonkers early");
        let stream = InputStream::from(body);
        let expected_e_tag = Arc::new("test-etag".to_owned());

        let e_tag = expected_e_tag.clone();
        let put_object = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket")
                    && r.key() == Some("test-key")
                    && r.content_length() == Some(39)
            })
            .then_output(move || {
                PutObjectOutput::builder()
                    .e_tag(e_tag.as_ref().to_owned())
                    .build()
            });

        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);
        let tm = test_client(client);

        let resp = tm
            .upload()
            .bucket("test-bucket")
            .key("test-key")
            .body(stream)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.upload_id(), None);
        assert_eq!(expected_e_tag.deref(), resp.e_tag().unwrap());
        assert_eq!(1, put_object.num_calls());
    }

    #[tokio::test]
    async fn test_upload_rejected_by_remote() {
        let (_guard, rx) = capture_test_logs();
        let put_object = mock!(aws_sdk_s3::Client::put_object).then_error(|| {
            PutObjectError::generic(
                ErrorMetadata::builder()
                    .code("AccessDenied")
                    .message("Access Denied")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);
        let tm = test_client(client);

        let err = tm
            .upload()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from_static(b"payload"))
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::RemoteRejected, err.kind());
        assert!(err.diagnostic().contains("AccessDenied"));

        let logs = rx.contents();
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("upload failed"), "{logs}");
        assert!(logs.contains("test-bucket") && logs.contains("test-key"), "{logs}");
        assert!(logs.contains("AccessDenied"), "{logs}");
    }

    #[tokio::test]
    async fn test_missing_bucket_is_invalid_input() {
        let (_guard, rx) = capture_test_logs();
        let put_object = mock!(aws_sdk_s3::Client::put_object)
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);
        let tm = test_client(client);

        let err = tm
            .upload()
            .key("test-key")
            .body(InputStream::from_static(b"payload"))
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::InputInvalid, err.kind());
        assert_eq!(0, put_object.num_calls());

        let logs = rx.contents();
        assert!(logs.contains("upload failed"), "{logs}");
        assert!(logs.contains("bucket is required"), "{logs}");
        assert!(logs.contains("test-key"), "{logs}");
    }
}
