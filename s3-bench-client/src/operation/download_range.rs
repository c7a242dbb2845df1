/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use crate::error;
use crate::http::header::Range;
use bytes::Bytes;
/// Request type for ranged downloads
pub use input::{DownloadRangeInput, DownloadRangeInputBuilder};
use tracing::Instrument;

use std::sync::Arc;

/// Operation struct for ranged object download
#[derive(Clone, Default, Debug)]
pub(crate) struct DownloadRange;

impl DownloadRange {
    /// Execute a single `DownloadRange` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: DownloadRangeInput,
    ) -> Result<Bytes, error::Error> {
        let result = get_object(&handle, &input).await;
        if let Err(err) = &result {
            crate::operation::log_failure("download_range", &input.bucket, &input.key, err);
        }
        result
    }
}

async fn get_object(
    handle: &crate::client::Handle,
    input: &DownloadRangeInput,
) -> Result<Bytes, error::Error> {
    let range = Range::bytes_inclusive(*input.range.start(), *input.range.end());
    let resp = handle
        .config
        .client()
        .get_object()
        .bucket(&input.bucket)
        .key(&input.key)
        .range(range)
        .send()
        .instrument(tracing::info_span!(
            "send-get-object",
            bucket = %input.bucket,
            key = %input.key
        ))
        .await?;

    let body = resp
        .body
        .collect()
        .instrument(tracing::debug_span!("collect-body"))
        .await
        .map_err(error::body_failed)?
        .into_bytes();

    tracing::trace!(
        "downloaded {} bytes from {}/{}",
        body.len(),
        input.bucket,
        input.key
    );
    Ok(body)
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
    use aws_sdk_s3::primitives::ByteStream;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_runtime::test_util::capture_test_logs::capture_test_logs;
    use aws_smithy_types::error::ErrorMetadata;

    fn test_client(s3_client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder().client(s3_client).build().unwrap();
        crate::Client::new(config)
    }

    #[tokio::test]
    async fn test_download_range_sends_inclusive_range() {
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket")
                    && r.key() == Some("test-key")
                    && r.range() == Some("bytes=100-199")
            })
            .then_output(|| {
                GetObjectOutput::builder()
                    .content_length(100)
                    .content_range("bytes 100-199/1000")
                    .body(ByteStream::from(vec![7u8; 100]))
                    .build()
            });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_object]);
        let tm = test_client(client);

        let data = tm
            .download_range()
            .bucket("test-bucket")
            .key("test-key")
            .range(100..=199)
            .send()
            .await
            .unwrap();

        assert_eq!(vec![7u8; 100], data.to_vec());
        assert_eq!(1, get_object.num_calls());
    }

    #[tokio::test]
    async fn test_download_range_missing_key() {
        let (_guard, rx) = capture_test_logs();
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .then_error(|| {
                GetObjectError::generic(
                    ErrorMetadata::builder()
                        .code("NoSuchKey")
                        .message("The specified key does not exist.")
                        .build(),
                )
            });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_object]);
        let tm = test_client(client);

        let err = tm
            .download_range()
            .bucket("test-bucket")
            .key("missing")
            .range(0..=0)
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::NotFound, err.kind());

        let logs = rx.contents();
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("download_range failed"), "{logs}");
        assert!(logs.contains("test-bucket") && logs.contains("missing"), "{logs}");
        assert!(logs.contains("NoSuchKey"), "{logs}");
    }

    #[tokio::test]
    async fn test_download_range_requires_range() {
        let (_guard, rx) = capture_test_logs();
        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .then_output(|| GetObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_object]);
        let tm = test_client(client);

        let err = tm
            .download_range()
            .bucket("test-bucket")
            .key("test-key")
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::InputInvalid, err.kind());
        assert_eq!(0, get_object.num_calls());

        let logs = rx.contents();
        assert!(logs.contains("download_range failed"), "{logs}");
        assert!(logs.contains("range is required"), "{logs}");
        assert!(logs.contains("test-bucket") && logs.contains("test-key"), "{logs}");
    }
}
