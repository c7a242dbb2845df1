/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

mod context;
mod handle;
mod service;

use crate::error;
use crate::io::part_reader::Builder as PartReaderBuilder;
use crate::operation::upload::UploadOutput;
use crate::types::{ConcurrencySetting, PartSize};
use crate::{DEFAULT_CONCURRENCY, MEBIBYTE};
use context::UploadContext;
use handle::MultipartUploadHandle;
/// Request type for multipart uploads
pub use input::{UploadLargeInput, UploadLargeInputBuilder};
use service::distribute_work;
use tracing::Instrument;

use std::cmp;
use std::sync::Arc;

/// Maximum number of parts that a single S3 multipart upload supports
const MAX_PARTS: u64 = 10_000;

/// Minimum upload part size in bytes (all parts except the last)
pub(crate) const MIN_MULTIPART_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Operation struct for multipart object upload
#[derive(Clone, Default, Debug)]
pub(crate) struct UploadLarge;

impl UploadLarge {
    /// Execute a single `UploadLarge` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadLargeInput,
    ) -> Result<UploadOutput, error::Error> {
        let bucket = input.bucket.clone();
        let key = input.key.clone();
        let result = upload_large(handle, input).await;
        if let Err(err) = &result {
            crate::operation::log_failure("upload_large", &bucket, &key, err);
        }
        result
    }
}

async fn upload_large(
    handle: Arc<crate::client::Handle>,
    input: UploadLargeInput,
) -> Result<UploadOutput, error::Error> {
    let UploadLargeInput {
        bucket,
        key,
        body,
        part_size,
        concurrency,
        failed_multipart_upload_policy,
    } = input;

    let content_length = body.content_length();
    let part_size = effective_part_size(&part_size, content_length)?;

    if content_length <= part_size {
        tracing::trace!(
            "content length ({content_length}) fits in one part ({part_size}); sending PutObject"
        );
        return crate::operation::upload::put_object(&handle, &bucket, &key, body).await;
    }

    let num_parts = content_length.div_ceil(part_size);
    let workers =
        cmp::min(effective_concurrency(&concurrency) as u64, num_parts) as usize;
    tracing::trace!(
        "multipart upload of {num_parts} parts of {part_size} bytes, {workers} in flight"
    );

    let part_reader = Arc::new(
        PartReaderBuilder::new()
            .stream(body)
            .part_size(part_size.try_into().map_err(|_| {
                error::invalid_input(format!("part size {part_size} is too large"))
            })?)
            .build()?,
    );

    let upload_id = start_mpu(&handle, &bucket, &key).await?;
    tracing::trace!("multipart upload started with upload id: {upload_id}");

    let ctx = UploadContext::new(handle, bucket, key, upload_id, failed_multipart_upload_policy);
    let mut mpu = MultipartUploadHandle::new(ctx);
    distribute_work(&mut mpu, part_reader, workers);
    mpu.join().await
}

/// Resolve the part size to use for an object of `content_length` bytes
fn effective_part_size(part_size: &PartSize, content_length: u64) -> Result<u64, error::Error> {
    let part_size = match part_size {
        PartSize::Auto | PartSize::Target(0) => MIN_MULTIPART_PART_SIZE_BYTES,
        PartSize::Target(explicit) if *explicit < MIN_MULTIPART_PART_SIZE_BYTES => {
            return Err(error::invalid_input(format!(
                "part size must be at least {MIN_MULTIPART_PART_SIZE_BYTES} bytes, got {explicit}"
            )));
        }
        PartSize::Target(explicit) => *explicit,
    };

    Ok(cmp::max(part_size, content_length.div_ceil(MAX_PARTS)))
}

fn effective_concurrency(concurrency: &ConcurrencySetting) -> usize {
    match concurrency {
        ConcurrencySetting::Auto | ConcurrencySetting::Explicit(0) => DEFAULT_CONCURRENCY,
        ConcurrencySetting::Explicit(explicit) => *explicit,
    }
}

/// start a new multipart upload by invoking `CreateMultipartUpload`
async fn start_mpu(
    handle: &crate::client::Handle,
    bucket: &str,
    key: &str,
) -> Result<String, error::Error> {
    let resp = handle
        .config
        .client()
        .create_multipart_upload()
        .bucket(bucket)
        .key(key)
        .send()
        .instrument(tracing::debug_span!("send-create-multipart-upload"))
        .await?;

    resp.upload_id.ok_or_else(|| {
        error::Error::new(
            error::ErrorKind::Transport,
            "CreateMultipartUpload response is missing an upload ID",
        )
    })
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::io::InputStream;
    use crate::operation::upload_large::effective_part_size;
    use crate::types::{ConcurrencySetting, FailedMultipartUploadPolicy, PartSize};
    use crate::MEBIBYTE;
    use aws_sdk_s3::operation::abort_multipart_upload::AbortMultipartUploadOutput;
    use aws_sdk_s3::operation::complete_multipart_upload::CompleteMultipartUploadOutput;
    use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_sdk_s3::operation::upload_part::{UploadPartError, UploadPartOutput};
    use aws_smithy_mocks_experimental::{mock, mock_client, Rule, RuleMode};
    use aws_smithy_runtime::test_util::capture_test_logs::{capture_test_logs, show_test_logs};
    use aws_smithy_types::error::ErrorMetadata;
    use bytes::Bytes;
    use std::ops::Deref;
    use std::sync::Arc;

    const PART_SIZE: u64 = 5 * MEBIBYTE;

    fn test_client(s3_client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder()
            .client(s3_client)
            .unsigned_payload(true)
            .build()
            .unwrap();
        crate::Client::new(config)
    }

    // two full parts and a 9 byte tail
    fn three_part_body() -> Bytes {
        Bytes::from(vec![b'x'; (2 * PART_SIZE + 9) as usize])
    }

    #[tokio::test]
    async fn test_basic_mpu() {
        let _logs = show_test_logs();
        let expected_upload_id = Arc::new("test-upload".to_owned());

        let upload_id = expected_upload_id.clone();
        let create_mpu =
            mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(move || {
                CreateMultipartUploadOutput::builder()
                    .upload_id(upload_id.as_ref().to_owned())
                    .build()
            });

        let upload_id = expected_upload_id.clone();
        let upload_part = mock!(aws_sdk_s3::Client::upload_part)
            .match_requests(move |r| {
                let expected_len = match r.part_number() {
                    Some(1 | 2) => PART_SIZE as i64,
                    Some(3) => 9,
                    _ => return false,
                };
                r.upload_id() == Some(upload_id.as_str())
                    && r.content_length() == Some(expected_len)
            })
            .then_output(|| UploadPartOutput::builder().e_tag("part-etag").build());

        let expected_e_tag = Arc::new("test-e-tag".to_owned());
        let upload_id = expected_upload_id.clone();
        let e_tag = expected_e_tag.clone();
        let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
            .match_requests(move |r| {
                let numbers: Vec<i32> = r
                    .multipart_upload()
                    .map(|mpu| mpu.parts().iter().filter_map(|p| p.part_number()).collect())
                    .unwrap_or_else(Vec::new);
                r.upload_id() == Some(upload_id.as_str()) && numbers == vec![1, 2, 3]
            })
            .then_output(move || {
                CompleteMultipartUploadOutput::builder()
                    .e_tag(e_tag.as_ref().to_owned())
                    .build()
            });

        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            &[&create_mpu, &upload_part, &complete_mpu]
        );
        let tm = test_client(client);

        let resp = tm
            .upload_large()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from(three_part_body()))
            .part_size(PartSize::Target(PART_SIZE))
            .concurrency(ConcurrencySetting::Explicit(2))
            .send()
            .await
            .unwrap();

        assert_eq!(expected_upload_id.deref(), resp.upload_id().unwrap());
        assert_eq!(expected_e_tag.deref(), resp.e_tag().unwrap());
        assert_eq!(3, upload_part.num_calls());
        assert_eq!(1, complete_mpu.num_calls());
    }

    #[tokio::test]
    async fn test_single_part_body_uses_put_object() {
        let put_object = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| r.content_length() == Some(1024))
            .then_output(|| PutObjectOutput::builder().e_tag("small").build());
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .then_output(|| CreateMultipartUploadOutput::builder().upload_id("unused").build());

        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&put_object, &create_mpu]);
        let tm = test_client(client);

        let resp = tm
            .upload_large()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from(vec![0u8; 1024]))
            .send()
            .await
            .unwrap();

        assert_eq!(Some("small"), resp.e_tag());
        assert_eq!(None, resp.upload_id());
        assert_eq!(0, create_mpu.num_calls());
    }

    fn failing_part_rules() -> (Rule, Rule, Rule, Rule, Rule) {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .then_output(|| CreateMultipartUploadOutput::builder().upload_id("doomed").build());
        let failing_part = mock!(aws_sdk_s3::Client::upload_part)
            .match_requests(|r| r.part_number() == Some(2))
            .then_error(|| {
                UploadPartError::generic(
                    ErrorMetadata::builder()
                        .code("AccessDenied")
                        .message("Access Denied")
                        .build(),
                )
            });
        let upload_part = mock!(aws_sdk_s3::Client::upload_part)
            .then_output(|| UploadPartOutput::builder().e_tag("part-etag").build());
        let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
            .then_output(|| CompleteMultipartUploadOutput::builder().build());
        let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload)
            .match_requests(|r| r.upload_id() == Some("doomed"))
            .then_output(|| AbortMultipartUploadOutput::builder().build());
        (create_mpu, failing_part, upload_part, complete_mpu, abort_mpu)
    }

    #[tokio::test]
    async fn test_part_failure_aborts_upload() {
        let (_guard, rx) = capture_test_logs();
        let (create_mpu, failing_part, upload_part, complete_mpu, abort_mpu) =
            failing_part_rules();
        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            &[&create_mpu, &failing_part, &upload_part, &complete_mpu, &abort_mpu]
        );
        let tm = test_client(client);

        let err = tm
            .upload_large()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from(three_part_body()))
            .part_size(PartSize::Target(PART_SIZE))
            .concurrency(ConcurrencySetting::Explicit(1))
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::RemoteRejected, err.kind());
        assert_eq!(0, complete_mpu.num_calls());
        assert_eq!(1, abort_mpu.num_calls());

        let logs = rx.contents();
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("upload_large failed"), "{logs}");
        assert!(logs.contains("test-bucket") && logs.contains("test-key"), "{logs}");
        assert!(logs.contains("AccessDenied"), "{logs}");
    }

    #[tokio::test]
    async fn test_part_failure_with_retain_policy() {
        let (create_mpu, failing_part, upload_part, complete_mpu, abort_mpu) =
            failing_part_rules();
        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            &[&create_mpu, &failing_part, &upload_part, &complete_mpu, &abort_mpu]
        );
        let tm = test_client(client);

        let err = tm
            .upload_large()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from(three_part_body()))
            .part_size(PartSize::Target(PART_SIZE))
            .concurrency(ConcurrencySetting::Explicit(1))
            .failed_multipart_upload_policy(FailedMultipartUploadPolicy::Retain)
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::RemoteRejected, err.kind());
        assert_eq!(0, complete_mpu.num_calls());
        assert_eq!(0, abort_mpu.num_calls());
    }

    #[tokio::test]
    async fn test_part_size_below_minimum_is_rejected() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .then_output(|| CreateMultipartUploadOutput::builder().upload_id("unused").build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&create_mpu]);
        let tm = test_client(client);

        let err = tm
            .upload_large()
            .bucket("test-bucket")
            .key("test-key")
            .body(InputStream::from(three_part_body()))
            .part_size(PartSize::Target(1024))
            .send()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::InputInvalid, err.kind());
        assert_eq!(0, create_mpu.num_calls());
    }

    #[test]
    fn test_effective_part_size() {
        assert_eq!(PART_SIZE, effective_part_size(&PartSize::Auto, 100).unwrap());
        assert_eq!(PART_SIZE, effective_part_size(&PartSize::Target(0), 100).unwrap());
        assert_eq!(
            8 * MEBIBYTE,
            effective_part_size(&PartSize::Target(8 * MEBIBYTE), 100).unwrap()
        );
        // grows so that the object fits in 10,000 parts
        let huge = 100_000 * MEBIBYTE;
        assert_eq!(
            huge.div_ceil(10_000),
            effective_part_size(&PartSize::Target(PART_SIZE), huge).unwrap()
        );
    }
}
