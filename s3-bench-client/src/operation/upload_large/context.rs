/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::FailedMultipartUploadPolicy;
use std::sync::Arc;

/// Internal context used to drive a single multipart upload
#[derive(Debug, Clone)]
pub(super) struct UploadContext {
    /// reference to client handle used to do actual work
    pub(super) handle: Arc<crate::client::Handle>,
    /// the multipart upload ID
    pub(super) upload_id: String,
    /// object the parts are uploaded to
    target: Arc<UploadTarget>,
}

#[derive(Debug)]
struct UploadTarget {
    bucket: String,
    key: String,
    failed_multipart_upload_policy: FailedMultipartUploadPolicy,
}

impl UploadContext {
    pub(super) fn new(
        handle: Arc<crate::client::Handle>,
        bucket: String,
        key: String,
        upload_id: String,
        failed_multipart_upload_policy: FailedMultipartUploadPolicy,
    ) -> Self {
        Self {
            handle,
            upload_id,
            target: Arc::new(UploadTarget {
                bucket,
                key,
                failed_multipart_upload_policy,
            }),
        }
    }

    /// The S3 client to use for SDK operations
    pub(super) fn client(&self) -> &aws_sdk_s3::Client {
        self.handle.config.client()
    }

    pub(super) fn unsigned_payload(&self) -> bool {
        self.handle.config.unsigned_payload()
    }

    pub(super) fn bucket(&self) -> &str {
        &self.target.bucket
    }

    pub(super) fn key(&self) -> &str {
        &self.target.key
    }

    pub(super) fn failed_multipart_upload_policy(&self) -> &FailedMultipartUploadPolicy {
        &self.target.failed_multipart_upload_policy
    }
}
