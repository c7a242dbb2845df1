/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::Error;
use crate::io::InputStream;
use crate::operation::upload::input::required_field;
use crate::types::{ConcurrencySetting, FailedMultipartUploadPolicy, PartSize};

/// Input type for a multipart object upload
#[non_exhaustive]
#[derive(Debug)]
pub struct UploadLargeInput {
    /// The bucket name to which the object is uploaded.
    pub bucket: String,
    /// Object key for which the upload is initiated.
    pub key: String,
    /// Object data.
    pub body: InputStream,
    /// Size of every part except the last.
    pub part_size: PartSize,
    /// Number of parts in flight at once.
    pub concurrency: ConcurrencySetting,
    /// What to do with already uploaded parts when the upload fails.
    pub failed_multipart_upload_policy: FailedMultipartUploadPolicy,
}

/// A builder for [`UploadLargeInput`].
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct UploadLargeInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) body: Option<InputStream>,
    pub(crate) part_size: PartSize,
    pub(crate) concurrency: ConcurrencySetting,
    pub(crate) failed_multipart_upload_policy: FailedMultipartUploadPolicy,
}

impl UploadLargeInputBuilder {
    /// The bucket name to which the object is uploaded.
    ///
    /// This field is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Object key for which the upload is initiated.
    ///
    /// This field is required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Object data.
    pub fn body(mut self, input: InputStream) -> Self {
        self.body = Some(input);
        self
    }

    /// Size of every part except the last.
    ///
    /// Explicit sizes below 5 MiB are rejected. The size is raised when the object would
    /// otherwise need more than 10,000 parts.
    pub fn part_size(mut self, input: PartSize) -> Self {
        self.part_size = input;
        self
    }

    /// Number of parts in flight at once.
    pub fn concurrency(mut self, input: ConcurrencySetting) -> Self {
        self.concurrency = input;
        self
    }

    /// What to do with already uploaded parts when the upload fails.
    pub fn failed_multipart_upload_policy(mut self, input: FailedMultipartUploadPolicy) -> Self {
        self.failed_multipart_upload_policy = input;
        self
    }

    /// Consumes the builder and constructs a [`UploadLargeInput`].
    pub fn build(self) -> Result<UploadLargeInput, Error> {
        Ok(UploadLargeInput {
            bucket: required_field("bucket", self.bucket)?,
            key: required_field("key", self.key)?,
            body: self.body.unwrap_or_default(),
            part_size: self.part_size,
            concurrency: self.concurrency,
            failed_multipart_upload_policy: self.failed_multipart_upload_policy,
        })
    }
}
