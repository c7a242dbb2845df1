/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::io::InputStream;
use crate::operation::upload::UploadOutput;
use crate::types::{ConcurrencySetting, FailedMultipartUploadPolicy, PartSize};

use super::UploadLargeInputBuilder;

/// Fluent builder for constructing a multipart object upload
#[derive(Debug)]
pub struct UploadLargeFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadLargeInputBuilder,
}

impl UploadLargeFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Upload the object in parts and wait for the upload to be completed.
    ///
    /// Bodies that fit in a single part are sent with one `PutObject` request instead.
    pub async fn send(self) -> Result<UploadOutput, Error> {
        let bucket = self.inner.bucket.clone().unwrap_or_default();
        let key = self.inner.key.clone().unwrap_or_default();
        let input = self.inner.build().inspect_err(|err| {
            crate::operation::log_failure("upload_large", &bucket, &key, err);
        })?;
        crate::operation::upload_large::UploadLarge::orchestrate(self.handle, input).await
    }

    /// The bucket name to which the object is uploaded.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Object key for which the upload is initiated.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// Object data, either an in-memory buffer or a file.
    pub fn body(mut self, input: InputStream) -> Self {
        self.inner = self.inner.body(input);
        self
    }

    /// Size of every part except the last.
    pub fn part_size(mut self, input: PartSize) -> Self {
        self.inner = self.inner.part_size(input);
        self
    }

    /// Number of parts in flight at once.
    pub fn concurrency(mut self, input: ConcurrencySetting) -> Self {
        self.inner = self.inner.concurrency(input);
        self
    }

    /// What to do with already uploaded parts when the upload fails.
    pub fn failed_multipart_upload_policy(mut self, input: FailedMultipartUploadPolicy) -> Self {
        self.inner = self.inner.failed_multipart_upload_policy(input);
        self
    }
}
