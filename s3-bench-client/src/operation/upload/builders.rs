/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::io::InputStream;

use super::{UploadInputBuilder, UploadOutput};

/// Fluent builder for constructing a single request object upload
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadInputBuilder,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Upload the object and wait for the store to acknowledge it.
    pub async fn send(self) -> Result<UploadOutput, Error> {
        let bucket = self.inner.bucket.clone().unwrap_or_default();
        let key = self.inner.key.clone().unwrap_or_default();
        let input = self.inner.build().inspect_err(|err| {
            crate::operation::log_failure("upload", &bucket, &key, err);
        })?;
        crate::operation::upload::Upload::orchestrate(self.handle, input).await
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
}
