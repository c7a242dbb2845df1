/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ops::RangeInclusive;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::Error;

use super::DownloadRangeInputBuilder;

/// Fluent builder for constructing a ranged object download
#[derive(Debug)]
pub struct DownloadRangeFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: DownloadRangeInputBuilder,
}

impl DownloadRangeFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Fetch the requested bytes and return them once the whole body has arrived.
    pub async fn send(self) -> Result<Bytes, Error> {
        let bucket = self.inner.bucket.clone().unwrap_or_default();
        let key = self.inner.key.clone().unwrap_or_default();
        let input = self.inner.build().inspect_err(|err| {
            crate::operation::log_failure("download_range", &bucket, &key, err);
        })?;
        crate::operation::download_range::DownloadRange::orchestrate(self.handle, input).await
    }

    /// The bucket name containing the object.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Key of the object to read from.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// Inclusive range of bytes to return.
    pub fn range(mut self, input: RangeInclusive<u64>) -> Self {
        self.inner = self.inner.range(input);
        self
    }
}
