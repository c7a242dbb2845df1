/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ops::RangeInclusive;

use crate::error::{self, Error};
use crate::operation::upload::input::required_field;

/// Input type for downloading a byte range of an object
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DownloadRangeInput {
    /// The bucket name containing the object.
    pub bucket: String,
    /// Key of the object to read from.
    pub key: String,
    /// Inclusive range of bytes to return.
    pub range: RangeInclusive<u64>,
}

/// A builder for [`DownloadRangeInput`].
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct DownloadRangeInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) range: Option<RangeInclusive<u64>>,
}

impl DownloadRangeInputBuilder {
    /// The bucket name containing the object.
    ///
    /// This field is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Key of the object to read from.
    ///
    /// This field is required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Inclusive range of bytes to return, e.g. `0..=0` for the first byte.
    ///
    /// This field is required.
    pub fn range(mut self, input: RangeInclusive<u64>) -> Self {
        self.range = Some(input);
        self
    }

    /// Consumes the builder and constructs a [`DownloadRangeInput`].
    pub fn build(self) -> Result<DownloadRangeInput, Error> {
        Ok(DownloadRangeInput {
            bucket: required_field("bucket", self.bucket)?,
            key: required_field("key", self.key)?,
            range: self
                .range
                .ok_or_else(|| error::invalid_input("range is required"))?,
        })
    }
}
