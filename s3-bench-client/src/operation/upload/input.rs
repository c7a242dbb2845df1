/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};
use crate::io::InputStream;

/// Input type for a single request upload
#[non_exhaustive]
#[derive(Debug)]
pub struct UploadInput {
    /// The bucket name to which the object is uploaded.
    pub bucket: String,
    /// Object key for which the upload is initiated.
    pub key: String,
    /// Object data.
    pub body: InputStream,
}

/// A builder for [`UploadInput`].
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct UploadInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) body: Option<InputStream>,
}

impl UploadInputBuilder {
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
    ///
    /// Defaults to an empty body.
    pub fn body(mut self, input: InputStream) -> Self {
        self.body = Some(input);
        self
    }

    /// Consumes the builder and constructs a [`UploadInput`].
    pub fn build(self) -> Result<UploadInput, Error> {
        Ok(UploadInput {
            bucket: required_field("bucket", self.bucket)?,
            key: required_field("key", self.key)?,
            body: self.body.unwrap_or_default(),
        })
    }
}

/// Unwrap a required string field, rejecting missing and empty values
pub(crate) fn required_field(name: &str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error::invalid_input(format!("{name} is required"))),
    }
}
