/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::byte_stream::Length;
use bytes::{Buf, Bytes};

use crate::error;
use crate::io::path_body::PathBody;

/// Source of binary data for an upload.
///
/// `InputStream` is either an in-memory buffer or a region of a local file.
#[derive(Debug)]
pub struct InputStream {
    pub(super) inner: RawInputStream,
}

impl InputStream {
    /// Create a new `InputStream` from a static byte slice
    pub fn from_static(bytes: &'static [u8]) -> Self {
        let inner = RawInputStream::Buf(bytes.into());
        Self { inner }
    }

    /// Create a new `InputStream` that reads data from a given `path`.
    ///
    /// Fails with [`ErrorKind::IOError`](crate::error::ErrorKind::IOError) if the file
    /// does not exist or cannot be opened.
    ///
    /// ## Warning
    /// The contents of the file MUST not change while the transfer is in progress. The
    /// length of the file is captured here.
    pub fn from_path(path: impl AsRef<Path>) -> Result<InputStream, error::Error> {
        let body = PathBody::open(path.as_ref().to_path_buf())?;
        Ok(Self {
            inner: RawInputStream::Fs(body),
        })
    }

    /// Number of bytes this stream will yield
    pub fn content_length(&self) -> u64 {
        match &self.inner {
            RawInputStream::Buf(bytes) => bytes.remaining() as u64,
            RawInputStream::Fs(path_body) => path_body.length,
        }
    }

    /// Converts `InputStream` to a `ByteStream` that can be used in PutObject.
    pub(crate) async fn into_byte_stream(self) -> Result<ByteStream, error::Error> {
        match self.inner {
            RawInputStream::Fs(path_body) => ByteStream::read_from()
                .path(path_body.path)
                .length(Length::Exact(path_body.length))
                .build()
                .await
                .map_err(|err| error::Error::new(error::ErrorKind::IOError, err)),
            RawInputStream::Buf(bytes) => Ok(ByteStream::from(bytes)),
        }
    }
}

#[derive(Debug)]
pub(super) enum RawInputStream {
    /// In-memory buffer to read from
    Buf(Bytes),
    /// File based input
    Fs(PathBody),
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            inner: RawInputStream::Buf(Bytes::default()),
        }
    }
}

impl From<Bytes> for InputStream {
    fn from(value: Bytes) -> Self {
        Self {
            inner: RawInputStream::Buf(value),
        }
    }
}

impl From<Vec<u8>> for InputStream {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}
