/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`Error::diagnostic`] (or [`DisplayErrorContext`]) to render the entire
/// error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Client construction failed. A client that failed to resolve must not be used.
    Configuration,

    /// Operation input validation issues
    InputInvalid,

    /// Local I/O errors (e.g. the source file is missing or unreadable)
    IOError,

    /// Network failure, timeout, or a malformed response
    Transport,

    /// The remote store answered with a protocol level error (access denied, precondition
    /// failed, ...)
    RemoteRejected,

    /// Resource not found (e.g. bucket, key, multipart upload ID not found)
    NotFound,

    /// Some kind of internal runtime issue (e.g. task failure)
    RuntimeError,

    /// Failed to upload a part or read a response body
    ChunkFailed(ChunkFailed),
}

/// Stores information about a failed chunk
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChunkFailed {
    part_number: Option<u64>,
}

impl ChunkFailed {
    /// The (1-indexed) part number of a multipart upload that failed, if any.
    pub fn part_number(&self) -> Option<u64> {
        self.part_number
    }
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Human readable description of this error including the full cause chain.
    pub fn diagnostic(&self) -> String {
        DisplayErrorContext(self).to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Configuration => write!(f, "client configuration failed"),
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::RemoteRejected => write!(f, "request rejected by remote store"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::ChunkFailed(chunk) => match chunk.part_number {
                Some(part_number) => write!(f, "failed to upload part {part_number}"),
                None => write!(f, "failed to read response body"),
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl<E, R> From<SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: SdkError<E, R>) -> Self {
        let kind = match &value {
            SdkError::ServiceError(_) => match value.code() {
                Some("NotFound" | "NoSuchKey" | "NoSuchUpload" | "NoSuchBucket") => {
                    ErrorKind::NotFound
                }
                _ => ErrorKind::RemoteRejected,
            },
            SdkError::ConstructionFailure(_) => ErrorKind::InputInvalid,
            _ => ErrorKind::Transport,
        };

        Error::new(kind, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn configuration<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::Configuration, err)
}

pub(crate) fn part_failed<E>(part_number: u64, err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(
        ErrorKind::ChunkFailed(ChunkFailed {
            part_number: Some(part_number),
        }),
        err,
    )
}

pub(crate) fn body_failed<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ChunkFailed(ChunkFailed { part_number: None }), err)
}
