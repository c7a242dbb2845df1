/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// The part size to use for a multipart upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartSize {
    /// Use the default part size (5 MiB).
    #[default]
    Auto,

    /// Part size explicitly given in bytes.
    ///
    /// NOTE: The part size used may be larger than requested if the current value would
    /// result in more than 10,000 parts for an upload request.
    Target(u64),
}

/// The number of parts of a single multipart upload that may be in flight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcurrencySetting {
    /// Use the default concurrency (5 parts in flight).
    #[default]
    Auto,

    /// Explicitly configured concurrency setting.
    Explicit(usize),
}

/// Policy for how to handle a failed multipart upload
///
/// Default is to abort the upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FailedMultipartUploadPolicy {
    /// Abort the upload on any individual part failure
    #[default]
    AbortUpload,
    /// Retain any uploaded parts. The upload ID will be available in the error log.
    Retain,
}
