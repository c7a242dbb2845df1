/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Types for single request object upload operation
pub mod upload;

/// Types for multipart object upload operation
pub mod upload_large;

/// Types for ranged object download operation
pub mod download_range;

use crate::error::Error;

/// Log a failed operation before handing the error back to the caller
pub(crate) fn log_failure(operation: &'static str, bucket: &str, key: &str, err: &Error) {
    tracing::error!(
        operation,
        bucket,
        key,
        "{} failed: {}",
        operation,
        err.diagnostic()
    );
}
