/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// Value of an HTTP `Range` request header
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Range {
    /// An inclusive range of bytes, `bytes={start}-{end}`
    Bytes { start: u64, end: u64 },
}

impl Range {
    /// Create a new range covering bytes `start` through `end` (inclusive).
    ///
    /// NOTE: `start > end` is not rejected here, the remote store decides how to answer it.
    pub(crate) fn bytes_inclusive(start: u64, end: u64) -> Self {
        Range::Bytes { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Bytes { start, end } => write!(f, "bytes={start}-{end}"),
        }
    }
}

impl From<Range> for String {
    fn from(value: Range) -> Self {
        value.to_string()
    }
}
