/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fs;
use std::path::PathBuf;

use crate::error::{self, Error};

/// A whole regular file used as an upload body.
#[derive(Debug)]
pub(super) struct PathBody {
    pub(super) path: PathBuf,
    // file size captured when the body was opened
    pub(super) length: u64,
}

impl PathBody {
    /// Check that `path` is a readable regular file and capture its size.
    ///
    /// The file is opened once so that a missing or unreadable file is reported here,
    /// before any request is made.
    pub(super) fn open(path: PathBuf) -> Result<Self, Error> {
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(error::invalid_input(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        // opening checks permissions, metadata alone does not
        drop(fs::File::open(&path)?);

        Ok(PathBody {
            path,
            length: metadata.len(),
        })
    }
}
