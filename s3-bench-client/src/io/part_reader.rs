/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::cmp;
use std::path::PathBuf;
use std::sync::Mutex;

use bytes::{Buf, Bytes};

use crate::error::{self, Error};
use crate::io::stream::RawInputStream;
use crate::io::InputStream;
use crate::MEBIBYTE;

/// Builder for creating a `PartReader`
#[derive(Debug)]
pub(crate) struct Builder {
    stream: Option<RawInputStream>,
    part_size: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            stream: None,
            part_size: 5 * MEBIBYTE as usize,
        }
    }

    /// Set the input stream to read from.
    pub(crate) fn stream(mut self, stream: InputStream) -> Self {
        self.stream = Some(stream.inner);
        self
    }

    /// Set the target part size that should be used when reading data.
    ///
    /// All parts except for possibly the last one will be of this size.
    pub(crate) fn part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    pub(crate) fn build(self) -> Result<PartReader, Error> {
        let stream = self
            .stream
            .ok_or_else(|| error::invalid_input("input stream is required"))?;
        if self.part_size == 0 {
            return Err(error::invalid_input("part size must be greater than zero"));
        }
        Ok(PartReader::new(stream, self.part_size))
    }
}

/// Splits an [`InputStream`] into consecutive parts.
///
/// Safe to share between workers; every call to `next_part` hands out the next unclaimed
/// part.
#[derive(Debug)]
pub(crate) struct PartReader {
    inner: Inner,
    part_size: usize,
}

#[derive(Debug)]
enum Inner {
    Bytes(BytesPartReader),
    Fs(PathBodyPartReader),
}

impl PartReader {
    fn new(raw: RawInputStream, part_size: usize) -> Self {
        let inner = match raw {
            RawInputStream::Buf(buf) => Inner::Bytes(BytesPartReader::new(buf)),
            RawInputStream::Fs(path_body) => {
                Inner::Fs(PathBodyPartReader::new(path_body.path, path_body.length))
            }
        };

        Self { inner, part_size }
    }

    pub(crate) async fn next_part(&self) -> Result<Option<PartData>, Error> {
        match &self.inner {
            Inner::Bytes(bytes) => Ok(bytes.next_part(self.part_size)),
            Inner::Fs(path_body) => path_body.next_part(self.part_size).await,
        }
    }
}

/// Contents of a single part of a multipart upload.
#[derive(Debug, Clone)]
pub(crate) struct PartData {
    // 1-indexed
    pub(crate) part_number: u64,
    pub(crate) data: Bytes,
}

impl PartData {
    fn new(part_number: u64, data: impl Into<Bytes>) -> Self {
        Self {
            part_number,
            data: data.into(),
        }
    }
}

#[derive(Debug)]
struct PartReaderState {
    // current start offset
    offset: u64,
    // current part number
    part_number: u64,
    // total number of bytes remaining to be read
    remaining: u64,
}

impl PartReaderState {
    fn new(content_length: u64) -> Self {
        Self {
            offset: 0,
            part_number: 1,
            remaining: content_length,
        }
    }

    /// Claim the next part, returning `(offset, part_number, size)`
    fn advance(&mut self, part_size: usize) -> Option<(u64, u64, u64)> {
        if self.remaining == 0 {
            return None;
        }
        let offset = self.offset;
        let part_number = self.part_number;
        let size = cmp::min(part_size as u64, self.remaining);
        self.offset += size;
        self.part_number += 1;
        self.remaining -= size;
        Some((offset, part_number, size))
    }
}

/// Implementation for in-memory input streams.
#[derive(Debug)]
struct BytesPartReader {
    buf: Bytes,
    state: Mutex<PartReaderState>, // std Mutex
}

impl BytesPartReader {
    fn new(buf: Bytes) -> Self {
        let content_length = buf.remaining() as u64;
        Self {
            buf,
            state: Mutex::new(PartReaderState::new(content_length)),
        }
    }

    fn next_part(&self, part_size: usize) -> Option<PartData> {
        let claimed = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.advance(part_size)
        };
        claimed.map(|(offset, part_number, size)| {
            let start = offset as usize;
            let end = start + size as usize;
            PartData::new(part_number, self.buf.slice(start..end))
        })
    }
}

/// Implementation for path based input streams
#[derive(Debug)]
struct PathBodyPartReader {
    path: PathBuf,
    state: Mutex<PartReaderState>, // std Mutex
}

impl PathBodyPartReader {
    fn new(path: PathBuf, length: u64) -> Self {
        Self {
            path,
            state: Mutex::new(PartReaderState::new(length)),
        }
    }

    async fn next_part(&self, part_size: usize) -> Result<Option<PartData>, Error> {
        let claimed = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.advance(part_size)
        };
        let Some((offset, part_number, size)) = claimed else {
            return Ok(None);
        };

        let path = self.path.clone();
        let data = tokio::task::spawn_blocking(move || {
            let mut dst = vec![0; size as usize];
            file_util::read_file_chunk_sync(&mut dst, path, offset).map(|_| dst)
        })
        .await?
        .map_err(|err| error::part_failed(part_number, err))?;

        Ok(Some(PartData::new(part_number, data)))
    }
}

mod file_util {
    #[cfg(unix)]
    pub(super) use unix::read_file_chunk_sync;
    #[cfg(windows)]
    pub(super) use windows::read_file_chunk_sync;

    #[cfg(unix)]
    mod unix {
        use std::fs::File;
        use std::io;
        use std::os::unix::fs::FileExt;
        use std::path::Path;

        pub(crate) fn read_file_chunk_sync(
            dst: &mut [u8],
            path: impl AsRef<Path>,
            offset: u64,
        ) -> Result<(), io::Error> {
            let file = File::open(path)?;
            file.read_exact_at(dst, offset)
        }
    }

    #[cfg(windows)]
    mod windows {
        use std::fs::File;
        use std::io;
        use std::io::{Read, Seek, SeekFrom};
        use std::path::Path;

        pub(crate) fn read_file_chunk_sync(
            dst: &mut [u8],
            path: impl AsRef<Path>,
            offset: u64,
        ) -> Result<(), io::Error> {
            let mut file = File::open(path)?;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(dst)
        }
    }
}
