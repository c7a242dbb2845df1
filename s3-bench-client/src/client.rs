/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::Config;
use std::sync::Arc;

/// Client handle for an S3-compatible object store.
///
/// The handle is immutable after construction. Clones share the same underlying connection
/// pool and may be used from any number of concurrent operations without locking.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a single object with one `PutObject` request.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](crate::operation::upload::builders::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use s3_bench_client::io::InputStream;
    ///
    /// async fn upload_file(
    ///     client: &s3_bench_client::Client,
    ///     path: impl AsRef<Path>
    /// ) -> Result<(), s3_bench_client::error::Error> {
    ///     let stream = InputStream::from_path(path)?;
    ///     client.upload()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .body(stream)
    ///         .send()
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> crate::operation::upload::builders::UploadFluentBuilder {
        crate::operation::upload::builders::UploadFluentBuilder::new(self.handle.clone())
    }

    /// Upload a single object as a multipart upload with parts sent concurrently.
    ///
    /// Constructs a fluent builder for the
    /// [`UploadLarge`](crate::operation::upload_large::builders::UploadLargeFluentBuilder)
    /// operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use s3_bench_client::io::InputStream;
    /// use s3_bench_client::types::{ConcurrencySetting, PartSize};
    ///
    /// async fn upload_large_file(
    ///     client: &s3_bench_client::Client,
    /// ) -> Result<(), s3_bench_client::error::Error> {
    ///     client.upload_large()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .body(InputStream::from_path("/tmp/1GiB.bin")?)
    ///         .part_size(PartSize::Target(16 * 1024 * 1024))
    ///         .concurrency(ConcurrencySetting::Explicit(8))
    ///         .send()
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn upload_large(
        &self,
    ) -> crate::operation::upload_large::builders::UploadLargeFluentBuilder {
        crate::operation::upload_large::builders::UploadLargeFluentBuilder::new(
            self.handle.clone(),
        )
    }

    /// Download an inclusive byte range of an object into memory.
    ///
    /// Constructs a fluent builder for the
    /// [`DownloadRange`](crate::operation::download_range::builders::DownloadRangeFluentBuilder)
    /// operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn first_byte(
    ///     client: &s3_bench_client::Client,
    /// ) -> Result<u8, s3_bench_client::error::Error> {
    ///     let data = client
    ///         .download_range()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .range(0..=0)
    ///         .send()
    ///         .await?;
    ///     Ok(data[0])
    /// }
    /// ```
    pub fn download_range(
        &self,
    ) -> crate::operation::download_range::builders::DownloadRangeFluentBuilder {
        crate::operation::download_range::builders::DownloadRangeFluentBuilder::new(
            self.handle.clone(),
        )
    }
}
