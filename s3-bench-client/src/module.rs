/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Runtime;

use crate::error::{self, Error};
use crate::io::InputStream;
use crate::types::{ConcurrencySetting, PartSize};
use crate::Client;

/// Owns the async runtime that every worker's blocking calls are driven on.
///
/// Create one `RootModule` per benchmark process and one [`S3`] instance per worker with
/// [`RootModule::new_module_instance`].
#[derive(Debug, Clone)]
pub struct RootModule {
    runtime: Arc<Runtime>,
}

impl RootModule {
    /// Create a module backed by a new multi-threaded runtime.
    pub fn new() -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("s3-bench-client")
            .build()?;
        Ok(Self::with_runtime(Arc::new(runtime)))
    }

    /// Create a module that drives calls on an existing runtime.
    pub fn with_runtime(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }

    /// The runtime calls are driven on
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    /// Create the facade for a single worker.
    pub fn new_module_instance(&self) -> S3 {
        S3 {
            runtime: self.runtime.clone(),
        }
    }
}

/// Blocking entry point for one benchmark worker.
///
/// Every call blocks the calling thread until the operation completes. Must not be called
/// from within an async context. Client handles are passed in by the caller; an `S3`
/// instance keeps nothing between calls.
#[derive(Debug, Clone)]
pub struct S3 {
    runtime: Arc<Runtime>,
}

impl S3 {
    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Resolve a client for `endpoint` with static credentials and path-style addressing.
    pub fn create(
        &self,
        access_key: &str,
        secret_key: &str,
        endpoint: &str,
        region: &str,
    ) -> Result<Client, Error> {
        let config = self
            .block_on(
                crate::from_env()
                    .access_key(access_key)
                    .secret_key(secret_key)
                    .endpoint(endpoint)
                    .region(region)
                    .load(),
            )
            .inspect_err(|err| {
                tracing::error!(endpoint, "failed to create client: {}", err.diagnostic())
            })?;
        Ok(Client::new(config))
    }

    /// Generate `size` random bytes.
    pub fn random_data(&self, size: i64) -> Result<Bytes, Error> {
        let size = non_negative("size", size)
            .and_then(|size| {
                usize::try_from(size)
                    .map_err(|_| error::invalid_input(format!("size {size} is too large")))
            })
            .inspect_err(|err| {
                tracing::error!(operation = "randomData", "randomData failed: {}", err.diagnostic())
            })?;
        Ok(crate::random::random_data(size))
    }

    /// Upload the file at `file_path` with a single request.
    ///
    /// Fails without sending anything if the file cannot be opened.
    pub fn upload(
        &self,
        client: &Client,
        bucket: &str,
        key: &str,
        file_path: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let body = InputStream::from_path(file_path)
            .inspect_err(|err| crate::operation::log_failure("upload", bucket, key, err))?;
        self.block_on(client.upload().bucket(bucket).key(key).body(body).send())?;
        Ok(())
    }

    /// Upload the file at `file_path` as a multipart upload.
    ///
    /// A `part_size` of 0 selects the default of 5 MiB and a `concurrency` of 0 selects the
    /// default of 5 parts in flight.
    pub fn upload_large_file(
        &self,
        client: &Client,
        bucket: &str,
        key: &str,
        file_path: impl AsRef<Path>,
        part_size: i64,
        concurrency: i64,
    ) -> Result<(), Error> {
        let log = |err: &Error| crate::operation::log_failure("uploadLargeFile", bucket, key, err);
        let part_size = non_negative("part size", part_size).inspect_err(log)?;
        let concurrency = non_negative("concurrency", concurrency).inspect_err(log)?;
        let body = InputStream::from_path(file_path).inspect_err(log)?;

        self.block_on(
            client
                .upload_large()
                .bucket(bucket)
                .key(key)
                .body(body)
                .part_size(PartSize::Target(part_size))
                .concurrency(ConcurrencySetting::Explicit(concurrency as usize))
                .send(),
        )?;
        Ok(())
    }

    /// Upload an in-memory buffer with a single request.
    pub fn upload_data(
        &self,
        client: &Client,
        bucket: &str,
        key: &str,
        data: impl Into<Bytes>,
    ) -> Result<(), Error> {
        let body = InputStream::from(data.into());
        self.block_on(client.upload().bucket(bucket).key(key).body(body).send())?;
        Ok(())
    }

    /// Read bytes `begin` through `end` (inclusive) of an object.
    pub fn download_data_range(
        &self,
        client: &Client,
        bucket: &str,
        key: &str,
        begin: i64,
        end: i64,
    ) -> Result<Bytes, Error> {
        let log =
            |err: &Error| crate::operation::log_failure("downloadDataRange", bucket, key, err);
        let begin = non_negative("begin", begin).inspect_err(log)?;
        let end = non_negative("end", end).inspect_err(log)?;
        self.block_on(
            client
                .download_range()
                .bucket(bucket)
                .key(key)
                .range(begin..=end)
                .send(),
        )
    }
}

fn non_negative(name: &str, value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .map_err(|_| error::invalid_input(format!("{name} must not be negative, got {value}")))
}
