/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Object storage operations for load tests against S3-compatible endpoints.
//!
//! A benchmark worker resolves a [`Client`] once and then issues uploads and ranged
//! downloads against it on every iteration. Clients are immutable after construction and
//! can be shared freely between concurrent operations.
//!
//! # Examples
//!
//! Resolve a client for a self-hosted endpoint:
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_bench_client::error::Error> {
//! let config = s3_bench_client::from_env()
//!     .access_key("minio")
//!     .secret_key("minio123")
//!     .endpoint("http://127.0.0.1:9000")
//!     .region("us-east-1")
//!     .load()
//!     .await?;
//! let client = s3_bench_client::Client::new(config);
//!
//! client
//!     .upload()
//!     .bucket("bench")
//!     .key("small-object")
//!     .body(s3_bench_client::random::random_data(4096).into())
//!     .send()
//!     .await?;
//!
//! let first_kib = client
//!     .download_range()
//!     .bucket("bench")
//!     .key("small-object")
//!     .range(0..=1023)
//!     .send()
//!     .await?;
//! assert_eq!(first_kib.len(), 1024);
//! # Ok(())
//! # }
//! ```
//!
//! Scripts that run on a plain thread use the blocking facade in [`module`].

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

/// Default number of parts in flight for a multipart upload
pub(crate) const DEFAULT_CONCURRENCY: usize = 5;

/// Error types emitted by `s3-bench-client`
pub mod error;

/// Common types used by `s3-bench-client`
pub mod types;

/// Types and helpers for I/O
pub mod io;

/// Client handle
pub mod client;

/// Transfer operations
pub mod operation;

/// Client configuration and endpoint resolution
pub mod config;

/// Random payload generation
pub mod random;

/// Blocking per-worker facade for benchmark scripts
pub mod module;

/// HTTP related components and utils
pub(crate) mod http;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
///
/// Anything not set explicitly on the loader (retry, timeouts, ...) falls back to the
/// standard AWS environment configuration.
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
