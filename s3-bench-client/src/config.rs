/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};

/// Config loader for S3-compatible endpoints
pub mod loader;

/// Configuration for a [`Client`](crate::client::Client)
///
/// A `Config` is immutable once built. Cloning it is cheap and every clone shares the same
/// underlying S3 client.
#[derive(Debug, Clone)]
pub struct Config {
    endpoint: Option<String>,
    region: Option<String>,
    force_path_style: bool,
    unsigned_payload: bool,
    client: aws_sdk_s3::client::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The endpoint URL every request is sent to, if one was resolved through
    /// [`from_env`](crate::from_env).
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// The signing region, if one was resolved through [`from_env`](crate::from_env).
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Whether buckets are addressed as the first URL path segment rather than as a
    /// subdomain.
    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }

    /// Whether uploads skip computing a SHA-256 of the payload for the request signature.
    ///
    /// When enabled, `PutObject` and `UploadPart` requests are signed with
    /// `UNSIGNED-PAYLOAD`. The body is streamed without being buffered or hashed first,
    /// which raises throughput but gives up payload integrity protection by the
    /// signature. Only enable this for endpoints reached over TLS or a trusted network.
    pub fn unsigned_payload(&self) -> bool {
        self.unsigned_payload
    }

    /// The Amazon S3 client instance that will be used to send requests.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    endpoint: Option<String>,
    region: Option<String>,
    force_path_style: bool,
    unsigned_payload: bool,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// Record the endpoint URL the client was configured with.
    ///
    /// NOTE: This does not reconfigure the client and is meant for internal use only.
    pub(crate) fn set_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub(crate) fn set_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Record whether the client was configured for path-style addressing.
    ///
    /// NOTE: This does not reconfigure the client and is meant for internal use only.
    pub(crate) fn set_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Sign upload payloads as `UNSIGNED-PAYLOAD` instead of hashing them.
    ///
    /// See [`Config::unsigned_payload`] for the trade-off. Default is `false` for an
    /// explicitly built config and `true` for one resolved through
    /// [`from_env`](crate::from_env).
    pub fn unsigned_payload(mut self, unsigned_payload: bool) -> Self {
        self.unsigned_payload = unsigned_payload;
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`]
    pub fn build(self) -> Result<Config, Error> {
        let client = self
            .client
            .ok_or_else(|| error::configuration("an S3 client is required"))?;
        Ok(Config {
            endpoint: self.endpoint,
            region: self.region,
            force_path_style: self.force_path_style,
            unsigned_payload: self.unsigned_payload,
            client,
        })
    }
}
