/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::{Credentials, RequestChecksumCalculation};
use aws_smithy_runtime_api::client::http::SharedHttpClient;

use crate::config::Builder;
use crate::error::{self, Error};
use crate::Config;

const CREDENTIALS_PROVIDER_NAME: &str = "s3-bench-client-static";

/// Resolves a [`Config`] for an S3-compatible endpoint.
///
/// Credentials are static (no session token) and the endpoint always overrides the one that
/// would be derived from the region. Loading only assembles configuration locally, it never
/// makes a network request.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    access_key: Option<String>,
    secret_key: Option<String>,
    endpoint: Option<String>,
    region: Option<String>,
    force_path_style: Option<bool>,
    unsigned_payload: Option<bool>,
    request_checksum_calculation: Option<RequestChecksumCalculation>,
    http_client: Option<SharedHttpClient>,
}

impl ConfigLoader {
    /// Access key ID used to sign requests
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Secret access key used to sign requests
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Endpoint URL (e.g. `http://127.0.0.1:9000`) that all requests are sent to.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Signing region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Address buckets as a URL path segment instead of a subdomain.
    ///
    /// Default is `true`, which is what most self-hosted S3-compatible stores require.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Sign upload payloads as `UNSIGNED-PAYLOAD`.
    ///
    /// Default is `true`. See [`Config::unsigned_payload`] for the trade-off.
    pub fn unsigned_payload(mut self, unsigned_payload: bool) -> Self {
        self.unsigned_payload = Some(unsigned_payload);
        self
    }

    /// When request checksums are calculated.
    ///
    /// Default is [`RequestChecksumCalculation::WhenRequired`] so upload bodies are sent
    /// as-is, which older S3-compatible stores expect.
    pub fn request_checksum_calculation(mut self, setting: RequestChecksumCalculation) -> Self {
        self.request_checksum_calculation = Some(setting);
        self
    }

    /// Override the HTTP client used to send requests.
    pub fn http_client(mut self, http_client: SharedHttpClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Validate the settings and assemble a [`Config`].
    ///
    /// Fails with [`ErrorKind::Configuration`](crate::error::ErrorKind::Configuration) when a
    /// required value is missing or the endpoint is not an absolute `http`/`https` URL.
    pub async fn load(self) -> Result<Config, Error> {
        let access_key = required("access key", self.access_key)?;
        let secret_key = required("secret key", self.secret_key)?;
        let region = required("region", self.region)?;
        let endpoint = required("endpoint", self.endpoint)?;
        validate_endpoint(&endpoint)?;

        let force_path_style = self.force_path_style.unwrap_or(true);
        let unsigned_payload = self.unsigned_payload.unwrap_or(true);

        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region.clone()))
            .endpoint_url(endpoint.clone());
        if let Some(http_client) = self.http_client {
            loader = loader.http_client(http_client);
        }
        let shared_config: aws_types::SdkConfig = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(force_path_style)
            .request_checksum_calculation(
                self.request_checksum_calculation
                    .unwrap_or(RequestChecksumCalculation::WhenRequired),
            )
            .build();

        tracing::debug!(
            endpoint = endpoint.as_str(),
            force_path_style,
            unsigned_payload,
            "resolved S3 client configuration"
        );

        Builder::default()
            .client(aws_sdk_s3::Client::from_conf(s3_config))
            .set_endpoint(Some(endpoint))
            .set_region(Some(region))
            .set_force_path_style(force_path_style)
            .unsigned_payload(unsigned_payload)
            .build()
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(error::configuration(format!("{name} is required"))),
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), Error> {
    let uri: ::http::Uri = endpoint
        .parse()
        .map_err(|err| error::configuration(format!("invalid endpoint `{endpoint}`: {err}")))?;

    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => {
            return Err(error::configuration(format!(
                "endpoint `{endpoint}` must use the http or https scheme"
            )))
        }
    }

    if uri.authority().is_none() {
        return Err(error::configuration(format!(
            "endpoint `{endpoint}` has no host"
        )));
    }

    Ok(())
}
