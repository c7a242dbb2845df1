/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Shared helpers for `s3-bench-client` integration tests.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::iter;
use std::sync::{Arc, Mutex, MutexGuard};

use aws_smithy_runtime_api::client::http::{
    HttpClient, HttpConnector, HttpConnectorFuture, HttpConnectorSettings, SharedHttpClient,
    SharedHttpConnector,
};
use aws_smithy_runtime_api::client::orchestrator::{HttpRequest, HttpResponse};
use aws_smithy_runtime_api::client::result::ConnectorError;
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_types::body::SdkBody;
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tempfile::NamedTempFile;

/// Random alphanumeric test data
pub fn rand_data(size: usize) -> Bytes {
    iter::repeat_with(fastrand::alphanumeric)
        .take(size)
        .map(|x| x as u8)
        .collect::<Vec<_>>()
        .into()
}

/// Write `data` to a new temporary file that is removed when dropped.
pub fn create_test_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// Print logs for the current test, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A request as seen by [`FakeS3`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Default)]
struct State {
    objects: HashMap<(String, String), Bytes>,
    uploads: HashMap<String, BTreeMap<u32, Bytes>>,
    next_upload_id: u64,
    rejected_parts: Vec<u32>,
    requests: Vec<RecordedRequest>,
}

/// In-memory S3-compatible store answering path-style requests.
///
/// Request bodies are read to completion before a request is answered, so objects sent
/// from a file stream are stored the same as buffered ones.
#[derive(Debug, Clone, Default)]
pub struct FakeS3 {
    state: Arc<Mutex<State>>,
}

impl FakeS3 {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// HTTP client that routes every request to this store
    pub fn http_client(&self) -> SharedHttpClient {
        SharedHttpClient::new(self.clone())
    }

    /// Seed an object
    pub fn insert_object(&self, bucket: &str, key: &str, data: Bytes) {
        self.state()
            .objects
            .insert((bucket.to_owned(), key.to_owned()), data);
    }

    /// Current contents of an object
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state()
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Answer `UploadPart` for `part_number` with `403 AccessDenied`
    pub fn reject_part(&self, part_number: u32) {
        self.state().rejected_parts.push(part_number);
    }

    /// Multipart uploads that were neither completed nor aborted
    pub fn pending_uploads(&self) -> usize {
        self.state().uploads.len()
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    fn handle(&self, req: http::request::Parts, body: Bytes) -> http::Response<SdkBody> {
        let method = req.method.as_str().to_owned();
        let uri = req.uri.clone();
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            uri: uri.clone(),
            headers: req.headers.clone(),
        });

        let Some((bucket, key)) = uri.path().trim_start_matches('/').split_once('/') else {
            return error_response(400, "InvalidRequest", "missing bucket or key");
        };
        let object_id = (bucket.to_owned(), key.to_owned());
        let query = parse_query(uri.query().unwrap_or_default());
        let upload_id = query.get("uploadId").cloned();

        match (method.as_str(), upload_id) {
            ("PUT", Some(upload_id)) => {
                let part_number = query
                    .get("partNumber")
                    .and_then(|n| n.parse::<u32>().ok())
                    .unwrap_or_default();
                if state.rejected_parts.contains(&part_number) {
                    return error_response(403, "AccessDenied", "Access Denied");
                }
                let Some(parts) = state.uploads.get_mut(&upload_id) else {
                    return error_response(404, "NoSuchUpload", "upload does not exist");
                };
                parts.insert(part_number, body);
                empty_response(200, Some(&format!("\"part-{part_number}\"")))
            }
            ("PUT", None) => {
                state.objects.insert(object_id, body);
                empty_response(200, Some("\"object\""))
            }
            ("POST", None) if query.contains_key("uploads") => {
                state.next_upload_id += 1;
                let upload_id = format!("upload-{}", state.next_upload_id);
                state.uploads.insert(upload_id.clone(), BTreeMap::new());
                xml_response(format!(
                    "<InitiateMultipartUploadResult><Bucket>{bucket}</Bucket><Key>{key}</Key>\
                     <UploadId>{upload_id}</UploadId></InitiateMultipartUploadResult>"
                ))
            }
            ("POST", Some(upload_id)) => {
                let Some(parts) = state.uploads.remove(&upload_id) else {
                    return error_response(404, "NoSuchUpload", "upload does not exist");
                };
                let data = parts.into_values().flatten().collect::<Vec<u8>>();
                state.objects.insert(object_id, data.into());
                xml_response(format!(
                    "<CompleteMultipartUploadResult><Bucket>{bucket}</Bucket><Key>{key}</Key>\
                     <ETag>\"multipart\"</ETag></CompleteMultipartUploadResult>"
                ))
            }
            ("DELETE", Some(upload_id)) => {
                if state.uploads.remove(&upload_id).is_none() {
                    return error_response(404, "NoSuchUpload", "upload does not exist");
                }
                empty_response(204, None)
            }
            ("GET", None) => {
                let Some(data) = state.objects.get(&object_id) else {
                    return error_response(404, "NoSuchKey", "The specified key does not exist.");
                };
                match req.headers.get("range").and_then(|v| v.to_str().ok()) {
                    Some(range) => ranged_response(data, range),
                    None => http::Response::builder()
                        .status(200)
                        .header("Content-Length", data.len())
                        .body(SdkBody::from(data.clone()))
                        .unwrap(),
                }
            }
            _ => error_response(405, "MethodNotAllowed", "unsupported request"),
        }
    }
}

impl HttpClient for FakeS3 {
    fn http_connector(
        &self,
        _settings: &HttpConnectorSettings,
        _components: &RuntimeComponents,
    ) -> SharedHttpConnector {
        SharedHttpConnector::new(self.clone())
    }
}

impl HttpConnector for FakeS3 {
    fn call(&self, request: HttpRequest) -> HttpConnectorFuture {
        let store = self.clone();
        HttpConnectorFuture::new(async move {
            let request = request
                .try_into_http1x()
                .map_err(|err| ConnectorError::other(err.into(), None))?;
            let (parts, body) = request.into_parts();
            let body = ByteStream::new(body)
                .collect()
                .await
                .map_err(|err| ConnectorError::other(err.into(), None))?
                .into_bytes();
            let response = store.handle(parts, body);
            HttpResponse::try_from(response).map_err(|err| ConnectorError::other(err.into(), None))
        })
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.to_owned(), value.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

fn ranged_response(data: &Bytes, range: &str) -> http::Response<SdkBody> {
    let bounds = range
        .strip_prefix("bytes=")
        .and_then(|r| r.split_once('-'))
        .and_then(|(start, end)| Some((start.parse::<usize>().ok()?, end.parse::<usize>().ok()?)));
    let Some((start, end)) = bounds else {
        return error_response(400, "InvalidArgument", "malformed range");
    };
    if start >= data.len() || start > end {
        return error_response(416, "InvalidRange", "The requested range is not satisfiable");
    }
    let end = end.min(data.len() - 1);
    let slice = data.slice(start..=end);
    http::Response::builder()
        .status(206)
        .header("Content-Length", slice.len())
        .header("Content-Range", format!("bytes {start}-{end}/{}", data.len()))
        .body(SdkBody::from(slice))
        .unwrap()
}

fn empty_response(status: u16, e_tag: Option<&str>) -> http::Response<SdkBody> {
    let mut builder = http::Response::builder().status(status);
    if let Some(e_tag) = e_tag {
        builder = builder.header("ETag", e_tag);
    }
    builder.body(SdkBody::empty()).unwrap()
}

fn xml_response(body: String) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(200)
        .header("Content-Type", "application/xml")
        .body(SdkBody::from(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}"
        )))
        .unwrap()
}

fn error_response(status: u16, code: &str, message: &str) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(status)
        .header("Content-Type", "application/xml")
        .body(SdkBody::from(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Error><Code>{code}</Code><Message>{message}</Message></Error>"
        )))
        .unwrap()
}
