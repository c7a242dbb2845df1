/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use super::context::UploadContext;
use super::handle::MultipartUploadHandle;
use crate::error;
use crate::io::part_reader::{PartData, PartReader};
use aws_sdk_s3::{primitives::ByteStream, types::CompletedPart};
use bytes::Buf;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tracing::Instrument;

/// Request/input type for our "upload_part" service.
#[derive(Debug, Clone)]
pub(super) struct UploadPartRequest {
    pub(super) ctx: UploadContext,
    pub(super) part_data: PartData,
}

/// handler (service fn) for a single part
async fn upload_part_handler(request: UploadPartRequest) -> Result<CompletedPart, error::Error> {
    let ctx = request.ctx;
    let part_data = request.part_data;
    let part_number: i32 = part_data.part_number.try_into().map_err(|_| {
        error::invalid_input(format!("part number {} out of range", part_data.part_number))
    })?;

    let mut req = ctx
        .client()
        .upload_part()
        .bucket(ctx.bucket())
        .key(ctx.key())
        .upload_id(ctx.upload_id.clone())
        .part_number(part_number)
        .content_length(part_data.data.remaining() as i64)
        .body(ByteStream::from(part_data.data))
        .customize();
    if ctx.unsigned_payload() {
        req = req.disable_payload_signing();
    }

    let resp = req
        .send()
        .instrument(tracing::debug_span!("send-upload-part", part_number))
        .await?;

    tracing::trace!("completed upload of part number {}", part_number);
    Ok(CompletedPart::builder()
        .part_number(part_number)
        .set_e_tag(resp.e_tag)
        .build())
}

/// Create a new tower::Service for uploading individual parts of an object to S3
pub(super) fn upload_part_service(
    concurrency: usize,
) -> impl Service<UploadPartRequest, Response = CompletedPart, Error = error::Error, Future: Send>
       + Clone
       + Send {
    let svc = service_fn(upload_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(concurrency)
        .service(svc)
}

/// Spawn `workers` tasks that upload parts until the reader is exhausted
pub(super) fn distribute_work(
    handle: &mut MultipartUploadHandle,
    part_reader: Arc<PartReader>,
    workers: usize,
) {
    let svc = upload_part_service(workers);
    for worker in 0..workers {
        let task = upload_parts(part_reader.clone(), handle.ctx.clone(), svc.clone())
            .instrument(tracing::debug_span!("upload-parts", worker));
        handle.tasks.spawn(task);
    }
    tracing::trace!("work distributed for uploading parts");
}

/// Worker loop: claim the next part, upload it, repeat.
///
/// A worker holds at most one part in memory at a time.
async fn upload_parts(
    part_reader: Arc<PartReader>,
    ctx: UploadContext,
    svc: impl Service<
            UploadPartRequest,
            Response = CompletedPart,
            Error = error::Error,
            Future: Send,
        > + Clone
        + Send
        + 'static,
) -> Result<Vec<CompletedPart>, error::Error> {
    let mut completed = Vec::new();
    while let Some(part_data) = part_reader.next_part().await? {
        let req = UploadPartRequest {
            ctx: ctx.clone(),
            part_data,
        };
        completed.push(svc.clone().oneshot(req).await?);
    }
    Ok(completed)
}
