/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::context::UploadContext;
use crate::error;
use crate::operation::upload::UploadOutput;
use crate::types::FailedMultipartUploadPolicy;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use tokio::task;
use tracing::Instrument;

/// Tracks the part upload workers of an in-progress multipart upload.
///
/// Every outcome ends the upload: either `CompleteMultipartUpload` succeeds, or the
/// remaining workers are cancelled and the upload is aborted according to the
/// configured [`FailedMultipartUploadPolicy`].
#[derive(Debug)]
pub(super) struct MultipartUploadHandle {
    /// All part upload workers spawned for this upload
    pub(super) tasks: task::JoinSet<Result<Vec<CompletedPart>, error::Error>>,
    /// The context used to drive an upload to completion
    pub(super) ctx: UploadContext,
}

impl MultipartUploadHandle {
    pub(super) fn new(ctx: UploadContext) -> Self {
        Self {
            tasks: task::JoinSet::new(),
            ctx,
        }
    }

    /// Consume the handle and wait for upload to complete
    #[tracing::instrument(skip_all, level = "debug", name = "join-upload")]
    pub(super) async fn join(mut self) -> Result<UploadOutput, error::Error> {
        let mut all_parts = Vec::new();
        while let Some(join_result) = self.tasks.join_next().await {
            match join_result.map_err(error::Error::from).and_then(|r| r) {
                Ok(parts) => all_parts.extend(parts),
                Err(err) => {
                    tracing::error!("multipart upload failed, aborting");
                    self.abort_logged().await;
                    return Err(err);
                }
            }
        }

        // parts finish out of order across workers
        all_parts.sort_by_key(|p| p.part_number());

        match complete_upload(&self.ctx, all_parts).await {
            Ok(output) => Ok(output),
            Err(err) => {
                tracing::error!("failed to complete multipart upload, aborting");
                self.abort_logged().await;
                Err(err)
            }
        }
    }

    async fn abort_logged(&mut self) {
        if let Err(err) = self.abort().await {
            tracing::error!("failed to abort upload: {}", DisplayErrorContext(err))
        }
    }

    /// Abort the upload and cancel any in-progress part uploads.
    #[tracing::instrument(skip_all, level = "debug", name = "abort-upload")]
    pub(super) async fn abort(&mut self) -> Result<(), error::Error> {
        self.tasks.abort_all();
        while (self.tasks.join_next().await).is_some() {}

        match self.ctx.failed_multipart_upload_policy() {
            FailedMultipartUploadPolicy::AbortUpload => abort_upload(&self.ctx).await,
            FailedMultipartUploadPolicy::Retain => {
                tracing::warn!(
                    "retaining parts of failed multipart upload {}",
                    self.ctx.upload_id
                );
                Ok(())
            }
        }
    }
}

async fn abort_upload(ctx: &UploadContext) -> Result<(), error::Error> {
    ctx.client()
        .abort_multipart_upload()
        .bucket(ctx.bucket())
        .key(ctx.key())
        .upload_id(ctx.upload_id.clone())
        .send()
        .instrument(tracing::debug_span!("send-abort-multipart-upload"))
        .await?;

    tracing::debug!("aborted multipart upload {}", ctx.upload_id);
    Ok(())
}

async fn complete_upload(
    ctx: &UploadContext,
    parts: Vec<CompletedPart>,
) -> Result<UploadOutput, error::Error> {
    tracing::trace!("completing multipart upload with {} parts", parts.len());
    let resp = ctx
        .client()
        .complete_multipart_upload()
        .bucket(ctx.bucket())
        .key(ctx.key())
        .upload_id(ctx.upload_id.clone())
        .multipart_upload(
            CompletedMultipartUpload::builder()
                .set_parts(Some(parts))
                .build(),
        )
        .send()
        .instrument(tracing::debug_span!("send-complete-multipart-upload"))
        .await?;

    Ok(UploadOutput::from_multipart(ctx.upload_id.clone(), resp))
}
