/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::operation::complete_multipart_upload::CompleteMultipartUploadOutput;
use aws_sdk_s3::operation::put_object::PutObjectOutput;

/// Common response fields for uploading an object
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct UploadOutput {
    /// Entity tag for the uploaded object.
    pub e_tag: Option<String>,

    /// Version ID of the object, if the bucket is versioned.
    pub version_id: Option<String>,

    /// ID of the multipart upload, if one was used to upload the object.
    pub upload_id: Option<String>,
}

impl UploadOutput {
    /// Entity tag for the uploaded object.
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Version ID of the object, if the bucket is versioned.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// ID of the multipart upload, if one was used to upload the object.
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    pub(crate) fn from_multipart(upload_id: String, value: CompleteMultipartUploadOutput) -> Self {
        Self {
            e_tag: value.e_tag,
            version_id: value.version_id,
            upload_id: Some(upload_id),
        }
    }
}

impl From<PutObjectOutput> for UploadOutput {
    fn from(value: PutObjectOutput) -> Self {
        Self {
            e_tag: value.e_tag,
            version_id: value.version_id,
            upload_id: None,
        }
    }
}
