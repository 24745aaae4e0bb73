// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Capability surface of the wrapped storage client.
//!
//! [`StorageClient`] is implemented by an adapter around a concrete S3 client
//! library. Every bucket-scoped operation takes the bucket explicitly; the
//! [`BoundClient`](crate::BoundClient) supplies it from configuration.

use crate::error::Error;
use crate::types::*;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use http::Method;
use serde_json::Value;
use std::fmt::Debug;
use std::path::Path;

/// Paginated listing result, one item per entry.
///
/// An `Ok` item is an entry, the end of the stream is the end of the
/// listing, and an `Err` item aborts the listing.
pub type ListStream<T> = BoxStream<'static, Result<T, Error>>;

/// Object content as a stream of chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, Error>>;

/// One-shot completion callback of callback-style write operations.
pub type UploadCallback = Box<dyn FnOnce(Result<UploadedObjectInfo, Error>) + Send + 'static>;

/// Operations provided by the wrapped storage client library.
///
/// Failures are reported through [`Error`]; implementations typically wrap
/// their native error with [`Error::storage`].
#[async_trait]
pub trait StorageClient: Debug + Send + Sync {
    // region listings

    fn list_objects(&self, bucket: &str, prefix: &str, recursive: bool) -> ListStream<ListEntry>;

    fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
        start_after: Option<&str>,
    ) -> ListStream<ListEntry>;

    fn list_incomplete_uploads(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> ListStream<IncompleteUpload>;

    fn listen_bucket_notification(
        &self,
        bucket: &str,
        prefix: &str,
        suffix: &str,
        events: Vec<String>,
    ) -> ListStream<NotificationRecord>;

    // endregion

    // region bucket configuration

    async fn set_bucket_versioning(
        &self,
        bucket: &str,
        config: VersioningConfig,
    ) -> Result<(), Error>;

    async fn get_bucket_versioning(&self, bucket: &str) -> Result<VersioningConfig, Error>;

    async fn set_bucket_replication(
        &self,
        bucket: &str,
        config: ReplicationConfig,
    ) -> Result<(), Error>;

    async fn get_bucket_replication(&self, bucket: &str) -> Result<ReplicationConfig, Error>;

    async fn remove_bucket_replication(&self, bucket: &str) -> Result<(), Error>;

    async fn set_bucket_tagging(&self, bucket: &str, tags: Tags) -> Result<(), Error>;

    async fn remove_bucket_tagging(&self, bucket: &str) -> Result<(), Error>;

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>, Error>;

    async fn set_bucket_lifecycle(&self, bucket: &str, config: LifecycleConfig)
    -> Result<(), Error>;

    async fn get_bucket_lifecycle(&self, bucket: &str) -> Result<Option<LifecycleConfig>, Error>;

    async fn remove_bucket_lifecycle(&self, bucket: &str) -> Result<(), Error>;

    async fn set_object_lock_config(
        &self,
        bucket: &str,
        config: ObjectLockConfig,
    ) -> Result<(), Error>;

    async fn get_object_lock_config(&self, bucket: &str) -> Result<ObjectLockConfig, Error>;

    async fn set_bucket_encryption(
        &self,
        bucket: &str,
        config: Option<SseConfig>,
    ) -> Result<(), Error>;

    async fn get_bucket_encryption(&self, bucket: &str) -> Result<SseConfig, Error>;

    async fn remove_bucket_encryption(&self, bucket: &str) -> Result<(), Error>;

    async fn get_bucket_notification(&self, bucket: &str) -> Result<NotificationConfig, Error>;

    async fn set_bucket_notification(
        &self,
        bucket: &str,
        config: NotificationConfig,
    ) -> Result<(), Error>;

    async fn remove_all_bucket_notification(&self, bucket: &str) -> Result<(), Error>;

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String, Error>;

    async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), Error>;

    // endregion

    // region objects

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<ByteStream, Error>;

    /// Reads `length` bytes starting at `offset`; to the end of the object when `length` is `None`.
    async fn get_partial_object(
        &self,
        bucket: &str,
        object: &str,
        offset: u64,
        length: Option<u64>,
        options: GetObjectOptions,
    ) -> Result<ByteStream, Error>;

    /// Downloads an object into a local file.
    async fn fget_object(
        &self,
        bucket: &str,
        object: &str,
        file_path: &Path,
        options: GetObjectOptions,
    ) -> Result<(), Error>;

    async fn put_object(
        &self,
        bucket: &str,
        object: &str,
        data: Bytes,
        metadata: Metadata,
    ) -> Result<UploadedObjectInfo, Error>;

    /// Uploads a local file. Completion is reported through `callback`,
    /// which must be called exactly once.
    fn fput_object(
        &self,
        bucket: &str,
        object: &str,
        file_path: &Path,
        metadata: Metadata,
        callback: UploadCallback,
    );

    async fn stat_object(
        &self,
        bucket: &str,
        object: &str,
        options: StatObjectOptions,
    ) -> Result<ObjectStat, Error>;

    async fn remove_object(
        &self,
        bucket: &str,
        object: &str,
        options: RemoveOptions,
    ) -> Result<(), Error>;

    async fn remove_objects(
        &self,
        bucket: &str,
        objects: Vec<ObjectToDelete>,
    ) -> Result<Vec<RemoveObjectResult>, Error>;

    async fn remove_incomplete_upload(&self, bucket: &str, object: &str) -> Result<(), Error>;

    async fn put_object_retention(
        &self,
        bucket: &str,
        object: &str,
        retention: Retention,
    ) -> Result<(), Error>;

    async fn get_object_retention(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<Option<Retention>, Error>;

    async fn set_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        tags: Tags,
        options: TaggingOptions,
    ) -> Result<(), Error>;

    async fn remove_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        options: TaggingOptions,
    ) -> Result<(), Error>;

    async fn get_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        options: TaggingOptions,
    ) -> Result<Vec<Tag>, Error>;

    async fn get_object_legal_hold(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<LegalHoldStatus, Error>;

    async fn set_object_legal_hold(
        &self,
        bucket: &str,
        object: &str,
        options: LegalHoldOptions,
    ) -> Result<(), Error>;

    /// Runs an S3 Select query; `None` when the query produced no records.
    async fn select_object_content(
        &self,
        bucket: &str,
        object: &str,
        request: SelectRequest,
    ) -> Result<Option<Bytes>, Error>;

    // endregion

    // region presigned URLs

    /// Generic presigned URL. Note the bucket is the *second* parameter.
    async fn presigned_url(
        &self,
        method: Method,
        bucket: &str,
        object: &str,
        options: PresignOptions,
    ) -> Result<String, Error>;

    async fn presigned_get_object(
        &self,
        bucket: &str,
        object: &str,
        options: PresignOptions,
    ) -> Result<String, Error>;

    async fn presigned_put_object(
        &self,
        bucket: &str,
        object: &str,
        expires: Option<u32>,
    ) -> Result<String, Error>;

    // endregion

    // region not bucket-scoped

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, Error>;

    async fn make_bucket(&self, bucket: &str, region: Option<&str>) -> Result<(), Error>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error>;

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error>;

    /// Copies `source` (formatted `bucket/object`) to `bucket`/`object`.
    async fn copy_object(
        &self,
        bucket: &str,
        object: &str,
        source: &str,
    ) -> Result<CopyObjectResult, Error>;

    /// Invokes an operation by name with positional JSON arguments.
    ///
    /// This is the open-ended delegation hook for operations outside the
    /// typed surface. The default implementation supports none.
    async fn invoke(&self, operation: &str, _args: Vec<Value>) -> Result<Value, Error> {
        Err(Error::UnsupportedOperation(operation.to_string()))
    }

    // endregion
}
