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

//! Declaration table of the bound operation surface.
//!
//! Each line names a [`StorageClient`](crate::StorageClient) operation, its
//! binding rule and its signature *as seen by callers of the bound client*:
//!
//! - `bucket`: the bucket is passed as the first argument
//! - `after_method`: the bucket is passed after the first (HTTP method) argument
//! - `pass`: arguments are forwarded unchanged
//!
//! `async` operations return `Result<T, Error>`, `sync` operations return
//! their declared type as is (listing streams, callback-style writes).

use super::BoundClient;
use crate::client::{ByteStream, ListStream, UploadCallback};
use crate::error::Error;
use crate::interception::InterceptionRule;
use crate::types::*;
use bytes::Bytes;
use http::Method;
use std::path::Path;

macro_rules! bound_operations {
    (@rule bucket) => { InterceptionRule::BucketFirst };
    (@rule after_method) => { InterceptionRule::AfterLeadingArgument };
    (@rule pass) => { InterceptionRule::PassThrough };

    (@method [$($doc:tt)*] bucket async $name:ident ($($arg:ident : $ty:ty),*) -> $ret:ty) => {
        $($doc)*
        pub async fn $name(&self, $($arg: $ty),*) -> Result<$ret, Error> {
            self.inner.$name(&self.bucket_name, $($arg),*).await
        }
    };
    (@method [$($doc:tt)*] bucket sync $name:ident ($($arg:ident : $ty:ty),*) -> $ret:ty) => {
        $($doc)*
        pub fn $name(&self, $($arg: $ty),*) -> $ret {
            self.inner.$name(&self.bucket_name, $($arg),*)
        }
    };
    (@method [$($doc:tt)*] after_method async $name:ident
        ($lead:ident : $lead_ty:ty $(, $arg:ident : $ty:ty)*) -> $ret:ty) => {
        $($doc)*
        pub async fn $name(&self, $lead: $lead_ty, $($arg: $ty),*) -> Result<$ret, Error> {
            self.inner.$name($lead, &self.bucket_name, $($arg),*).await
        }
    };
    (@method [$($doc:tt)*] pass async $name:ident ($($arg:ident : $ty:ty),*) -> $ret:ty) => {
        $($doc)*
        pub async fn $name(&self, $($arg: $ty),*) -> Result<$ret, Error> {
            self.inner.$name($($arg),*).await
        }
    };

    ($(
        $(#[$doc:meta])*
        $rule:ident $kind:tt fn $name:ident ($($arg:ident : $ty:ty),*) -> $ret:ty;
    )*) => {
        /// Every operation of the capability surface with its binding rule.
        pub static OPERATIONS: &[(&str, InterceptionRule)] = &[
            $( (stringify!($name), bound_operations!(@rule $rule)), )*
        ];

        impl BoundClient {
            $(
                bound_operations!(@method [$(#[$doc])*] $rule $kind $name ($($arg : $ty),*) -> $ret);
            )*
        }
    };
}

bound_operations! {
    /// Lists the objects of the bound bucket as a stream of entries.
    ///
    /// Use [`list_objects_async`](BoundClient::list_objects_async) to get the
    /// whole listing at once.
    bucket sync fn list_objects(prefix: &str, recursive: bool) -> ListStream<ListEntry>;
    /// Lists the objects of the bound bucket starting after `start_after`.
    bucket sync fn list_objects_v2(prefix: &str, recursive: bool, start_after: Option<&str>) -> ListStream<ListEntry>;
    bucket sync fn list_incomplete_uploads(prefix: &str, recursive: bool) -> ListStream<IncompleteUpload>;
    /// Streams bucket events matching `prefix`, `suffix` and `events` until the stream is dropped.
    bucket sync fn listen_bucket_notification(prefix: &str, suffix: &str, events: Vec<String>) -> ListStream<NotificationRecord>;

    bucket async fn set_bucket_versioning(config: VersioningConfig) -> ();
    bucket async fn get_bucket_versioning() -> VersioningConfig;
    bucket async fn set_bucket_replication(config: ReplicationConfig) -> ();
    bucket async fn get_bucket_replication() -> ReplicationConfig;
    bucket async fn remove_bucket_replication() -> ();
    bucket async fn set_bucket_tagging(tags: Tags) -> ();
    bucket async fn remove_bucket_tagging() -> ();
    bucket async fn get_bucket_tagging() -> Vec<Tag>;
    bucket async fn set_bucket_lifecycle(config: LifecycleConfig) -> ();
    /// Returns `None` when the bucket has no lifecycle configuration.
    bucket async fn get_bucket_lifecycle() -> Option<LifecycleConfig>;
    bucket async fn remove_bucket_lifecycle() -> ();
    bucket async fn set_object_lock_config(config: ObjectLockConfig) -> ();
    bucket async fn get_object_lock_config() -> ObjectLockConfig;
    /// Sets the default bucket encryption; `None` selects SSE-S3 (`AES256`).
    bucket async fn set_bucket_encryption(config: Option<SseConfig>) -> ();
    bucket async fn get_bucket_encryption() -> SseConfig;
    bucket async fn remove_bucket_encryption() -> ();
    bucket async fn get_bucket_notification() -> NotificationConfig;
    bucket async fn set_bucket_notification(config: NotificationConfig) -> ();
    bucket async fn remove_all_bucket_notification() -> ();
    bucket async fn get_bucket_policy() -> String;
    bucket async fn set_bucket_policy(policy: &str) -> ();

    /// Opens the content of `object` as a chunk stream.
    bucket async fn get_object(object: &str, options: GetObjectOptions) -> ByteStream;
    bucket async fn get_partial_object(object: &str, offset: u64, length: Option<u64>, options: GetObjectOptions) -> ByteStream;
    bucket async fn fget_object(object: &str, file_path: &Path, options: GetObjectOptions) -> ();
    bucket async fn put_object(object: &str, data: Bytes, metadata: Metadata) -> UploadedObjectInfo;
    /// Uploads a local file, reporting completion through `callback`.
    ///
    /// See [`fput_object_async`](BoundClient::fput_object_async) for the awaitable form.
    bucket sync fn fput_object(object: &str, file_path: &Path, metadata: Metadata, callback: UploadCallback) -> ();
    bucket async fn stat_object(object: &str, options: StatObjectOptions) -> ObjectStat;
    bucket async fn remove_object(object: &str, options: RemoveOptions) -> ();
    bucket async fn remove_objects(objects: Vec<ObjectToDelete>) -> Vec<RemoveObjectResult>;
    bucket async fn remove_incomplete_upload(object: &str) -> ();
    bucket async fn put_object_retention(object: &str, retention: Retention) -> ();
    bucket async fn get_object_retention(object: &str, version_id: Option<&str>) -> Option<Retention>;
    bucket async fn set_object_tagging(object: &str, tags: Tags, options: TaggingOptions) -> ();
    bucket async fn remove_object_tagging(object: &str, options: TaggingOptions) -> ();
    bucket async fn get_object_tagging(object: &str, options: TaggingOptions) -> Vec<Tag>;
    bucket async fn get_object_legal_hold(object: &str, version_id: Option<&str>) -> LegalHoldStatus;
    bucket async fn set_object_legal_hold(object: &str, options: LegalHoldOptions) -> ();
    bucket async fn select_object_content(object: &str, request: SelectRequest) -> Option<Bytes>;

    /// Presigns `method` on `object`; the bucket goes after the method.
    after_method async fn presigned_url(method: Method, object: &str, options: PresignOptions) -> String;
    bucket async fn presigned_get_object(object: &str, options: PresignOptions) -> String;
    bucket async fn presigned_put_object(object: &str, expires: Option<u32>) -> String;

    pass async fn list_buckets() -> Vec<BucketInfo>;
    pass async fn make_bucket(bucket: &str, region: Option<&str>) -> ();
    pass async fn bucket_exists(bucket: &str) -> bool;
    pass async fn remove_bucket(bucket: &str) -> ();
    /// Server side copy; `source` is `bucket/object` and may name any bucket.
    pass async fn copy_object(bucket: &str, object: &str, source: &str) -> CopyObjectResult;
}
