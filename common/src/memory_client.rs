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

//! In-memory [`StorageClient`] that records every call it receives.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use http::Method;
use minio_service::types::*;
use minio_service::{ByteStream, Error, ListStream, StorageClient, UploadCallback};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// Objects are served in chunks of this size, so most reads span several chunks.
const CHUNK_SIZE: usize = 4;

/// One operation received by a [`MemoryClient`], with its arguments as JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub operation: String,
    pub args: Vec<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("bucket '{0}' does not exist")]
    NoSuchBucket(String),
    #[error("object '{0}' does not exist")]
    NoSuchKey(String),
    #[error("bucket '{0}' already exists")]
    BucketAlreadyExists(String),
    #[error("bucket '{0}' is not empty")]
    BucketNotEmpty(String),
    #[error("{0} is not configured on bucket '{1}'")]
    NotConfigured(&'static str, String),
    #[error("etag of '{0}' does not match")]
    PreconditionFailed(String),
    #[error("offset {offset} is past the end of '{object}'")]
    InvalidRange { object: String, offset: u64 },
    #[error("{0}")]
    Injected(String),
}

#[derive(Clone, Debug)]
struct StoredObject {
    data: Bytes,
    metadata: Metadata,
    etag: String,
    last_modified: UtcTime,
    tags: Tags,
    retention: Option<Retention>,
    legal_hold: LegalHoldStatus,
}

impl StoredObject {
    fn new(data: Bytes, metadata: Metadata) -> Self {
        StoredObject {
            data,
            metadata,
            etag: uuid::Uuid::new_v4().simple().to_string(),
            last_modified: Utc::now(),
            tags: Tags::new(),
            retention: None,
            legal_hold: LegalHoldStatus::Off,
        }
    }

    fn entry(&self, name: &str) -> ListEntry {
        ListEntry {
            name: name.to_string(),
            last_modified: Some(self.last_modified),
            etag: Some(self.etag.clone()),
            size: Some(self.data.len() as u64),
            storage_class: Some("STANDARD".into()),
            ..Default::default()
        }
    }
}

#[derive(Debug)]
struct BucketState {
    created: UtcTime,
    objects: BTreeMap<String, StoredObject>,
    uploads: Vec<IncompleteUpload>,
    versioning: VersioningConfig,
    replication: Option<ReplicationConfig>,
    tags: Tags,
    lifecycle: Option<LifecycleConfig>,
    object_lock: Option<ObjectLockConfig>,
    encryption: Option<SseConfig>,
    notification: NotificationConfig,
    policy: Option<String>,
}

impl BucketState {
    fn new() -> Self {
        BucketState {
            created: Utc::now(),
            objects: BTreeMap::new(),
            uploads: Vec::new(),
            versioning: VersioningConfig::default(),
            replication: None,
            tags: Tags::new(),
            lifecycle: None,
            object_lock: None,
            encryption: None,
            notification: NotificationConfig::default(),
            policy: None,
        }
    }

    fn list(
        &self,
        prefix: &str,
        recursive: bool,
        start_after: Option<&str>,
    ) -> Vec<ListEntry> {
        // keyed by name so objects and common prefixes come out in S3 order
        let mut entries: BTreeMap<String, ListEntry> = BTreeMap::new();
        for (key, object) in &self.objects {
            if !key.starts_with(prefix) || start_after.is_some_and(|s| key.as_str() <= s) {
                continue;
            }
            let rest = &key[prefix.len()..];
            match rest.find('/') {
                Some(i) if !recursive => {
                    let common = format!("{prefix}{}", &rest[..=i]);
                    entries
                        .entry(common.clone())
                        .or_insert_with(|| ListEntry::prefix(common));
                }
                _ => {
                    entries.insert(key.clone(), object.entry(key));
                }
            }
        }
        entries.into_values().collect()
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    buckets: BTreeMap<String, BucketState>,
    failures: HashMap<String, String>,
    listing_failure: Option<(usize, String)>,
    drop_callbacks: bool,
}

impl State {
    fn bucket(&self, name: &str) -> Result<&BucketState, Error> {
        self.buckets
            .get(name)
            .ok_or_else(|| Error::storage(MemoryError::NoSuchBucket(name.to_string())))
    }

    fn bucket_mut(&mut self, name: &str) -> Result<&mut BucketState, Error> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| Error::storage(MemoryError::NoSuchBucket(name.to_string())))
    }

    fn object(&self, bucket: &str, object: &str) -> Result<&StoredObject, Error> {
        self.bucket(bucket)?
            .objects
            .get(object)
            .ok_or_else(|| Error::storage(MemoryError::NoSuchKey(object.to_string())))
    }

    fn object_mut(&mut self, bucket: &str, object: &str) -> Result<&mut StoredObject, Error> {
        self.bucket_mut(bucket)?
            .objects
            .get_mut(object)
            .ok_or_else(|| Error::storage(MemoryError::NoSuchKey(object.to_string())))
    }
}

fn tag_list(tags: &Tags) -> Vec<Tag> {
    let mut list: Vec<Tag> = tags
        .iter()
        .map(|(k, v)| Tag {
            key: k.clone(),
            value: v.clone(),
        })
        .collect();
    list.sort_by(|a, b| a.key.cmp(&b.key));
    list
}

fn not_configured(what: &'static str, bucket: &str) -> Error {
    Error::storage(MemoryError::NotConfigured(what, bucket.to_string()))
}

fn chunked(data: Bytes) -> ByteStream {
    let chunks: Vec<Result<Bytes, Error>> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| Ok(data.slice(start..(start + CHUNK_SIZE).min(data.len()))))
        .collect();
    stream::iter(chunks).boxed()
}

fn event_matches(record: &Value, bucket: &str, prefix: &str, suffix: &str, events: &[String]) -> bool {
    let name = record["eventName"].as_str().unwrap_or_default();
    let key = record["s3"]["object"]["key"].as_str().unwrap_or_default();
    record["s3"]["bucket"]["name"] == bucket
        && key.starts_with(prefix)
        && key.ends_with(suffix)
        && (events.is_empty()
            || events.iter().any(|e| match e.strip_suffix('*') {
                Some(head) => name.starts_with(head),
                None => name == e.as_str(),
            }))
}

/// A storage client keeping buckets and objects in memory.
///
/// Every operation is recorded as a [`Call`] with its bucket and arguments,
/// so tests can check exactly what a [`BoundClient`](minio_service::BoundClient)
/// forwarded. Clones share their state.
#[derive(Clone, Debug)]
pub struct MemoryClient {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<NotificationRecord>,
    base_url: String,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new("http://memory")
    }
}

impl MemoryClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        let (events, _) = broadcast::channel(64);
        MemoryClient {
            state: Arc::new(Mutex::new(State::default())),
            events,
            base_url: base_url.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `operation` and fails it if a failure was injected for it.
    fn begin(&self, operation: &str, args: Vec<Value>) -> Result<MutexGuard<'_, State>, Error> {
        let mut state = self.lock();
        log::trace!("{operation}({args:?})");
        state.calls.push(Call {
            operation: operation.to_string(),
            args,
        });
        if let Some(message) = state.failures.remove(operation) {
            return Err(Error::storage(MemoryError::Injected(message)));
        }
        Ok(state)
    }

    fn listing<T, F>(&self, operation: &str, args: Vec<Value>, produce: F) -> ListStream<T>
    where
        T: Send + 'static,
        F: FnOnce(&State) -> Result<Vec<T>, Error>,
    {
        let items: Vec<Result<T, Error>> = match self.begin(operation, args) {
            Ok(mut state) => match (produce(&state), state.listing_failure.take()) {
                (Ok(items), Some((after, message))) => items
                    .into_iter()
                    .take(after)
                    .map(Ok)
                    .chain(std::iter::once(Err(Error::storage(MemoryError::Injected(
                        message,
                    )))))
                    .collect(),
                (Ok(items), None) => items.into_iter().map(Ok).collect(),
                (Err(e), _) => vec![Err(e)],
            },
            Err(e) => vec![Err(e)],
        };
        stream::iter(items).boxed()
    }

    fn store(
        &self,
        bucket: &str,
        object: &str,
        data: Bytes,
        metadata: Metadata,
    ) -> Result<UploadedObjectInfo, Error> {
        let size = data.len();
        let stored = StoredObject::new(data, metadata);
        let info = UploadedObjectInfo {
            etag: stored.etag.clone(),
            version_id: None,
        };
        self.lock()
            .bucket_mut(bucket)?
            .objects
            .insert(object.to_string(), stored);
        self.publish("s3:ObjectCreated:Put", bucket, object, size);
        Ok(info)
    }

    fn publish(&self, event: &str, bucket: &str, object: &str, size: usize) {
        // no subscribers is not an error
        let _ = self.events.send(json!({
            "eventName": event,
            "eventTime": Utc::now().to_rfc3339(),
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": object, "size": size },
            },
        }));
    }

    fn presign(&self, method: &Method, bucket: &str, object: &str, options: &PresignOptions) -> String {
        let mut url = format!(
            "{}/{bucket}/{object}?X-Amz-Method={method}&X-Amz-Expires={}",
            self.base_url, options.expires
        );
        let mut params: Vec<(&String, &String)> = options.request_params.iter().collect();
        params.sort();
        for (k, v) in params {
            url.push_str(&format!("&{k}={v}"));
        }
        url.push_str("&X-Amz-Signature=memory");
        url
    }

    // region test controls

    /// Creates `bucket` without recording a call.
    pub fn add_bucket(&self, bucket: &str) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(BucketState::new);
    }

    /// Stores an object without recording a call; creates the bucket if needed.
    pub fn add_object<B: Into<Bytes>>(&self, bucket: &str, object: &str, data: B) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(BucketState::new)
            .objects
            .insert(object.to_string(), StoredObject::new(data.into(), Metadata::new()));
    }

    pub fn add_incomplete_upload(&self, bucket: &str, key: &str, size: u64) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(BucketState::new)
            .uploads
            .push(IncompleteUpload {
                key: key.to_string(),
                upload_id: uuid::Uuid::new_v4().to_string(),
                size,
            });
    }

    pub fn object_data(&self, bucket: &str, object: &str) -> Option<Bytes> {
        self.lock().object(bucket, object).ok().map(|o| o.data.clone())
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    /// Fails the next call of `operation` with `message`.
    pub fn fail_next(&self, operation: &str, message: &str) {
        self.lock()
            .failures
            .insert(operation.to_string(), message.to_string());
    }

    /// The next listing yields `after` entries, then fails with `message`.
    pub fn fail_listing_after(&self, after: usize, message: &str) {
        self.lock().listing_failure = Some((after, message.to_string()));
    }

    /// When set, callback-style operations drop their callback without calling it.
    pub fn drop_callbacks(&self, drop: bool) {
        self.lock().drop_callbacks = drop;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, operation: &str) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.lock().calls.last().cloned()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    // endregion
}

#[async_trait]
impl StorageClient for MemoryClient {
    fn list_objects(&self, bucket: &str, prefix: &str, recursive: bool) -> ListStream<ListEntry> {
        let args = vec![json!(bucket), json!(prefix), json!(recursive)];
        self.listing("list_objects", args, |state| {
            Ok(state.bucket(bucket)?.list(prefix, recursive, None))
        })
    }

    fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
        start_after: Option<&str>,
    ) -> ListStream<ListEntry> {
        let args = vec![json!(bucket), json!(prefix), json!(recursive), json!(start_after)];
        self.listing("list_objects_v2", args, |state| {
            Ok(state.bucket(bucket)?.list(prefix, recursive, start_after))
        })
    }

    fn list_incomplete_uploads(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> ListStream<IncompleteUpload> {
        let args = vec![json!(bucket), json!(prefix), json!(recursive)];
        self.listing("list_incomplete_uploads", args, |state| {
            Ok(state
                .bucket(bucket)?
                .uploads
                .iter()
                .filter(|u| u.key.starts_with(prefix))
                .filter(|u| recursive || !u.key[prefix.len()..].contains('/'))
                .cloned()
                .collect())
        })
    }

    fn listen_bucket_notification(
        &self,
        bucket: &str,
        prefix: &str,
        suffix: &str,
        events: Vec<String>,
    ) -> ListStream<NotificationRecord> {
        let args = vec![json!(bucket), json!(prefix), json!(suffix), json!(events)];
        let subscribed = self
            .begin("listen_bucket_notification", args)
            .and_then(|state| state.bucket(bucket).map(|_| ()));
        if let Err(e) = subscribed {
            return stream::once(async move { Err(e) }).boxed();
        }

        let mut receiver = self.events.subscribe();
        let (bucket, prefix, suffix) = (bucket.to_string(), prefix.to_string(), suffix.to_string());
        async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(record) => {
                        if event_matches(&record, &bucket, &prefix, &suffix, &events) {
                            yield Ok::<_, Error>(record);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
        .boxed()
    }

    async fn set_bucket_versioning(
        &self,
        bucket: &str,
        config: VersioningConfig,
    ) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_versioning", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.versioning = config;
        Ok(())
    }

    async fn get_bucket_versioning(&self, bucket: &str) -> Result<VersioningConfig, Error> {
        let state = self.begin("get_bucket_versioning", vec![json!(bucket)])?;
        Ok(state.bucket(bucket)?.versioning.clone())
    }

    async fn set_bucket_replication(
        &self,
        bucket: &str,
        config: ReplicationConfig,
    ) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_replication", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.replication = Some(config);
        Ok(())
    }

    async fn get_bucket_replication(&self, bucket: &str) -> Result<ReplicationConfig, Error> {
        let state = self.begin("get_bucket_replication", vec![json!(bucket)])?;
        state
            .bucket(bucket)?
            .replication
            .clone()
            .ok_or_else(|| not_configured("replication", bucket))
    }

    async fn remove_bucket_replication(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_bucket_replication", vec![json!(bucket)])?;
        state.bucket_mut(bucket)?.replication = None;
        Ok(())
    }

    async fn set_bucket_tagging(&self, bucket: &str, tags: Tags) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_tagging", vec![json!(bucket), json!(tags)])?;
        state.bucket_mut(bucket)?.tags = tags;
        Ok(())
    }

    async fn remove_bucket_tagging(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_bucket_tagging", vec![json!(bucket)])?;
        state.bucket_mut(bucket)?.tags.clear();
        Ok(())
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>, Error> {
        let state = self.begin("get_bucket_tagging", vec![json!(bucket)])?;
        Ok(tag_list(&state.bucket(bucket)?.tags))
    }

    async fn set_bucket_lifecycle(
        &self,
        bucket: &str,
        config: LifecycleConfig,
    ) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_lifecycle", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.lifecycle = Some(config);
        Ok(())
    }

    async fn get_bucket_lifecycle(&self, bucket: &str) -> Result<Option<LifecycleConfig>, Error> {
        let state = self.begin("get_bucket_lifecycle", vec![json!(bucket)])?;
        Ok(state.bucket(bucket)?.lifecycle.clone())
    }

    async fn remove_bucket_lifecycle(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_bucket_lifecycle", vec![json!(bucket)])?;
        state.bucket_mut(bucket)?.lifecycle = None;
        Ok(())
    }

    async fn set_object_lock_config(
        &self,
        bucket: &str,
        config: ObjectLockConfig,
    ) -> Result<(), Error> {
        let mut state = self.begin("set_object_lock_config", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.object_lock = Some(config);
        Ok(())
    }

    async fn get_object_lock_config(&self, bucket: &str) -> Result<ObjectLockConfig, Error> {
        let state = self.begin("get_object_lock_config", vec![json!(bucket)])?;
        state
            .bucket(bucket)?
            .object_lock
            .clone()
            .ok_or_else(|| not_configured("object lock", bucket))
    }

    async fn set_bucket_encryption(
        &self,
        bucket: &str,
        config: Option<SseConfig>,
    ) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_encryption", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.encryption = Some(config.unwrap_or_default());
        Ok(())
    }

    async fn get_bucket_encryption(&self, bucket: &str) -> Result<SseConfig, Error> {
        let state = self.begin("get_bucket_encryption", vec![json!(bucket)])?;
        state
            .bucket(bucket)?
            .encryption
            .clone()
            .ok_or_else(|| not_configured("encryption", bucket))
    }

    async fn remove_bucket_encryption(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_bucket_encryption", vec![json!(bucket)])?;
        state.bucket_mut(bucket)?.encryption = None;
        Ok(())
    }

    async fn get_bucket_notification(&self, bucket: &str) -> Result<NotificationConfig, Error> {
        let state = self.begin("get_bucket_notification", vec![json!(bucket)])?;
        Ok(state.bucket(bucket)?.notification.clone())
    }

    async fn set_bucket_notification(
        &self,
        bucket: &str,
        config: NotificationConfig,
    ) -> Result<(), Error> {
        let mut state =
            self.begin("set_bucket_notification", vec![json!(bucket), json!(config)])?;
        state.bucket_mut(bucket)?.notification = config;
        Ok(())
    }

    async fn remove_all_bucket_notification(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_all_bucket_notification", vec![json!(bucket)])?;
        state.bucket_mut(bucket)?.notification = NotificationConfig::default();
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String, Error> {
        let state = self.begin("get_bucket_policy", vec![json!(bucket)])?;
        state
            .bucket(bucket)?
            .policy
            .clone()
            .ok_or_else(|| not_configured("policy", bucket))
    }

    async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), Error> {
        let mut state = self.begin("set_bucket_policy", vec![json!(bucket), json!(policy)])?;
        state.bucket_mut(bucket)?.policy = Some(policy.to_string());
        Ok(())
    }

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<ByteStream, Error> {
        let args = vec![json!(bucket), json!(object), json!(options)];
        let state = self.begin("get_object", args)?;
        let stored = state.object(bucket, object)?;
        if let Some(etag) = &options.match_etag
            && *etag != stored.etag
        {
            return Err(Error::storage(MemoryError::PreconditionFailed(
                object.to_string(),
            )));
        }
        Ok(chunked(stored.data.clone()))
    }

    async fn get_partial_object(
        &self,
        bucket: &str,
        object: &str,
        offset: u64,
        length: Option<u64>,
        options: GetObjectOptions,
    ) -> Result<ByteStream, Error> {
        let args = vec![
            json!(bucket),
            json!(object),
            json!(offset),
            json!(length),
            json!(options),
        ];
        let state = self.begin("get_partial_object", args)?;
        let data = &state.object(bucket, object)?.data;
        let start = offset as usize;
        if start > data.len() {
            return Err(Error::storage(MemoryError::InvalidRange {
                object: object.to_string(),
                offset,
            }));
        }
        let end = match length {
            Some(length) => (start + length as usize).min(data.len()),
            None => data.len(),
        };
        Ok(chunked(data.slice(start..end)))
    }

    async fn fget_object(
        &self,
        bucket: &str,
        object: &str,
        file_path: &Path,
        options: GetObjectOptions,
    ) -> Result<(), Error> {
        let args = vec![
            json!(bucket),
            json!(object),
            json!(file_path.to_string_lossy()),
            json!(options),
        ];
        let data = {
            let state = self.begin("fget_object", args)?;
            state.object(bucket, object)?.data.clone()
        };
        tokio::fs::write(file_path, &data)
            .await
            .map_err(Error::storage)
    }

    async fn put_object(
        &self,
        bucket: &str,
        object: &str,
        data: Bytes,
        metadata: Metadata,
    ) -> Result<UploadedObjectInfo, Error> {
        let args = vec![
            json!(bucket),
            json!(object),
            json!(String::from_utf8_lossy(&data)),
            json!(metadata),
        ];
        drop(self.begin("put_object", args)?);
        self.store(bucket, object, data, metadata)
    }

    fn fput_object(
        &self,
        bucket: &str,
        object: &str,
        file_path: &Path,
        metadata: Metadata,
        callback: UploadCallback,
    ) {
        let args = vec![
            json!(bucket),
            json!(object),
            json!(file_path.to_string_lossy()),
            json!(metadata),
        ];
        let drop_callback = match self.begin("fput_object", args) {
            Ok(state) => state.drop_callbacks,
            Err(e) => return callback(Err(e)),
        };
        if drop_callback {
            log::debug!("dropping fput_object callback for '{object}'");
            return;
        }

        let client = self.clone();
        let (bucket, object, path) = (bucket.to_string(), object.to_string(), file_path.to_owned());
        tokio::spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(data) => client.store(&bucket, &object, Bytes::from(data), metadata),
                Err(e) => Err(Error::storage(e)),
            };
            callback(result);
        });
    }

    async fn stat_object(
        &self,
        bucket: &str,
        object: &str,
        options: StatObjectOptions,
    ) -> Result<ObjectStat, Error> {
        let state = self.begin("stat_object", vec![json!(bucket), json!(object), json!(options)])?;
        let stored = state.object(bucket, object)?;
        Ok(ObjectStat {
            size: stored.data.len() as u64,
            etag: stored.etag.clone(),
            last_modified: stored.last_modified,
            version_id: options.version_id,
            metadata: stored.metadata.clone(),
        })
    }

    async fn remove_object(
        &self,
        bucket: &str,
        object: &str,
        options: RemoveOptions,
    ) -> Result<(), Error> {
        let mut state =
            self.begin("remove_object", vec![json!(bucket), json!(object), json!(options)])?;
        if state.bucket_mut(bucket)?.objects.remove(object).is_some() {
            self.publish("s3:ObjectRemoved:Delete", bucket, object, 0);
        }
        Ok(())
    }

    async fn remove_objects(
        &self,
        bucket: &str,
        objects: Vec<ObjectToDelete>,
    ) -> Result<Vec<RemoveObjectResult>, Error> {
        let mut state = self.begin("remove_objects", vec![json!(bucket), json!(objects)])?;
        let stored = &mut state.bucket_mut(bucket)?.objects;
        Ok(objects
            .into_iter()
            .map(|o| {
                stored.remove(&o.name);
                RemoveObjectResult {
                    name: o.name,
                    version_id: o.version_id,
                    error: None,
                }
            })
            .collect())
    }

    async fn remove_incomplete_upload(&self, bucket: &str, object: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_incomplete_upload", vec![json!(bucket), json!(object)])?;
        state.bucket_mut(bucket)?.uploads.retain(|u| u.key != object);
        Ok(())
    }

    async fn put_object_retention(
        &self,
        bucket: &str,
        object: &str,
        retention: Retention,
    ) -> Result<(), Error> {
        let args = vec![json!(bucket), json!(object), json!(retention)];
        let mut state = self.begin("put_object_retention", args)?;
        state.object_mut(bucket, object)?.retention = Some(retention);
        Ok(())
    }

    async fn get_object_retention(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<Option<Retention>, Error> {
        let args = vec![json!(bucket), json!(object), json!(version_id)];
        let state = self.begin("get_object_retention", args)?;
        Ok(state.object(bucket, object)?.retention.clone())
    }

    async fn set_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        tags: Tags,
        options: TaggingOptions,
    ) -> Result<(), Error> {
        let args = vec![json!(bucket), json!(object), json!(tags), json!(options)];
        let mut state = self.begin("set_object_tagging", args)?;
        state.object_mut(bucket, object)?.tags = tags;
        Ok(())
    }

    async fn remove_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        options: TaggingOptions,
    ) -> Result<(), Error> {
        let args = vec![json!(bucket), json!(object), json!(options)];
        let mut state = self.begin("remove_object_tagging", args)?;
        state.object_mut(bucket, object)?.tags.clear();
        Ok(())
    }

    async fn get_object_tagging(
        &self,
        bucket: &str,
        object: &str,
        options: TaggingOptions,
    ) -> Result<Vec<Tag>, Error> {
        let args = vec![json!(bucket), json!(object), json!(options)];
        let state = self.begin("get_object_tagging", args)?;
        Ok(tag_list(&state.object(bucket, object)?.tags))
    }

    async fn get_object_legal_hold(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<LegalHoldStatus, Error> {
        let args = vec![json!(bucket), json!(object), json!(version_id)];
        let state = self.begin("get_object_legal_hold", args)?;
        Ok(state.object(bucket, object)?.legal_hold)
    }

    async fn set_object_legal_hold(
        &self,
        bucket: &str,
        object: &str,
        options: LegalHoldOptions,
    ) -> Result<(), Error> {
        let args = vec![json!(bucket), json!(object), json!(options)];
        let mut state = self.begin("set_object_legal_hold", args)?;
        state.object_mut(bucket, object)?.legal_hold = options.status;
        Ok(())
    }

    /// Queries are not evaluated: the whole content is returned, `None` for an empty object.
    async fn select_object_content(
        &self,
        bucket: &str,
        object: &str,
        request: SelectRequest,
    ) -> Result<Option<Bytes>, Error> {
        let args = vec![json!(bucket), json!(object), json!(request)];
        let state = self.begin("select_object_content", args)?;
        let data = &state.object(bucket, object)?.data;
        Ok((!data.is_empty()).then(|| data.clone()))
    }

    async fn presigned_url(
        &self,
        method: Method,
        bucket: &str,
        object: &str,
        options: PresignOptions,
    ) -> Result<String, Error> {
        let args = vec![
            json!(method.as_str()),
            json!(bucket),
            json!(object),
            json!(options),
        ];
        drop(self.begin("presigned_url", args)?);
        Ok(self.presign(&method, bucket, object, &options))
    }

    async fn presigned_get_object(
        &self,
        bucket: &str,
        object: &str,
        options: PresignOptions,
    ) -> Result<String, Error> {
        let args = vec![json!(bucket), json!(object), json!(options)];
        drop(self.begin("presigned_get_object", args)?);
        Ok(self.presign(&Method::GET, bucket, object, &options))
    }

    async fn presigned_put_object(
        &self,
        bucket: &str,
        object: &str,
        expires: Option<u32>,
    ) -> Result<String, Error> {
        let args = vec![json!(bucket), json!(object), json!(expires)];
        drop(self.begin("presigned_put_object", args)?);
        let options = PresignOptions::expires(expires.unwrap_or(DEFAULT_EXPIRY_SECONDS));
        Ok(self.presign(&Method::PUT, bucket, object, &options))
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, Error> {
        let state = self.begin("list_buckets", vec![])?;
        Ok(state
            .buckets
            .iter()
            .map(|(name, b)| BucketInfo {
                name: name.clone(),
                creation_date: b.created,
            })
            .collect())
    }

    async fn make_bucket(&self, bucket: &str, region: Option<&str>) -> Result<(), Error> {
        let mut state = self.begin("make_bucket", vec![json!(bucket), json!(region)])?;
        if state.buckets.contains_key(bucket) {
            return Err(Error::storage(MemoryError::BucketAlreadyExists(
                bucket.to_string(),
            )));
        }
        state.buckets.insert(bucket.to_string(), BucketState::new());
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        let state = self.begin("bucket_exists", vec![json!(bucket)])?;
        Ok(state.buckets.contains_key(bucket))
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error> {
        let mut state = self.begin("remove_bucket", vec![json!(bucket)])?;
        if !state.bucket(bucket)?.objects.is_empty() {
            return Err(Error::storage(MemoryError::BucketNotEmpty(
                bucket.to_string(),
            )));
        }
        state.buckets.remove(bucket);
        Ok(())
    }

    async fn copy_object(
        &self,
        bucket: &str,
        object: &str,
        source: &str,
    ) -> Result<CopyObjectResult, Error> {
        let mut state = self.begin("copy_object", vec![json!(bucket), json!(object), json!(source)])?;
        let (src_bucket, src_object) = source
            .trim_start_matches('/')
            .split_once('/')
            .ok_or_else(|| Error::storage(MemoryError::NoSuchKey(source.to_string())))?;
        let original = state.object(src_bucket, src_object)?;
        let copy = StoredObject::new(original.data.clone(), original.metadata.clone());
        let result = CopyObjectResult {
            etag: copy.etag.clone(),
            last_modified: copy.last_modified,
        };
        state
            .bucket_mut(bucket)?
            .objects
            .insert(object.to_string(), copy);
        Ok(result)
    }

    /// Echoes `{ "operation": .., "args": [..] }`.
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, Error> {
        drop(self.begin(operation, args.clone())?);
        Ok(json!({ "operation": operation, "args": args }))
    }
}
