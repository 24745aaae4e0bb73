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

//! Value types exchanged with a [`StorageClient`](crate::StorageClient)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type UtcTime = DateTime<Utc>;

/// User metadata attached to an object.
pub type Metadata = HashMap<String, String>;

/// Key/value tags of a bucket or object.
pub type Tags = HashMap<String, String>;

/// A single event delivered by `listen_bucket_notification`; the raw S3 event record.
pub type NotificationRecord = serde_json::Value;

/// Default presigned URL expiry: 7 days.
pub const DEFAULT_EXPIRY_SECONDS: u32 = 604_800;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Contains the bucket name and creation date
pub struct BucketInfo {
    pub name: String,
    pub creation_date: UtcTime,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Contains information of an item of a listing operation
pub struct ListEntry {
    pub name: String,
    pub last_modified: Option<UtcTime>,
    pub etag: Option<String>,
    pub size: Option<u64>,
    pub storage_class: Option<String>,
    pub version_id: Option<String>,
    pub is_prefix: bool,
    pub is_delete_marker: bool,
}

impl ListEntry {
    /// An entry standing for a common prefix of a non-recursive listing.
    pub fn prefix<S: Into<String>>(name: S) -> Self {
        ListEntry {
            name: name.into(),
            is_prefix: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A multipart upload that was started but never completed or aborted
pub struct IncompleteUpload {
    pub key: String,
    pub upload_id: String,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectStat {
    pub size: u64,
    pub etag: String,
    pub last_modified: UtcTime,
    pub version_id: Option<String>,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedObjectInfo {
    pub etag: String,
    pub version_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyObjectResult {
    pub etag: String,
    pub last_modified: UtcTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    #[default]
    Off,
    Enabled,
    Suspended,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersioningConfig {
    pub status: VersioningStatus,
    pub mfa_delete: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Object retention mode
pub enum RetentionMode {
    #[serde(rename = "GOVERNANCE")]
    Governance,
    #[serde(rename = "COMPLIANCE")]
    Compliance,
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionMode::Governance => write!(f, "GOVERNANCE"),
            RetentionMode::Compliance => write!(f, "COMPLIANCE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Object retention settings
pub struct Retention {
    pub mode: RetentionMode,
    pub retain_until_date: UtcTime,
    pub version_id: Option<String>,
    pub governance_bypass: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalHoldStatus {
    On,
    #[default]
    Off,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalHoldOptions {
    pub status: LegalHoldStatus,
    pub version_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityUnit {
    Days,
    Years,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Default object lock configuration of a bucket
pub struct ObjectLockConfig {
    pub mode: Option<RetentionMode>,
    pub unit: Option<ValidityUnit>,
    pub validity: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleRule {
    pub id: String,
    pub enabled: bool,
    pub prefix: Option<String>,
    pub expiration_days: Option<u32>,
    pub noncurrent_version_expiration_days: Option<u32>,
    pub abort_incomplete_multipart_upload_days: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    pub rules: Vec<LifecycleRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationRule {
    pub id: Option<String>,
    pub enabled: bool,
    pub priority: Option<u32>,
    pub prefix: Option<String>,
    pub destination_bucket_arn: String,
    pub delete_marker_replication: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationConfig {
    pub role: Option<String>,
    pub rules: Vec<ReplicationRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Server-side encryption configuration of a bucket
pub struct SseConfig {
    pub sse_algorithm: String,
    pub kms_master_key_id: Option<String>,
}

impl Default for SseConfig {
    fn default() -> Self {
        SseConfig {
            sse_algorithm: "AES256".into(),
            kms_master_key_id: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One queue, topic or lambda target of a bucket notification configuration
pub struct NotificationTarget {
    pub id: Option<String>,
    pub arn: String,
    pub events: Vec<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub queue_configs: Vec<NotificationTarget>,
    pub topic_configs: Vec<NotificationTarget>,
    pub cloud_func_configs: Vec<NotificationTarget>,
}

impl NotificationConfig {
    pub fn is_empty(&self) -> bool {
        self.queue_configs.is_empty()
            && self.topic_configs.is_empty()
            && self.cloud_func_configs.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetObjectOptions {
    pub version_id: Option<String>,
    pub match_etag: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatObjectOptions {
    pub version_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOptions {
    pub version_id: Option<String>,
    pub governance_bypass: bool,
    pub force_delete: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingOptions {
    pub version_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Identifies an object to delete
pub struct ObjectToDelete {
    pub name: String,
    pub version_id: Option<String>,
}

impl From<&str> for ObjectToDelete {
    fn from(name: &str) -> Self {
        ObjectToDelete {
            name: name.to_string(),
            version_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Per-object outcome of `remove_objects`
pub struct RemoveObjectResult {
    pub name: String,
    pub version_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// SQL select request run against a single object
pub struct SelectRequest {
    pub expression: String,
    pub input: SelectFormat,
    pub output: SelectFormat,
    pub request_progress: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Options of presigned URL generation
pub struct PresignOptions {
    /// Expiry in seconds.
    pub expires: u32,
    /// Extra query parameters, e.g. `response-content-type`.
    pub request_params: HashMap<String, String>,
    /// Signing time; now when unset.
    pub request_date: Option<UtcTime>,
}

impl Default for PresignOptions {
    fn default() -> Self {
        PresignOptions {
            expires: DEFAULT_EXPIRY_SECONDS,
            request_params: HashMap::new(),
            request_date: None,
        }
    }
}

impl PresignOptions {
    pub fn expires(expires: u32) -> Self {
        PresignOptions {
            expires,
            ..Default::default()
        }
    }
}
