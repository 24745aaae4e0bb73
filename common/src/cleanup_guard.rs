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

use crate::memory_client::MemoryClient;
use futures_util::StreamExt;
use minio_service::StorageClient;
use minio_service::types::ObjectToDelete;

/// Cleanup guard that removes a bucket and its objects on request
pub struct CleanupGuard {
    storage: MemoryClient,
    bucket_name: String,
}

impl CleanupGuard {
    pub fn new<S: Into<String>>(storage: MemoryClient, bucket_name: S) -> Self {
        Self {
            storage,
            bucket_name: bucket_name.into(),
        }
    }

    pub async fn cleanup(&self) {
        cleanup(&self.storage, &self.bucket_name).await;
    }
}

/// Deletes every object of `bucket_name`, then the bucket.
pub async fn cleanup(storage: &MemoryClient, bucket_name: &str) {
    tokio::select!(
        _ = tokio::time::sleep(std::time::Duration::from_secs(10)) => {
            eprintln!("Cleanup timeout after 10s while removing bucket {bucket_name}");
        },
        outcome = purge_bucket(storage, bucket_name) => {
            if let Err(e) = outcome {
                eprintln!("Error removing bucket '{bucket_name}':\n{e}");
            }
        }
    );
}

async fn purge_bucket(storage: &MemoryClient, bucket_name: &str) -> Result<(), minio_service::Error> {
    if !storage.bucket_exists(bucket_name).await? {
        return Ok(());
    }
    let mut objects: Vec<ObjectToDelete> = Vec::new();
    let mut listing = storage.list_objects(bucket_name, "", true);
    while let Some(entry) = listing.next().await {
        objects.push(entry?.name.as_str().into());
    }
    if !objects.is_empty() {
        storage.remove_objects(bucket_name, objects).await?;
    }
    storage.remove_bucket(bucket_name).await
}
