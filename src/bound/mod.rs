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

//! Storage client bound to a single bucket.

use crate::client::StorageClient;
use crate::config::ConfiguredOptions;
use crate::error::Error;
use crate::interception::{InterceptionRule, bind_arguments};
use serde_json::Value;
use std::sync::Arc;

pub mod drain;
pub mod operations;

/// A [`StorageClient`] with a fixed bucket.
///
/// All bucket-scoped operations of the underlying client are available
/// without the bucket parameter; the rest are forwarded unchanged. The
/// bucket is fixed at construction and the underlying client is shared,
/// so cloning a `BoundClient` is cheap and clones talk to the same client.
///
/// # Example
///
/// ```no_run
/// use minio_service::BoundClient;
/// use minio_service::types::GetObjectOptions;
///
/// async fn show(client: &BoundClient) -> Result<(), minio_service::Error> {
///     // calls get_object("<bound bucket>", "notes.txt", ..) on the underlying client
///     let content = client.get_object_bytes("notes.txt", GetObjectOptions::default()).await?;
///     println!("{} bytes from {}", content.len(), client.bucket_name());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct BoundClient {
    inner: Arc<dyn StorageClient>,
    bucket_name: String,
}

impl BoundClient {
    pub fn new<S: Into<String>>(bucket_name: S, inner: Arc<dyn StorageClient>) -> Self {
        BoundClient {
            inner,
            bucket_name: bucket_name.into(),
        }
    }

    /// Binds `inner` to the bucket of a validated configuration entry.
    pub fn from_options(options: &ConfiguredOptions, inner: Arc<dyn StorageClient>) -> Self {
        Self::new(options.bucket_name(), inner)
    }

    /// The bucket all bucket-scoped operations run against.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// The underlying, unbound client.
    pub fn inner(&self) -> &Arc<dyn StorageClient> {
        &self.inner
    }

    /// Invokes `operation` by name on the underlying client.
    ///
    /// The bound bucket is placed into `args` according to
    /// [`InterceptionRule::of`]`(operation)`; operations that are not
    /// bucket-scoped, including unknown ones, receive `args` unchanged.
    /// The result and any error of the underlying call are returned as is.
    pub async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, Error> {
        let rule = InterceptionRule::of(operation);
        log::trace!(
            "invoking `{operation}` ({rule}) with bucket '{}'",
            self.bucket_name
        );
        let args = bind_arguments(rule, &self.bucket_name, args);
        self.inner.invoke(operation, args).await
    }
}
