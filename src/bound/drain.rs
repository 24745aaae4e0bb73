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

//! Single-shot forms of streaming and callback-style operations.
//!
//! A drain consumes a listing stream to the end and resolves with every
//! item in emission order. The first error aborts the drain; items gathered
//! before it are dropped. There is no size limit: draining an unbounded
//! listing holds it entirely in memory.

use super::BoundClient;
use crate::error::Error;
use crate::types::{GetObjectOptions, IncompleteUpload, ListEntry, Metadata, UploadedObjectInfo};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use std::path::Path;
use tokio::sync::oneshot;

/// Collects every item of `stream`, in order, or returns its first error.
pub async fn drain<T, S>(mut stream: S) -> Result<Vec<T>, Error>
where
    S: Stream<Item = Result<T, Error>> + Unpin,
{
    let mut items: Vec<T> = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item?);
    }
    Ok(items)
}

/// Concatenates every chunk of `stream`, or returns its first error.
pub async fn drain_bytes<S>(mut stream: S) -> Result<Bytes, Error>
where
    S: Stream<Item = Result<Bytes, Error>> + Unpin,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

/// Runs a callback-style operation and waits for its callback.
///
/// `start` receives a one-shot callback and must hand it to the operation.
/// If the operation drops the callback without calling it, the result is
/// [`Error::CallbackDropped`] naming `operation`.
pub async fn await_callback<T, F>(operation: &'static str, start: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(Box<dyn FnOnce(Result<T, Error>) + Send + 'static>),
{
    let (tx, rx) = oneshot::channel::<Result<T, Error>>();
    start(Box::new(move |result| {
        // the receiver is gone only if the caller stopped waiting
        let _ = tx.send(result);
    }));
    rx.await.map_err(|_| Error::CallbackDropped(operation))?
}

impl BoundClient {
    /// Lists the bound bucket and resolves with all entries at once.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run(client: minio_service::BoundClient) -> Result<(), minio_service::Error> {
    /// for entry in client.list_objects_async("photos/", true).await? {
    ///     println!("{} {:?}", entry.name, entry.size);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_objects_async(
        &self,
        prefix: &str,
        recursive: bool,
    ) -> Result<Vec<ListEntry>, Error> {
        drain(self.list_objects(prefix, recursive)).await
    }

    /// Like [`list_objects_async`](Self::list_objects_async), starting after `start_after`.
    pub async fn list_objects_v2_async(
        &self,
        prefix: &str,
        recursive: bool,
        start_after: Option<&str>,
    ) -> Result<Vec<ListEntry>, Error> {
        drain(self.list_objects_v2(prefix, recursive, start_after)).await
    }

    pub async fn list_incomplete_uploads_async(
        &self,
        prefix: &str,
        recursive: bool,
    ) -> Result<Vec<IncompleteUpload>, Error> {
        drain(self.list_incomplete_uploads(prefix, recursive)).await
    }

    /// Reads the whole content of `object` into memory.
    pub async fn get_object_bytes(
        &self,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<Bytes, Error> {
        let stream = self.get_object(object, options).await?;
        drain_bytes(stream).await
    }

    /// Uploads a local file and waits for the upload to complete.
    pub async fn fput_object_async(
        &self,
        object: &str,
        file_path: &Path,
        metadata: Metadata,
    ) -> Result<UploadedObjectInfo, Error> {
        await_callback("fput_object", |callback| {
            self.fput_object(object, file_path, metadata, callback)
        })
        .await
    }
}
