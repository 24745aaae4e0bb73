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

use minio_service::Error;
use minio_service::types::{GetObjectOptions, Metadata, UploadedObjectInfo};
use minio_service_common::test_context::TestContext;
use minio_service_common::utils::{rand_data, rand_object_name};
use std::path::PathBuf;

fn temp_file_path() -> PathBuf {
    std::env::temp_dir().join(format!("minio-service-{}", uuid::Uuid::new_v4()))
}

#[minio_service_macros::test]
async fn upload_and_download_file(ctx: TestContext, bucket_name: String) {
    let object_name = rand_object_name();
    let data = rand_data(1024);
    let upload_path = temp_file_path();
    tokio::fs::write(&upload_path, &data).await.unwrap();

    let info = ctx
        .client
        .fput_object_async(&object_name, &upload_path, Metadata::new())
        .await
        .unwrap();
    assert!(!info.etag.is_empty());
    assert_eq!(ctx.storage.object_data(&bucket_name, &object_name), Some(data.clone()));

    let download_path = temp_file_path();
    ctx.client
        .fget_object(&object_name, &download_path, GetObjectOptions::default())
        .await
        .unwrap();
    assert_eq!(tokio::fs::read(&download_path).await.unwrap(), data);

    let _ = tokio::fs::remove_file(&upload_path).await;
    let _ = tokio::fs::remove_file(&download_path).await;
}

#[minio_service_macros::test]
async fn upload_of_missing_file_fails(ctx: TestContext, _bucket_name: String) {
    let err = ctx
        .client
        .fput_object_async("missing", &temp_file_path(), Metadata::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[minio_service_macros::test]
async fn upload_failure_is_reported_through_callback(ctx: TestContext, _bucket_name: String) {
    ctx.storage.fail_next("fput_object", "SlowDown");

    let err = ctx
        .client
        .fput_object_async("object", &temp_file_path(), Metadata::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "SlowDown");
}

#[minio_service_macros::test]
async fn dropped_upload_callback(ctx: TestContext, _bucket_name: String) {
    ctx.storage.drop_callbacks(true);

    let err = ctx
        .client
        .fput_object_async("object", &temp_file_path(), Metadata::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CallbackDropped("fput_object")));
}

#[minio_service_macros::test]
async fn upload_with_callback(ctx: TestContext, bucket_name: String) {
    let path = temp_file_path();
    tokio::fs::write(&path, b"callback").await.unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel();
    ctx.client.fput_object(
        "cb",
        &path,
        Metadata::new(),
        Box::new(move |result: Result<UploadedObjectInfo, Error>| {
            let _ = tx.send(result);
        }),
    );
    rx.await.unwrap().unwrap();
    assert_eq!(ctx.storage.object_data(&bucket_name, "cb").unwrap(), "callback");

    let call = ctx.storage.calls_of("fput_object").remove(0);
    assert_eq!(call.args[0], serde_json::json!(bucket_name));

    let _ = tokio::fs::remove_file(&path).await;
}
