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

use bytes::Bytes;
use minio_service::Error;
use minio_service::types::*;
use minio_service_common::test_context::TestContext;
use minio_service_common::utils::{rand_data, rand_object_name};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

#[minio_service_macros::test]
async fn bucket_is_passed_first(ctx: TestContext, bucket_name: String) {
    ctx.storage.add_object(&bucket_name, "a1", "hello");
    ctx.storage.clear_calls();

    let stat = ctx
        .client
        .stat_object("a1", StatObjectOptions::default())
        .await
        .unwrap();
    assert_eq!(stat.size, 5);

    let calls = ctx.storage.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, "stat_object");
    assert_eq!(calls[0].args[0], json!(bucket_name));
    assert_eq!(calls[0].args[1], json!("a1"));
}

#[minio_service_macros::test]
async fn put_then_get_object(ctx: TestContext, bucket_name: String) {
    let object_name = rand_object_name();
    let data = rand_data(37);

    let mut metadata = HashMap::new();
    metadata.insert("x-amz-meta-owner".to_string(), "tests".to_string());
    let info = ctx
        .client
        .put_object(&object_name, data.clone(), metadata.clone())
        .await
        .unwrap();
    assert!(!info.etag.is_empty());
    assert_eq!(ctx.storage.object_data(&bucket_name, &object_name), Some(data.clone()));

    let content = ctx
        .client
        .get_object_bytes(&object_name, GetObjectOptions::default())
        .await
        .unwrap();
    assert_eq!(content, data);

    let stat = ctx
        .client
        .stat_object(&object_name, StatObjectOptions::default())
        .await
        .unwrap();
    assert_eq!(stat.etag, info.etag);
    assert_eq!(stat.metadata, metadata);

    for call in ctx.storage.calls() {
        assert_eq!(call.args[0], json!(bucket_name), "{}", call.operation);
    }
}

#[minio_service_macros::test]
async fn get_partial_object(ctx: TestContext, bucket_name: String) {
    ctx.storage.add_object(&bucket_name, "digits", "0123456789");

    let stream = ctx
        .client
        .get_partial_object("digits", 2, Some(5), GetObjectOptions::default())
        .await
        .unwrap();
    let part = minio_service::bound::drain::drain_bytes(stream).await.unwrap();
    assert_eq!(part, Bytes::from_static(b"23456"));

    let stream = ctx
        .client
        .get_partial_object("digits", 7, None, GetObjectOptions::default())
        .await
        .unwrap();
    let tail = minio_service::bound::drain::drain_bytes(stream).await.unwrap();
    assert_eq!(tail, Bytes::from_static(b"789"));
}

#[minio_service_macros::test]
async fn get_object_with_wrong_etag(ctx: TestContext, bucket_name: String) {
    ctx.storage.add_object(&bucket_name, "a1", "hello");

    let options = GetObjectOptions {
        match_etag: Some("not-the-etag".into()),
        ..Default::default()
    };
    let err = ctx.client.get_object_bytes("a1", options).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[minio_service_macros::test]
async fn underlying_errors_are_returned_unchanged(ctx: TestContext, _bucket_name: String) {
    ctx.storage.fail_next("get_bucket_policy", "Access Denied.");

    let err = ctx.client.get_bucket_policy().await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(err.to_string(), "Access Denied.");
    assert_eq!(
        err.as_storage().map(|e| e.to_string()),
        Some("Access Denied.".to_string())
    );
}

#[minio_service_macros::test]
async fn bucket_configuration(ctx: TestContext, bucket_name: String) {
    let client = &ctx.client;

    client
        .set_bucket_versioning(VersioningConfig {
            status: VersioningStatus::Enabled,
            mfa_delete: None,
        })
        .await
        .unwrap();
    assert_eq!(
        client.get_bucket_versioning().await.unwrap().status,
        VersioningStatus::Enabled
    );

    let tags: Tags = HashMap::from([
        ("project".to_string(), "photos".to_string()),
        ("env".to_string(), "test".to_string()),
    ]);
    client.set_bucket_tagging(tags).await.unwrap();
    let keys: Vec<String> = client
        .get_bucket_tagging()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.key)
        .collect();
    assert_eq!(keys, vec!["env", "project"]);
    client.remove_bucket_tagging().await.unwrap();
    assert!(client.get_bucket_tagging().await.unwrap().is_empty());

    assert_eq!(client.get_bucket_lifecycle().await.unwrap(), None);
    let lifecycle = LifecycleConfig {
        rules: vec![LifecycleRule {
            id: "expire-tmp".into(),
            enabled: true,
            prefix: Some("tmp/".into()),
            expiration_days: Some(1),
            ..Default::default()
        }],
    };
    client.set_bucket_lifecycle(lifecycle.clone()).await.unwrap();
    assert_eq!(client.get_bucket_lifecycle().await.unwrap(), Some(lifecycle));
    client.remove_bucket_lifecycle().await.unwrap();
    assert_eq!(client.get_bucket_lifecycle().await.unwrap(), None);

    client.set_bucket_encryption(None).await.unwrap();
    assert_eq!(
        client.get_bucket_encryption().await.unwrap().sse_algorithm,
        "AES256"
    );
    client.remove_bucket_encryption().await.unwrap();
    assert!(client.get_bucket_encryption().await.is_err());

    let policy = format!(
        r#"{{"Version":"2012-10-17","Statement":[{{"Effect":"Allow","Principal":{{"AWS":["*"]}},"Action":["s3:GetObject"],"Resource":["arn:aws:s3:::{bucket_name}/*"]}}]}}"#
    );
    client.set_bucket_policy(&policy).await.unwrap();
    assert_eq!(client.get_bucket_policy().await.unwrap(), policy);

    let lock = ObjectLockConfig {
        mode: Some(RetentionMode::Governance),
        unit: Some(ValidityUnit::Days),
        validity: Some(7),
    };
    client.set_object_lock_config(lock.clone()).await.unwrap();
    assert_eq!(client.get_object_lock_config().await.unwrap(), lock);

    let replication = ReplicationConfig {
        role: None,
        rules: vec![ReplicationRule {
            id: Some("r1".into()),
            enabled: true,
            destination_bucket_arn: "arn:minio:replication::dest".into(),
            ..Default::default()
        }],
    };
    client.set_bucket_replication(replication.clone()).await.unwrap();
    assert_eq!(client.get_bucket_replication().await.unwrap(), replication);
    client.remove_bucket_replication().await.unwrap();
    assert!(client.get_bucket_replication().await.is_err());

    assert!(client.get_bucket_notification().await.unwrap().is_empty());
    let notification = NotificationConfig {
        queue_configs: vec![NotificationTarget {
            arn: "arn:minio:sqs::miniojavatest:webhook".into(),
            events: vec!["s3:ObjectCreated:*".into()],
            ..Default::default()
        }],
        ..Default::default()
    };
    client
        .set_bucket_notification(notification.clone())
        .await
        .unwrap();
    assert_eq!(client.get_bucket_notification().await.unwrap(), notification);
    client.remove_all_bucket_notification().await.unwrap();
    assert!(client.get_bucket_notification().await.unwrap().is_empty());

    for call in ctx.storage.calls() {
        assert_eq!(call.args[0], json!(bucket_name), "{}", call.operation);
    }
}

#[minio_service_macros::test]
async fn object_tagging_retention_and_legal_hold(ctx: TestContext, bucket_name: String) {
    let client = &ctx.client;
    ctx.storage.add_object(&bucket_name, "doc.txt", "content");

    let tags: Tags = HashMap::from([("kind".to_string(), "doc".to_string())]);
    client
        .set_object_tagging("doc.txt", tags, TaggingOptions::default())
        .await
        .unwrap();
    let listed = client
        .get_object_tagging("doc.txt", TaggingOptions::default())
        .await
        .unwrap();
    assert_eq!(
        listed,
        vec![Tag {
            key: "kind".into(),
            value: "doc".into()
        }]
    );
    client
        .remove_object_tagging("doc.txt", TaggingOptions::default())
        .await
        .unwrap();
    assert!(
        client
            .get_object_tagging("doc.txt", TaggingOptions::default())
            .await
            .unwrap()
            .is_empty()
    );

    assert_eq!(client.get_object_retention("doc.txt", None).await.unwrap(), None);
    let retention = Retention {
        mode: RetentionMode::Governance,
        retain_until_date: chrono::Utc::now() + chrono::Duration::days(1),
        version_id: None,
        governance_bypass: false,
    };
    client
        .put_object_retention("doc.txt", retention.clone())
        .await
        .unwrap();
    assert_eq!(
        client.get_object_retention("doc.txt", None).await.unwrap(),
        Some(retention)
    );

    assert_eq!(
        client.get_object_legal_hold("doc.txt", None).await.unwrap(),
        LegalHoldStatus::Off
    );
    client
        .set_object_legal_hold(
            "doc.txt",
            LegalHoldOptions {
                status: LegalHoldStatus::On,
                version_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        client.get_object_legal_hold("doc.txt", None).await.unwrap(),
        LegalHoldStatus::On
    );
}

#[minio_service_macros::test]
async fn remove_objects(ctx: TestContext, bucket_name: String) {
    for name in ["a", "b", "c"] {
        ctx.storage.add_object(&bucket_name, name, "x");
    }

    ctx.client
        .remove_object("a", RemoveOptions::default())
        .await
        .unwrap();
    let results = ctx
        .client
        .remove_objects(vec!["b".into(), "c".into()])
        .await
        .unwrap();
    let removed: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(removed, vec!["b", "c"]);
    assert!(results.iter().all(|r| r.error.is_none()));
    assert!(ctx.client.list_objects_async("", true).await.unwrap().is_empty());
}

#[minio_service_macros::test]
async fn select_object_content(ctx: TestContext, bucket_name: String) {
    ctx.storage.add_object(&bucket_name, "data.csv", "a,b\n1,2\n");
    ctx.storage.add_object(&bucket_name, "empty.csv", "");

    let request = SelectRequest {
        expression: "select * from S3Object".into(),
        ..Default::default()
    };
    let records = ctx
        .client
        .select_object_content("data.csv", request.clone())
        .await
        .unwrap();
    assert_eq!(records, Some(Bytes::from_static(b"a,b\n1,2\n")));
    assert_eq!(
        ctx.client
            .select_object_content("empty.csv", request)
            .await
            .unwrap(),
        None
    );
}

#[minio_service_macros::test]
async fn clones_share_the_underlying_client(ctx: TestContext, bucket_name: String) {
    let other = (*ctx.client).clone();
    assert_eq!(other.bucket_name(), bucket_name);
    assert!(Arc::ptr_eq(other.inner(), ctx.client.inner()));

    other
        .put_object("shared", Bytes::from_static(b"1"), Metadata::new())
        .await
        .unwrap();
    assert!(ctx.storage.object_data(&bucket_name, "shared").is_some());
}

#[minio_service_macros::test]
async fn copy_object_from_another_bucket(ctx: TestContext, bucket_name: String) {
    let (source_bucket, guard) = ctx.create_bucket_helper();
    ctx.storage.add_object(&source_bucket, "src", "payload");

    ctx.client
        .copy_object(&bucket_name, "dst", &format!("{source_bucket}/src"))
        .await
        .unwrap();
    let content = ctx
        .client
        .get_object_bytes("dst", GetObjectOptions::default())
        .await
        .unwrap();
    assert_eq!(content, "payload");

    guard.cleanup().await;
    assert!(!ctx.storage.has_bucket(&source_bucket));
}
