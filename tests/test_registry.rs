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

use minio_service::{
    ClientOptions, ClientRegistry, ConfigError, ConfiguredOptions, Error, RegistryConfig,
    StorageClient,
};
use minio_service_common::memory_client::MemoryClient;
use minio_service_common::test_context::{TestContext, memory_connector};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const CONFIG: &str = r#"{
    "default": { "endPoint": "s3.local", "port": 9000, "useSSL": false },
    "clients": {
        "photos": { "accessKey": "AK1", "secretKey": "SK1", "bucket": "photos" },
        "backups": { "accessKey": "AK2", "secretKey": "SK2", "bucketName": "backups" }
    },
    "defaultClientName": "photos"
}"#;

fn build_registry(config: &str) -> (Result<ClientRegistry, Error>, Arc<AtomicUsize>) {
    let connects = Arc::new(AtomicUsize::new(0));
    let config = RegistryConfig::from_json_str(config).unwrap();
    let registry = ClientRegistry::new(
        config,
        memory_connector(MemoryClient::default(), connects.clone()),
    );
    (registry, connects)
}

#[test]
fn named_and_default_lookup() {
    let (registry, connects) = build_registry(CONFIG);
    let registry = registry.unwrap();
    assert_eq!(registry.names(), vec!["backups", "photos"]);
    assert_eq!(registry.default_name(), "photos");
    assert_eq!(connects.load(Ordering::SeqCst), 0);

    let backups = registry.get(Some("backups")).unwrap();
    assert_eq!(backups.bucket_name(), "backups");
    let photos = registry.default_client().unwrap();
    assert_eq!(photos.bucket_name(), "photos");
    assert_eq!(connects.load(Ordering::SeqCst), 2);

    let options = registry.options("backups").unwrap();
    assert_eq!(options.base_url(), "http://s3.local:9000");
    assert_eq!(options.access_key(), "AK2");
}

#[test]
fn lookups_return_the_same_instance() {
    let (registry, connects) = build_registry(CONFIG);
    let registry = registry.unwrap();

    let first = registry.get(Some("photos")).unwrap();
    let second = registry.get(Some("photos")).unwrap();
    let by_default = registry.get(None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &by_default));
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_lookups_connect_once() {
    let (registry, connects) = build_registry(CONFIG);
    let registry = Arc::new(registry.unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.get(Some("backups")).unwrap() })
        })
        .collect();
    let mut clients = Vec::new();
    for handle in handles {
        clients.push(handle.await.unwrap());
    }
    assert!(clients.iter().all(|c| Arc::ptr_eq(c, &clients[0])));
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_access_key_fails_before_connecting() {
    let (registry, connects) = build_registry(
        r#"{ "client": { "endpoint": "s3.local", "secretKey": "SK", "bucketName": "b1" } }"#,
    );
    match registry.unwrap_err() {
        Error::InvalidClient { name, source } => {
            assert_eq!(name, "default");
            assert!(matches!(source, ConfigError::MissingCredentials));
        }
        e => panic!("unexpected error: {e}"),
    }
    assert_eq!(connects.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_endpoint_and_bucket() {
    let (registry, _) = build_registry(r#"{ "client": { "accessKey": "AK", "secretKey": "SK", "bucketName": "b1" } }"#);
    assert!(matches!(
        registry.unwrap_err(),
        Error::InvalidClient {
            source: ConfigError::MissingEndpoint,
            ..
        }
    ));

    let (registry, _) = build_registry(r#"{ "client": { "endpoint": "s3.local", "accessKey": "AK", "secretKey": "SK" } }"#);
    assert!(matches!(
        registry.unwrap_err(),
        Error::InvalidClient {
            source: ConfigError::MissingBucket,
            ..
        }
    ));
}

#[test]
fn unknown_instance() {
    let (registry, connects) = build_registry(CONFIG);
    let registry = registry.unwrap();

    let err = registry.get(Some("archive")).unwrap_err();
    assert!(matches!(err, Error::InstanceNotFound(ref name) if name == "archive"));
    assert_eq!(err.to_string(), "minio instance 'archive' not found");
    assert_eq!(connects.load(Ordering::SeqCst), 0);
}

#[test]
fn default_name_without_entry() {
    let (registry, _) = build_registry(
        r#"{ "clients": { "photos": { "endpoint": "s3.local", "accessKey": "AK", "secretKey": "SK", "bucketName": "photos" } } }"#,
    );
    let registry = registry.unwrap();
    assert!(matches!(
        registry.default_client().unwrap_err(),
        Error::InstanceNotFound(ref name) if name == "default"
    ));
    assert!(registry.get(Some("photos")).is_ok());
}

#[test]
fn initialize_connects_every_entry() {
    let (registry, connects) = build_registry(CONFIG);
    let registry = registry.unwrap();
    registry.initialize().unwrap();
    assert_eq!(connects.load(Ordering::SeqCst), 2);
    registry.initialize().unwrap();
    assert_eq!(connects.load(Ordering::SeqCst), 2);
}

#[test]
fn connector_errors_are_returned() {
    let config = RegistryConfig::from_json_str(CONFIG).unwrap();
    let registry = ClientRegistry::new(
        config,
        |_: &ConfiguredOptions| -> Result<Arc<dyn StorageClient>, Error> {
            Err(Error::storage(std::io::Error::other("connection refused")))
        },
    )
    .unwrap();

    let err = registry.get(None).unwrap_err();
    assert_eq!(err.to_string(), "connection refused");
    // nothing was cached, a later lookup retries
    assert!(registry.get(None).is_err());
}

#[test]
fn create_instance_at_runtime() {
    let ctx = TestContext::new_from_env();
    let before = ctx.connects();

    let options = ClientOptions::builder()
        .endpoint("s3.local")
        .access_key("AK")
        .secret_key("SK")
        .bucket_name("archive")
        .build();
    let archive = ctx.registry.create_instance("archive", options.clone()).unwrap();
    assert_eq!(archive.bucket_name(), "archive");
    assert_eq!(ctx.connects(), before + 1);
    assert!(Arc::ptr_eq(&archive, &ctx.registry.get(Some("archive")).unwrap()));

    let err = ctx.registry.create_instance("archive", options).unwrap_err();
    assert!(matches!(err, Error::DuplicateInstance(ref name) if name == "archive"));

    let err = ctx
        .registry
        .create_instance("broken", ClientOptions::builder().endpoint("s3.local").build())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidClient { .. }));
    assert!(ctx.registry.options("broken").is_none());
}

#[test]
fn load_config_file() {
    let path = std::env::temp_dir().join(format!("minio-service-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, CONFIG).unwrap();

    let config = RegistryConfig::from_json_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let registry = ClientRegistry::new(config, TestContext::new_from_env().connector()).unwrap();
    assert_eq!(registry.get(None).unwrap().bucket_name(), "photos");

    let missing = RegistryConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(missing, ConfigError::Io(_)));
}
