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

use crate::cleanup_guard::CleanupGuard;
use crate::memory_client::MemoryClient;
use crate::utils::rand_bucket_name;
use minio_service::{
    BoundClient, ClientOptions, ClientRegistry, ConfiguredOptions, Connector, Error,
    RegistryConfig, StorageClient,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_SERVER_ENDPOINT: &str = "localhost";
const DEFAULT_SERVER_PORT: u16 = 9000;
const DEFAULT_ACCESS_KEY: &str = "minioadmin";
const DEFAULT_SECRET_KEY: &str = "minioadmin";

/// Connector handing out `storage` for every entry and counting connections.
pub fn memory_connector(storage: MemoryClient, connects: Arc<AtomicUsize>) -> impl Connector + 'static {
    move |options: &ConfiguredOptions| -> Result<Arc<dyn StorageClient>, Error> {
        log::debug!("connecting memory client for bucket '{}'", options.bucket_name());
        connects.fetch_add(1, Ordering::SeqCst);
        let client: Arc<dyn StorageClient> = Arc::new(storage.clone());
        Ok(client)
    }
}

/// A registry with one `default` entry backed by a [`MemoryClient`].
#[derive(Clone, Debug)]
pub struct TestContext {
    pub storage: MemoryClient,
    pub registry: Arc<ClientRegistry>,
    pub client: Arc<BoundClient>,
    pub options: ConfiguredOptions,
    connects: Arc<AtomicUsize>,
}

impl TestContext {
    /// Builds the context from `SERVER_ENDPOINT`, `ACCESS_KEY`, ... with local defaults.
    ///
    /// The bound bucket is `BUCKET_NAME` or a random name; it is not created.
    pub fn new_from_env() -> Self {
        Self::from_options(ClientOptions::from_env().merged_with(&Self::defaults()))
    }

    /// Like [`new_from_env`](Self::new_from_env), bound to `bucket_name`, which is created.
    pub fn with_bucket(bucket_name: &str) -> Self {
        let mut options = ClientOptions::from_env().merged_with(&Self::defaults());
        options.bucket_name = Some(bucket_name.to_string());
        let ctx = Self::from_options(options);
        ctx.storage.add_bucket(bucket_name);
        ctx
    }

    pub fn from_options(options: ClientOptions) -> Self {
        let storage = MemoryClient::default();
        let connects = Arc::new(AtomicUsize::new(0));
        let registry = ClientRegistry::new(
            RegistryConfig::single(options),
            memory_connector(storage.clone(), connects.clone()),
        )
        .unwrap();
        let client = registry.default_client().unwrap();
        let options = registry.options(registry.default_name()).unwrap();
        Self {
            storage,
            registry: Arc::new(registry),
            client,
            options,
            connects,
        }
    }

    fn defaults() -> ClientOptions {
        ClientOptions::builder()
            .endpoint(DEFAULT_SERVER_ENDPOINT)
            .port(DEFAULT_SERVER_PORT)
            .use_tls(false)
            .access_key(DEFAULT_ACCESS_KEY)
            .secret_key(DEFAULT_SECRET_KEY)
            .bucket_name(rand_bucket_name())
            .build()
    }

    /// Number of times the registry connected an underlying client.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// A connector sharing this context's storage and connection counter.
    pub fn connector(&self) -> impl Connector + 'static {
        memory_connector(self.storage.clone(), self.connects.clone())
    }

    /// Creates a random bucket with a cleanup guard.
    pub fn create_bucket_helper(&self) -> (String, CleanupGuard) {
        let bucket_name = rand_bucket_name();
        self.storage.add_bucket(&bucket_name);
        let guard = CleanupGuard::new(self.storage.clone(), &bucket_name);
        (bucket_name, guard)
    }
}
