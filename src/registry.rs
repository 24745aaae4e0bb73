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

//! Named bound clients created from configuration.

use crate::bound::BoundClient;
use crate::client::StorageClient;
use crate::config::{ClientOptions, ConfiguredOptions, RegistryConfig};
use crate::error::Error;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

/// Name of the entry used when a lookup does not name one.
pub const DEFAULT_CLIENT_NAME: &str = "default";

/// Constructs the underlying storage client for a validated configuration entry.
///
/// Implemented for any `Fn(&ConfiguredOptions) -> Result<Arc<dyn StorageClient>, Error>`.
pub trait Connector: Send + Sync {
    fn connect(&self, options: &ConfiguredOptions) -> Result<Arc<dyn StorageClient>, Error>;
}

impl<F> Connector for F
where
    F: Fn(&ConfiguredOptions) -> Result<Arc<dyn StorageClient>, Error> + Send + Sync,
{
    fn connect(&self, options: &ConfiguredOptions) -> Result<Arc<dyn StorageClient>, Error> {
        self(options)
    }
}

/// Holds one [`BoundClient`] per configuration entry name.
///
/// Entries are validated when the registry is created; the underlying client
/// of an entry is connected on its first lookup and reused afterwards.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use minio_service::{ClientRegistry, ConfiguredOptions, Error, RegistryConfig, StorageClient};
///
/// fn connect(options: &ConfiguredOptions) -> Result<Arc<dyn StorageClient>, Error> {
///     // build the concrete S3 client from options.base_url(), options.credentials(), ...
/// #   unimplemented!()
/// }
///
/// let config = RegistryConfig::from_json_file("minio.json").unwrap();
/// let registry = ClientRegistry::new(config, connect).unwrap();
/// let photos = registry.get(Some("photos")).unwrap();
/// let default = registry.get(None).unwrap();
/// ```
pub struct ClientRegistry {
    entries: DashMap<String, ConfiguredOptions>,
    default_name: String,
    clients: DashMap<String, Arc<BoundClient>>,
    connector: Box<dyn Connector>,
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("entries", &self.names())
            .field("default_name", &self.default_name)
            .field("connected", &self.clients.len())
            .finish()
    }
}

impl ClientRegistry {
    /// Validates every entry of `config` and creates the registry.
    ///
    /// Fails with [`Error::InvalidClient`] on the first invalid entry; no
    /// client is connected in that case.
    pub fn new<C: Connector + 'static>(config: RegistryConfig, connector: C) -> Result<Self, Error> {
        let entries: DashMap<String, ConfiguredOptions> = DashMap::new();
        for (name, options) in config.resolved_entries() {
            let options = options.validate().map_err(|source| Error::InvalidClient {
                name: name.clone(),
                source,
            })?;
            entries.insert(name, options);
        }

        let default_name = config
            .default_client_name
            .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());

        Ok(ClientRegistry {
            entries,
            default_name,
            clients: DashMap::new(),
            connector: Box::new(connector),
        })
    }

    /// Name used by [`get`](Self::get) when no name is given.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Names of all configured entries, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Validated configuration of an entry.
    pub fn options(&self, name: &str) -> Option<ConfiguredOptions> {
        self.entries.get(name).map(|e| e.value().clone())
    }

    /// Returns the bound client of `name`, or of the default entry.
    ///
    /// The first lookup of a name connects its client; concurrent first
    /// lookups of the same name connect once. Every lookup of a name returns
    /// the same instance.
    pub fn get(&self, name: Option<&str>) -> Result<Arc<BoundClient>, Error> {
        let name = name.unwrap_or(self.default_name.as_str());
        if let Some(client) = self.clients.get(name) {
            return Ok(client.value().clone());
        }

        let options = self
            .options(name)
            .ok_or_else(|| Error::InstanceNotFound(name.to_string()))?;

        match self.clients.entry(name.to_string()) {
            Entry::Occupied(e) => Ok(e.get().clone()),
            Entry::Vacant(e) => {
                let client = Arc::new(self.create_client(&options)?);
                e.insert(client.clone());
                Ok(client)
            }
        }
    }

    /// Shorthand for `get(None)`.
    pub fn default_client(&self) -> Result<Arc<BoundClient>, Error> {
        self.get(None)
    }

    /// Connects every configured entry that is not connected yet.
    pub fn initialize(&self) -> Result<(), Error> {
        for name in self.names() {
            self.get(Some(&name))?;
        }
        Ok(())
    }

    /// Adds and connects a new entry at runtime.
    ///
    /// The entry is validated first; a name that is already configured fails
    /// with [`Error::DuplicateInstance`].
    pub fn create_instance(
        &self,
        name: &str,
        options: ClientOptions,
    ) -> Result<Arc<BoundClient>, Error> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateInstance(name.to_string())),
            Entry::Vacant(e) => {
                let options = options.validate().map_err(|source| Error::InvalidClient {
                    name: name.to_string(),
                    source,
                })?;
                let client = Arc::new(self.create_client(&options)?);
                self.clients.insert(name.to_string(), client.clone());
                e.insert(options);
                Ok(client)
            }
        }
    }

    fn create_client(&self, options: &ConfiguredOptions) -> Result<BoundClient, Error> {
        log::info!(
            "connecting bucket '{}' at {} with access key '{}'",
            options.bucket_name(),
            options.base_url(),
            options.access_key()
        );
        let inner = self.connector.connect(options)?;
        Ok(BoundClient::from_options(options, inner))
    }
}
