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

//! Client configuration entries and their validation

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use typed_builder::TypedBuilder;

/// Credentials contain access key, secret key and session token optionally
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"*****")
            .field("session_token", &self.session_token.as_ref().map(|_| "*****"))
            .finish()
    }
}

/// A single, possibly incomplete, client configuration entry as it appears
/// in a configuration document.
///
/// Field names follow the usual MinIO client option names. `endPoint`,
/// `useSSL` and `bucket` are accepted as aliases.
///
/// # Example
///
/// ```
/// use minio_service::ClientOptions;
///
/// let options = ClientOptions::builder()
///     .endpoint("play.min.io")
///     .access_key("minioadmin")
///     .secret_key("minioadmin")
///     .bucket_name("photos")
///     .build();
/// let configured = options.validate().unwrap();
/// assert_eq!(configured.bucket_name(), "photos");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct ClientOptions {
    #[serde(alias = "endPoint", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "useTLS", alias = "useSSL", skip_serializing_if = "Option::is_none")]
    pub use_tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(alias = "bucket", skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
}

impl ClientOptions {
    /// Fills every field left unset in `self` from `defaults`.
    pub fn merged_with(self, defaults: &ClientOptions) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.or_else(|| defaults.endpoint.clone()),
            port: self.port.or(defaults.port),
            use_tls: self.use_tls.or(defaults.use_tls),
            access_key: self.access_key.or_else(|| defaults.access_key.clone()),
            secret_key: self.secret_key.or_else(|| defaults.secret_key.clone()),
            session_token: self.session_token.or_else(|| defaults.session_token.clone()),
            region: self.region.or_else(|| defaults.region.clone()),
            bucket_name: self.bucket_name.or_else(|| defaults.bucket_name.clone()),
        }
    }

    /// Reads a client entry from the environment.
    ///
    /// Recognized variables: `SERVER_ENDPOINT`, `SERVER_PORT`, `ENABLE_HTTPS`,
    /// `ACCESS_KEY`, `SECRET_KEY`, `SERVER_REGION` and `BUCKET_NAME`. Unset
    /// variables leave the corresponding field empty; nothing is validated here.
    pub fn from_env() -> ClientOptions {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let endpoint = var("SERVER_ENDPOINT");
        log::debug!("SERVER_ENDPOINT={endpoint:?}");
        let port = var("SERVER_PORT").and_then(|v| v.parse::<u16>().ok());
        log::debug!("SERVER_PORT={port:?}");
        let use_tls = var("ENABLE_HTTPS").and_then(|v| v.parse::<bool>().ok());
        log::debug!("ENABLE_HTTPS={use_tls:?}");
        let access_key = var("ACCESS_KEY");
        log::debug!("ACCESS_KEY={access_key:?}");
        let secret_key = var("SECRET_KEY");
        log::debug!("SECRET_KEY=*****");
        let region = var("SERVER_REGION");
        log::debug!("SERVER_REGION={region:?}");
        let bucket_name = var("BUCKET_NAME");
        log::debug!("BUCKET_NAME={bucket_name:?}");

        ClientOptions {
            endpoint,
            port,
            use_tls,
            access_key,
            secret_key,
            session_token: None,
            region,
            bucket_name,
        }
    }

    /// Checks the required fields and freezes the entry.
    ///
    /// Fails before anything is connected if the endpoint, either key, or the
    /// bucket name is missing or empty.
    pub fn validate(self) -> Result<ConfiguredOptions, ConfigError> {
        let endpoint = non_empty(self.endpoint).ok_or(ConfigError::MissingEndpoint)?;
        if endpoint.contains('/') || endpoint.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint,
                reason: "expected a host name without scheme or path".into(),
            });
        }

        let (access_key, secret_key) =
            match (non_empty(self.access_key), non_empty(self.secret_key)) {
                (Some(a), Some(s)) => (a, s),
                _ => return Err(ConfigError::MissingCredentials),
            };
        let bucket_name = non_empty(self.bucket_name).ok_or(ConfigError::MissingBucket)?;

        Ok(ConfiguredOptions {
            endpoint,
            port: self.port,
            use_tls: self.use_tls.unwrap_or(true),
            credentials: Credentials {
                access_key,
                secret_key,
                session_token: non_empty(self.session_token),
            },
            region: non_empty(self.region),
            bucket_name,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated client configuration entry. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfiguredOptions {
    endpoint: String,
    port: Option<u16>,
    use_tls: bool,
    credentials: Credentials,
    region: Option<String>,
    bucket_name: String,
}

impl ConfiguredOptions {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    pub fn access_key(&self) -> &str {
        &self.credentials.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.credentials.secret_key
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The bucket every bound client built from this entry operates on.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Returns `http[s]://endpoint[:port]`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.endpoint),
            None => format!("{scheme}://{}", self.endpoint),
        }
    }
}

/// The full configuration document for a [`ClientRegistry`](crate::ClientRegistry).
///
/// ```json
/// {
///   "default": { "endpoint": "s3.local", "port": 9000, "useTLS": false },
///   "clients": {
///     "photos": { "accessKey": "AK", "secretKey": "SK", "bucketName": "photos" },
///     "backups": { "accessKey": "AK2", "secretKey": "SK2", "bucketName": "backups" }
///   },
///   "defaultClientName": "photos"
/// }
/// ```
///
/// `client` is shorthand for an entry named `default`. Fields of `default`
/// are merged under every entry; fields set on the entry win.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientOptions>,
    pub clients: HashMap<String, ClientOptions>,
    pub default: ClientOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_client_name: Option<String>,
}

impl RegistryConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// A configuration holding one entry named `default`.
    pub fn single(options: ClientOptions) -> Self {
        RegistryConfig {
            client: Some(options),
            ..Default::default()
        }
    }

    /// Resolves every named entry with `default` merged underneath.
    ///
    /// An explicit entry named `default` in `clients` takes precedence over `client`.
    pub fn resolved_entries(&self) -> HashMap<String, ClientOptions> {
        let mut entries: HashMap<String, ClientOptions> = HashMap::new();
        if let Some(client) = &self.client {
            entries.insert(
                crate::registry::DEFAULT_CLIENT_NAME.to_string(),
                client.clone().merged_with(&self.default),
            );
        }
        for (name, options) in &self.clients {
            entries.insert(name.clone(), options.clone().merged_with(&self.default));
        }
        entries
    }
}
