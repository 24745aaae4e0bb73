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

//! Error definitions for configuration, lookup and delegated operations

use thiserror::Error;

/// Boxed error produced by an underlying storage client.
pub type BoxedStorageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Problems found while loading or validating a client configuration entry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("must set `endpoint` in minio's config")]
    MissingEndpoint,

    #[error("must set `accessKey` and `secretKey` in minio's config")]
    MissingCredentials,

    #[error("must set `bucketName` in minio's config")]
    MissingBucket,

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("unable to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unable to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Error definitions
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configuration entry failed validation; nothing was connected for it.
    #[error("invalid configuration for minio instance '{name}': {source}")]
    InvalidClient {
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error("minio instance '{0}' not found")]
    InstanceNotFound(String),

    #[error("minio instance '{0}' already exists")]
    DuplicateInstance(String),

    #[error("operation `{0}` is not supported by the storage client")]
    UnsupportedOperation(String),

    #[error("`{0}` dropped its completion callback without calling it")]
    CallbackDropped(&'static str),

    /// Failure reported by the underlying storage client, passed through as is.
    #[error(transparent)]
    Storage(BoxedStorageError),
}

impl Error {
    /// Wraps an error raised by an underlying storage client.
    pub fn storage<E: Into<BoxedStorageError>>(err: E) -> Self {
        Error::Storage(err.into())
    }

    /// Returns the underlying storage error, if this is one.
    pub fn as_storage(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Storage(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
