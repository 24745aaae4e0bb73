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

//! # MinIO service bindings (`minio-service`)
//!
//! This crate turns a set of named MinIO/S3 configuration entries into
//! ready-to-use clients that are bound to a single bucket.
//!
//! A [`BoundClient`] exposes the same operation surface as the underlying
//! [`StorageClient`], but every bucket-scoped operation receives the bucket
//! from the configuration instead of from the caller. Which operations are
//! bucket-scoped is decided by one declaration table (see [`interception`]).
//!
//! Listing operations are exposed both as streams and as single-shot
//! collections (`list_objects_async` and friends, see [`bound::drain`]).
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use minio_service::{ClientRegistry, RegistryConfig, StorageClient};
//!
//! # fn connect(_: &minio_service::ConfiguredOptions) -> Result<Arc<dyn StorageClient>, minio_service::Error> { unimplemented!() }
//! #[tokio::main]
//! async fn main() {
//!     let config = RegistryConfig::from_json_str(r#"{
//!         "client": {
//!             "endpoint": "s3.local",
//!             "accessKey": "AK",
//!             "secretKey": "SK",
//!             "bucketName": "bucket1"
//!         }
//!     }"#).unwrap();
//!
//!     let registry = ClientRegistry::new(config, connect).unwrap();
//!     let client = registry.default_client().unwrap();
//!
//!     let entries = client.list_objects_async("", true).await.unwrap();
//!     println!("{} objects in {}", entries.len(), client.bucket_name());
//! }
//! ```
//!
//! ## Design
//! - [`StorageClient`] is the capability surface of the wrapped storage library
//! - [`BoundClient`] composes `{ underlying client, bound bucket name }`
//! - [`ClientRegistry`] validates entries eagerly and connects lazily, one client per name

#![allow(clippy::too_many_arguments)]

pub mod bound;
pub mod client;
pub mod config;
pub mod error;
pub mod interception;
pub mod registry;
pub mod types;

pub use bound::BoundClient;
pub use client::{ByteStream, ListStream, StorageClient, UploadCallback};
pub use config::{ClientOptions, ConfiguredOptions, Credentials, RegistryConfig};
pub use error::{ConfigError, Error};
pub use interception::InterceptionRule;
pub use registry::{ClientRegistry, Connector, DEFAULT_CLIENT_NAME};

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
