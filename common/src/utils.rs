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
use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};

pub fn rand_bucket_name() -> String {
    Alphanumeric
        .sample_string(&mut rand::rng(), 8)
        .to_lowercase()
}

pub fn rand_object_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}

/// Random object names below `prefix`, sorted.
pub fn rand_object_names(prefix: &str, n: usize) -> Vec<String> {
    let mut names: Vec<String> = (0..n)
        .map(|_| format!("{prefix}{}", rand_object_name()))
        .collect();
    names.sort();
    names.dedup();
    names
}

pub fn rand_data(size: usize) -> Bytes {
    let mut buf = vec![0u8; size];
    rand::rng().fill(&mut buf[..]);
    Bytes::from(buf)
}
