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

//! Per-operation bucket binding rules.
//!
//! Every operation of the [`StorageClient`](crate::StorageClient) surface is
//! classified exactly once, in the declaration table of
//! [`bound::operations`](crate::bound::operations). That declaration generates
//! the typed [`BoundClient`](crate::BoundClient) methods and the
//! [`OPERATIONS`] table used here for name based lookups.

use crate::bound::operations::OPERATIONS;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Where the bound bucket name goes in the argument list of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterceptionRule {
    /// The bucket is the first argument.
    BucketFirst,
    /// The bucket follows one leading argument (the HTTP method of `presigned_url`).
    AfterLeadingArgument,
    /// The operation is not bucket-scoped; arguments are forwarded unchanged.
    PassThrough,
}

impl fmt::Display for InterceptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptionRule::BucketFirst => write!(f, "bucket-first"),
            InterceptionRule::AfterLeadingArgument => write!(f, "bucket-after-leading-argument"),
            InterceptionRule::PassThrough => write!(f, "pass-through"),
        }
    }
}

static RULES: Lazy<HashMap<&'static str, InterceptionRule>> =
    Lazy::new(|| OPERATIONS.iter().copied().collect());

impl InterceptionRule {
    /// Looks up the rule of an operation. Unknown operations pass through.
    pub fn of(operation: &str) -> InterceptionRule {
        RULES
            .get(operation)
            .copied()
            .unwrap_or(InterceptionRule::PassThrough)
    }

    /// Position the bucket is inserted at, if any.
    pub fn bucket_position(&self) -> Option<usize> {
        match self {
            InterceptionRule::BucketFirst => Some(0),
            InterceptionRule::AfterLeadingArgument => Some(1),
            InterceptionRule::PassThrough => None,
        }
    }
}

/// Places `bucket` into `args` as required by `rule`.
///
/// For [`InterceptionRule::AfterLeadingArgument`] a missing leading argument
/// is represented by `null`, so the bucket always lands at index 1.
pub fn bind_arguments(rule: InterceptionRule, bucket: &str, mut args: Vec<Value>) -> Vec<Value> {
    match rule.bucket_position() {
        Some(position) => {
            while args.len() < position {
                args.push(Value::Null);
            }
            args.insert(position, Value::String(bucket.to_string()));
            args
        }
        None => args,
    }
}

/// Names of all operations the bucket is bound for.
pub fn bucket_scoped_operations() -> impl Iterator<Item = &'static str> {
    OPERATIONS
        .iter()
        .filter(|(_, rule)| *rule != InterceptionRule::PassThrough)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn table_has_no_duplicates() {
        let names: HashSet<&str> = OPERATIONS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), OPERATIONS.len());
    }

    #[test]
    fn presigned_url_is_the_only_special_position() {
        let special: Vec<&str> = OPERATIONS
            .iter()
            .filter(|(_, r)| *r == InterceptionRule::AfterLeadingArgument)
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(special, vec!["presigned_url"]);
    }

    #[test]
    fn classification() {
        for op in [
            "list_objects",
            "list_objects_v2",
            "list_incomplete_uploads",
            "get_object",
            "put_object",
            "fput_object",
            "stat_object",
            "set_bucket_policy",
            "presigned_get_object",
            "presigned_put_object",
            "listen_bucket_notification",
        ] {
            assert_eq!(InterceptionRule::of(op), InterceptionRule::BucketFirst, "{op}");
        }
        for op in ["list_buckets", "make_bucket", "bucket_exists", "copy_object"] {
            assert_eq!(InterceptionRule::of(op), InterceptionRule::PassThrough, "{op}");
        }
        assert_eq!(
            InterceptionRule::of("presigned_url"),
            InterceptionRule::AfterLeadingArgument
        );
        assert_eq!(
            InterceptionRule::of("no_such_operation"),
            InterceptionRule::PassThrough
        );
    }

    #[test]
    fn bind_bucket_first() {
        let args = bind_arguments(
            InterceptionRule::BucketFirst,
            "bucket1",
            vec![json!("a1"), json!(2)],
        );
        assert_eq!(args, vec![json!("bucket1"), json!("a1"), json!(2)]);

        let args = bind_arguments(InterceptionRule::BucketFirst, "bucket1", vec![]);
        assert_eq!(args, vec![json!("bucket1")]);
    }

    #[test]
    fn bind_after_leading_argument() {
        let args = bind_arguments(
            InterceptionRule::AfterLeadingArgument,
            "bucket1",
            vec![json!("GET"), json!("obj"), json!(60)],
        );
        assert_eq!(
            args,
            vec![json!("GET"), json!("bucket1"), json!("obj"), json!(60)]
        );

        let args = bind_arguments(InterceptionRule::AfterLeadingArgument, "bucket1", vec![]);
        assert_eq!(args, vec![Value::Null, json!("bucket1")]);
    }

    #[test]
    fn bind_pass_through() {
        let input = vec![json!("x"), json!(true)];
        assert_eq!(
            bind_arguments(InterceptionRule::PassThrough, "bucket1", input.clone()),
            input
        );
    }

    #[test]
    fn bucket_scoped_listing() {
        let scoped: HashSet<&str> = bucket_scoped_operations().collect();
        assert!(scoped.contains("get_bucket_versioning"));
        assert!(scoped.contains("presigned_url"));
        assert!(!scoped.contains("list_buckets"));
    }
}
