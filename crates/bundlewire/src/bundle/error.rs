// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors raised by bundleable implementations.

use crate::envelope::DecodeError;
use std::fmt;

/// Failure while a variant writes or rebuilds its instance data.
///
/// Keys are dotted paths (`"pose.position.x"`, `"items[2]"`) once the error
/// has bubbled through nested reads.
#[derive(Debug)]
pub enum BundleError {
    /// Required key absent from the instance data.
    MissingField(String),
    /// Key present but holding another value shape.
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Value has the right shape but is not acceptable to the variant.
    InvalidValue { key: String, reason: String },
    /// A nested polymorphic value failed to decode.
    Nested {
        key: String,
        source: Box<DecodeError>,
    },
}

impl BundleError {
    /// Shorthand for [`BundleError::InvalidValue`].
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the error key with the key of the enclosing field.
    #[must_use]
    pub fn at_key(self, outer: &str) -> Self {
        match self {
            Self::MissingField(key) => Self::MissingField(join_key(outer, &key)),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => Self::TypeMismatch {
                key: join_key(outer, &key),
                expected,
                found,
            },
            Self::InvalidValue { key, reason } => Self::InvalidValue {
                key: join_key(outer, &key),
                reason,
            },
            Self::Nested { key, source } => Self::Nested {
                key: join_key(outer, &key),
                source,
            },
        }
    }

    /// Key path the error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MissingField(key)
            | Self::TypeMismatch { key, .. }
            | Self::InvalidValue { key, .. }
            | Self::Nested { key, .. } => key,
        }
    }
}

fn join_key(outer: &str, inner: &str) -> String {
    if inner.is_empty() {
        outer.to_string()
    } else if outer.is_empty() {
        inner.to_string()
    } else if inner.starts_with('[') {
        format!("{}{}", outer, inner)
    } else {
        format!("{}.{}", outer, inner)
    }
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(key) => write!(f, "Missing field: {}", key),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch for '{}': expected {}, found {}",
                key, expected, found
            ),
            Self::InvalidValue { key, reason } => {
                write!(f, "Invalid value for '{}': {}", key, reason)
            }
            Self::Nested { key, source } => write!(f, "Nested bundle '{}': {}", key, source),
        }
    }
}

impl std::error::Error for BundleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Nested { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
