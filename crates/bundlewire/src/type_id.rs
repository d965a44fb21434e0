// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stable type identifiers carried in front of every envelope payload.
//!
//! An identifier is chosen by the author of a variant (see
//! [`RawInstance::TYPE_ID`](crate::RawInstance::TYPE_ID)) and must be the same
//! on both sides of the boundary. It is deliberately decoupled from the Rust
//! type path, which changes with refactors.

use crate::config::MAX_TYPE_ID_LEN;
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Name of a marshalable variant on the wire.
///
/// Static identifiers (the common case) are stored without allocating.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentifier(Cow<'static, str>);

impl TypeIdentifier {
    /// Identifier backed by a `'static` string (no allocation).
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Identifier from an owned or borrowed string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the identifier is usable as a registry key.
    ///
    /// Empty identifiers and identifiers longer than [`MAX_TYPE_ID_LEN`]
    /// bytes are rejected. Nothing else is validated: the tag is trusted.
    pub fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("type identifier is empty".into());
        }
        if self.0.len() > MAX_TYPE_ID_LEN {
            return Err(format!(
                "type identifier is {} bytes long (max {})",
                self.0.len(),
                MAX_TYPE_ID_LEN
            ));
        }
        Ok(())
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TypeIdentifier {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for TypeIdentifier {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl PartialEq<str> for TypeIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_static_and_owned_compare_equal() {
        let a = TypeIdentifier::from_static("Point");
        let b = TypeIdentifier::new(String::from("Point"));
        assert_eq!(a, b);
        assert_eq!(a, "Point");
        assert_eq!(b.to_string(), "Point");
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(TypeIdentifier::from_static("Point"), 1);
        assert_eq!(map.get("Point"), Some(&1));
        assert_eq!(map.get("Circle"), None);
    }

    #[test]
    fn test_validate() {
        assert!(TypeIdentifier::from_static("Point").validate().is_ok());
        assert!(TypeIdentifier::from_static("").validate().is_err());
        let long = TypeIdentifier::new("x".repeat(MAX_TYPE_ID_LEN + 1));
        assert!(long.validate().is_err());
    }
}
