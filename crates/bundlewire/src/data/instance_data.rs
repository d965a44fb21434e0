// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InstanceData container carrying a variant's serialized state.

use crate::bundle::{BundleError, Bundleable};
use crate::data::{FromInstanceValue, InstanceValue, IntoInstanceValue};
use crate::envelope::{self, EncodeError};
use crate::registry::{self, TypeResolver};
use std::collections::btree_map::{self, BTreeMap};

/// Heterogeneous key/value map written by
/// [`Bundleable::write_instance_data`] and read back by
/// [`Bundleable::construct_from_instance_data`].
///
/// Keys are kept sorted so two equal maps always encode to the same bytes.
/// Writing a key twice keeps the last value.
///
/// Reads of absent keys through [`get_as`](Self::get_as) or
/// [`require`](Self::require) fail with [`BundleError::MissingField`];
/// nothing is silently defaulted unless the caller asks for it with
/// [`get_or`](Self::get_or).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceData {
    entries: BTreeMap<String, InstanceValue>,
}

impl InstanceData {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl IntoInstanceValue,
    ) -> Option<InstanceValue> {
        self.entries.insert(key.into(), value.into_instance_value())
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&InstanceValue> {
        self.entries.get(key)
    }

    /// Raw value stored under `key`, or [`BundleError::MissingField`].
    pub fn require(&self, key: &str) -> Result<&InstanceValue, BundleError> {
        self.entries
            .get(key)
            .ok_or_else(|| BundleError::MissingField(key.to_string()))
    }

    /// Typed read of a required field.
    ///
    /// # Errors
    ///
    /// [`BundleError::MissingField`] if absent, [`BundleError::TypeMismatch`]
    /// if the stored value has another shape.
    pub fn get_as<T: FromInstanceValue>(&self, key: &str) -> Result<T, BundleError> {
        let value = self.require(key)?;
        T::from_instance_value(value).map_err(|e| e.at_key(key))
    }

    /// Typed read of an optional field: absent yields `default`, a present
    /// value of the wrong shape is still an error.
    pub fn get_or<T: FromInstanceValue>(&self, key: &str, default: T) -> Result<T, BundleError> {
        match self.entries.get(key) {
            Some(value) => T::from_instance_value(value).map_err(|e| e.at_key(key)),
            None => Ok(default),
        }
    }

    /// Store a byte array (encoded compactly, unlike `Vec<u8>` which is a
    /// sequence of `u8` values).
    pub fn put_bytes(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(key.into(), InstanceValue::Bytes(bytes.into()));
    }

    /// Byte array stored with [`put_bytes`](Self::put_bytes).
    pub fn get_bytes(&self, key: &str) -> Result<&[u8], BundleError> {
        let value = self.require(key)?;
        value
            .as_bytes()
            .ok_or_else(|| crate::data::convert::mismatch("bytes", value).at_key(key))
    }

    /// Store another bundleable under `key`, keeping its identifier so the
    /// reader can rebuild the right variant.
    pub fn put_bundle(
        &mut self,
        key: impl Into<String>,
        bundle: &dyn Bundleable,
    ) -> Result<(), BundleError> {
        let key = key.into();
        let encoded = envelope::encode(bundle).map_err(|e| match e {
            EncodeError::Bundle { source, .. } => source.at_key(&key),
            other => BundleError::InvalidValue {
                key: key.clone(),
                reason: other.to_string(),
            },
        })?;
        let (type_id, data) = encoded.into_parts();
        self.entries
            .insert(key, InstanceValue::Bundle(type_id, data));
        Ok(())
    }

    /// Rebuild a nested bundle through the resolver of the enclosing
    /// [`envelope::decode`], or the process-wide registry when called
    /// outside one.
    pub fn get_bundle(&self, key: &str) -> Result<Box<dyn Bundleable>, BundleError> {
        registry::with_current(|resolver| self.get_bundle_with(key, resolver))
    }

    /// Rebuild a nested bundle through `resolver`.
    ///
    /// # Errors
    ///
    /// [`BundleError::Nested`] wraps any decode failure of the nested value.
    pub fn get_bundle_with(
        &self,
        key: &str,
        resolver: &dyn TypeResolver,
    ) -> Result<Box<dyn Bundleable>, BundleError> {
        match self.require(key)? {
            InstanceValue::Bundle(type_id, data) => envelope::decode(resolver, type_id.as_str(), data)
                .map_err(|e| BundleError::Nested {
                    key: key.to_string(),
                    source: Box::new(e),
                }),
            other => Err(crate::data::convert::mismatch("bundle", other).at_key(key)),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<InstanceValue> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, InstanceValue)> for InstanceData {
    fn from_iter<I: IntoIterator<Item = (K, InstanceValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for InstanceData {
    type Item = (String, InstanceValue);
    type IntoIter = btree_map::IntoIter<String, InstanceValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstanceData {
    type Item = (&'a String, &'a InstanceValue);
    type IntoIter = btree_map::Iter<'a, String, InstanceValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
