// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factory registry: type identifier -> raw instance producer.

use super::{RegistryError, TypeResolver};
use crate::bundle::{Bundleable, RawInstance};
use crate::config::{DuplicatePolicy, RegistryConfig};
use crate::envelope::DecodeError;
use crate::TypeIdentifier;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared raw-instance producer.
///
/// Returns a bare instance or a human-readable construction failure.
pub type RawFactory = Arc<dyn Fn() -> Result<Box<dyn Bundleable>, String> + Send + Sync>;

type FactoryMap = HashMap<TypeIdentifier, RawFactory>;

/// Registry of raw-instance factories keyed by [`TypeIdentifier`].
///
/// # Concurrency
///
/// - **Reads** (`resolve`, `contains`, ...): one atomic load of an immutable
///   snapshot (`ArcSwap`), never blocked by writers
/// - **Writes** (`register*`, `clear`): serialized on a mutex, copy the
///   current snapshot, then publish the new one atomically
///
/// Registration is expected at startup, but registering lazily while other
/// threads decode is safe.
///
/// # Example
///
/// ```rust
/// use bundlewire::{Bundleable, FactoryRegistry, TypeResolver};
///
/// #[derive(Debug, Bundleable)]
/// #[bundle(type_id = "Point")]
/// struct Point { x: i32, y: i32 }
///
/// let registry = FactoryRegistry::new();
/// registry.register::<Point>().unwrap();
///
/// let bare = registry.resolve("Point").unwrap();
/// assert_eq!(bare.type_identifier(), "Point");
/// assert!(registry.resolve("Circle").is_err());
/// ```
pub struct FactoryRegistry {
    config: RegistryConfig,
    snapshot: ArcSwap<FactoryMap>,
    write_lock: Mutex<()>,
}

impl FactoryRegistry {
    /// Empty registry with the default configuration (last registration wins).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            snapshot: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register `T` under [`RawInstance::TYPE_ID`] using
    /// [`RawInstance::raw_instance`].
    pub fn register<T: RawInstance>(&self) -> Result<(), RegistryError> {
        self.register_factory(T::TYPE_ID, T::raw_instance)
    }

    /// Register an infallible factory under `type_id`.
    pub fn register_factory<B, F>(
        &self,
        type_id: impl Into<TypeIdentifier>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        B: Bundleable,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.insert(
            type_id.into(),
            Arc::new(move || Ok(Box::new(factory()) as Box<dyn Bundleable>)),
        )
    }

    /// Register a factory that may refuse to produce an instance.
    ///
    /// A failure surfaces from decoding as
    /// [`DecodeError::ConstructionFailure`].
    pub fn register_fallible<B, E, F>(
        &self,
        type_id: impl Into<TypeIdentifier>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        B: Bundleable,
        E: fmt::Display,
        F: Fn() -> Result<B, E> + Send + Sync + 'static,
    {
        self.insert(
            type_id.into(),
            Arc::new(move || {
                factory()
                    .map(|b| Box::new(b) as Box<dyn Bundleable>)
                    .map_err(|e| e.to_string())
            }),
        )
    }

    /// Register a pre-built [`RawFactory`].
    pub fn register_raw(
        &self,
        type_id: impl Into<TypeIdentifier>,
        factory: RawFactory,
    ) -> Result<(), RegistryError> {
        self.insert(type_id.into(), factory)
    }

    fn insert(&self, type_id: TypeIdentifier, factory: RawFactory) -> Result<(), RegistryError> {
        type_id
            .validate()
            .map_err(|reason| RegistryError::InvalidIdentifier {
                type_id: type_id.clone(),
                reason,
            })?;

        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();

        if current.contains_key(&type_id) {
            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    log::debug!(
                        "[registry] rejected duplicate registration of '{}'",
                        type_id
                    );
                    return Err(RegistryError::Duplicate(type_id));
                }
                DuplicatePolicy::Overwrite => {
                    log::warn!(
                        "[registry] '{}' registered twice, previous factory replaced",
                        type_id
                    );
                }
            }
        }

        let mut next = FactoryMap::clone(&current);
        log::debug!("[registry] registered '{}'", type_id);
        next.insert(type_id, factory);
        self.snapshot.store(Arc::new(next));
        Ok(())
    }

    /// Factory registered under `type_id`, if any.
    #[must_use]
    pub fn factory(&self, type_id: &str) -> Option<RawFactory> {
        self.snapshot.load().get(type_id).cloned()
    }

    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.snapshot.load().contains_key(type_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn type_identifiers(&self) -> Vec<TypeIdentifier> {
        let mut ids: Vec<_> = self.snapshot.load().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every registration.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.snapshot.store(Arc::new(HashMap::new()));
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("config", &self.config)
            .field("types", &self.type_identifiers())
            .finish()
    }
}

impl TypeResolver for FactoryRegistry {
    fn resolve(&self, type_id: &str) -> Result<Box<dyn Bundleable>, DecodeError> {
        // Clone the factory out so the snapshot guard is not held while user
        // code runs.
        let factory = self
            .factory(type_id)
            .ok_or_else(|| DecodeError::UnknownType(TypeIdentifier::new(type_id)))?;

        let instance = factory().map_err(|reason| DecodeError::ConstructionFailure {
            type_id: TypeIdentifier::new(type_id),
            reason,
        })?;

        if instance.type_identifier() != type_id {
            return Err(DecodeError::ConstructionFailure {
                type_id: TypeIdentifier::new(type_id),
                reason: format!(
                    "factory produced an instance of '{}'",
                    instance.type_identifier()
                ),
            });
        }
        Ok(instance)
    }
}
