// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type resolution for the decode path.
//!
//! A [`TypeResolver`] turns a [`TypeIdentifier`] into a bare instance the
//! envelope can rehydrate. [`FactoryRegistry`] is the provided resolver: an
//! explicit map from identifier to raw-instance factory, populated at
//! startup. Nothing is discovered by reflection, so a variant is only
//! decodable if its author registered it.

mod factory;
mod scope;

pub use factory::{FactoryRegistry, RawFactory};
pub(crate) use scope::{with_current, with_resolver};

use crate::bundle::{Bundleable, RawInstance};
use crate::envelope::DecodeError;
use crate::TypeIdentifier;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Produces bare instances by identifier.
pub trait TypeResolver: Send + Sync {
    /// Bare instance of the variant named `type_id`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownType`] if nothing is registered under
    /// `type_id`, [`DecodeError::ConstructionFailure`] if the producer fails.
    /// Each call returns a new, independent instance.
    fn resolve(&self, type_id: &str) -> Result<Box<dyn Bundleable>, DecodeError>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolve(&self, type_id: &str) -> Result<Box<dyn Bundleable>, DecodeError> {
        (**self).resolve(type_id)
    }
}

impl<R: TypeResolver + ?Sized> TypeResolver for Arc<R> {
    fn resolve(&self, type_id: &str) -> Result<Box<dyn Bundleable>, DecodeError> {
        (**self).resolve(type_id)
    }
}

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Identifier already registered and the registry rejects duplicates.
    Duplicate(TypeIdentifier),
    /// Identifier is empty or too long.
    InvalidIdentifier {
        type_id: TypeIdentifier,
        reason: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(id) => write!(f, "Type '{}' is already registered", id),
            Self::InvalidIdentifier { type_id, reason } => {
                write!(f, "Invalid type identifier '{}': {}", type_id, reason)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

static GLOBAL_REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Process-wide registry (created on first use, last registration wins).
pub fn global() -> &'static FactoryRegistry {
    GLOBAL_REGISTRY.get_or_init(FactoryRegistry::new)
}

/// Register `T` in the process-wide registry.
pub fn register_global<T: RawInstance>() -> Result<(), RegistryError> {
    global().register::<T>()
}
