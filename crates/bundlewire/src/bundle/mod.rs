// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bundleable capability contract.
//!
//! Every marshalable variant implements [`Bundleable`]: it can write its
//! state into an [`InstanceData`] and rebuild itself from one. Variants that
//! can be rebuilt by name also implement [`RawInstance`], which supplies the
//! bare instance the decoder rehydrates.
//!
//! Most types get both from `#[derive(Bundleable)]`:
//!
//! ```rust
//! use bundlewire::{Bundleable, InstanceData, RawInstance};
//!
//! #[derive(Debug, Bundleable, PartialEq)]
//! #[bundle(type_id = "Point")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut data = InstanceData::new();
//! Point { x: 3, y: 4 }.write_instance_data(&mut data).unwrap();
//!
//! let mut bare = Point::raw_instance();
//! bare.construct_from_instance_data(&data).unwrap();
//! assert_eq!(bare, Point { x: 3, y: 4 });
//! ```

mod error;

pub use error::BundleError;

use crate::data::InstanceData;
use std::any::Any;
use std::fmt;

/// Object-safe access to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Capability every marshalable variant implements.
pub trait Bundleable: AsAny + fmt::Debug + Send + Sync {
    /// Stable identifier written in front of the payload.
    ///
    /// Must match the identifier the variant is registered under on the
    /// receiving side.
    fn type_identifier(&self) -> &str;

    /// Write every field needed to rebuild equivalent state.
    ///
    /// Must not modify `self`.
    fn write_instance_data(&self, out: &mut InstanceData) -> Result<(), BundleError>;

    /// Fully initialize a bare instance from `data`.
    ///
    /// Called exactly once, right after the bare instance is produced and
    /// before it is handed to any caller. On error the instance is dropped.
    fn construct_from_instance_data(&mut self, data: &InstanceData) -> Result<(), BundleError>;
}

/// Producer of bare, default-valued instances.
///
/// `raw_instance` must not depend on constructor arguments: its only job is
/// to give [`Bundleable::construct_from_instance_data`] something to fill.
pub trait RawInstance: Bundleable + Sized {
    /// Identifier this type registers under.
    const TYPE_ID: &'static str;

    /// Bare instance, not yet usable until constructed from instance data.
    fn raw_instance() -> Self;
}

impl dyn Bundleable {
    /// True if the concrete variant is `T`.
    #[must_use]
    pub fn is<T: Bundleable>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Bundleable>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Bundleable>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(self).downcast_mut::<T>()
    }

    /// Take ownership of the concrete variant, or get the box back unchanged.
    pub fn downcast<T: Bundleable>(self: Box<Self>) -> Result<Box<T>, Box<dyn Bundleable>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let raw: *mut dyn Bundleable = Box::into_raw(self);
        // SAFETY: the concrete type behind the pointer was checked to be `T`.
        Ok(unsafe { Box::from_raw(raw.cast::<T>()) })
    }
}
