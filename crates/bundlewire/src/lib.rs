// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # bundlewire - polymorphic marshaling across process boundaries
//!
//! Encode a value whose concrete variant is only known at runtime into a
//! self-describing envelope, and rebuild the same variant on the other side
//! of a channel that knows nothing about it in advance.
//!
//! ## Quick Start
//!
//! ```rust
//! use bundlewire::{Bundleable, Envelope, FactoryRegistry, ParcelReader, ParcelWriter, Result};
//!
//! #[derive(Debug, Bundleable, PartialEq)]
//! #[bundle(type_id = "Point")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! fn main() -> Result<()> {
//!     // Receiving side: declare which variants it can rebuild
//!     let registry = FactoryRegistry::new();
//!     registry.register::<Point>()?;
//!
//!     // Sending side: wrap and write
//!     let mut writer = ParcelWriter::new();
//!     Envelope::from_bundleable(Point { x: 3, y: 4 }).write_to(&mut writer)?;
//!
//!     // Receiving side: read, resolve, rehydrate
//!     let bytes = writer.into_bytes();
//!     let envelope = Envelope::read_from(&mut ParcelReader::new(&bytes), &registry)?;
//!     assert_eq!(
//!         envelope.bundleable().downcast_ref::<Point>(),
//!         Some(&Point { x: 3, y: 4 })
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                         Variant Layer                               |
//! |   Bundleable (write / construct) | RawInstance | #[derive]         |
//! +---------------------------------------------------------------------+
//! |                         Envelope Layer                              |
//! |   encode -> (type id, InstanceData) | decode -> resolve + construct |
//! +---------------------------------------------------------------------+
//! |                         Resolution Layer                            |
//! |   TypeResolver | FactoryRegistry (snapshot reads) | global()       |
//! +---------------------------------------------------------------------+
//! |                         Transport Layer                             |
//! |   TransportWrite / TransportRead | Parcel binary format            |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InstanceData`] | Keyed map of primitive and nested values |
//! | [`Bundleable`] | Capability to write / rebuild state |
//! | [`FactoryRegistry`] | Identifier -> bare instance producer |
//! | [`Envelope`] | Owns one polymorphic value in transit |
//! | [`ParcelWriter`] / [`ParcelReader`] | In-memory binary transport |
//!
//! ## Modules Overview
//!
//! - [`data`] - instance data and typed conversions
//! - [`bundle`] - the variant contract
//! - [`registry`] - type resolution
//! - [`envelope`] - encode / decode
//! - [`wire`] - transport traits and parcel codec
//! - [`config`] - limits and registry policy

// Lets `#[derive(Bundleable)]` expand to `::bundlewire::...` inside this crate.
extern crate self as bundlewire;

pub mod bundle;
pub mod config;
pub mod data;
pub mod envelope;
mod error;
pub mod registry;
mod type_id;
pub mod wire;

pub use bundle::{AsAny, BundleError, Bundleable, RawInstance};
pub use config::{DuplicatePolicy, RegistryConfig, WireLimits};
pub use data::{FromInstanceValue, InstanceData, InstanceValue, IntoInstanceValue};
pub use envelope::{
    decode, encode, from_parcel_bytes, to_parcel_bytes, DecodeError, EncodeError,
    EncodedEnvelope, Envelope, EnvelopeIter, Marshal,
};
pub use error::{Error, Result};
pub use registry::{FactoryRegistry, RegistryError, TypeResolver};
pub use type_id::TypeIdentifier;
pub use wire::{ParcelReader, ParcelWriter, TransportRead, TransportWrite, WireError};

/// Derive [`Bundleable`], [`RawInstance`] and nested-value conversions for a
/// struct with named fields.
pub use bundlewire_codegen::Bundleable;
