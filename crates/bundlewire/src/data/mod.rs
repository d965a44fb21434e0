// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance data for bundleable variants
//!
//! Heterogeneous key/value maps carrying the state a variant needs to
//! rebuild itself on the far side of the boundary.
//!
//! # Example
//!
//! ```rust
//! use bundlewire::data::InstanceData;
//!
//! let mut data = InstanceData::new();
//! data.put("sensor_id", 42u32);
//! data.put("temperature", 23.5f64);
//! data.put("location", "Building A");
//!
//! let temp: f64 = data.get_as("temperature").unwrap();
//! assert_eq!(temp, 23.5);
//! assert!(data.get_as::<u32>("missing").is_err());
//! ```

pub(crate) mod convert;
mod instance_data;
mod value;

pub use convert::{FromInstanceValue, IntoInstanceValue};
pub use instance_data::InstanceData;
pub use value::InstanceValue;
