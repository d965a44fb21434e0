// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions between Rust values and [`InstanceValue`].
//!
//! Conversions are strict: an `i32` field only reads back from
//! [`InstanceValue::I32`]. Widening would hide writer/reader drift.

use crate::bundle::BundleError;
use crate::data::{InstanceData, InstanceValue};

/// Trait for converting to [`InstanceValue`].
pub trait IntoInstanceValue {
    fn into_instance_value(self) -> InstanceValue;
}

/// Trait for converting from [`InstanceValue`].
///
/// Errors are reported without a key; [`InstanceData::get_as`] attaches the
/// key path.
pub trait FromInstanceValue: Sized {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError>;
}

pub(crate) fn mismatch(expected: &'static str, found: &InstanceValue) -> BundleError {
    BundleError::TypeMismatch {
        key: String::new(),
        expected,
        found: found.kind_name(),
    }
}

macro_rules! impl_instance_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromInstanceValue for $ty {
            fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
                match value {
                    InstanceValue::$variant(v) => Ok(*v),
                    other => Err(mismatch($name, other)),
                }
            }
        }

        impl IntoInstanceValue for $ty {
            fn into_instance_value(self) -> InstanceValue {
                InstanceValue::$variant(self)
            }
        }

        impl From<$ty> for InstanceValue {
            fn from(v: $ty) -> Self {
                InstanceValue::$variant(v)
            }
        }
    };
}

impl_instance_value!(bool, Bool, "bool");
impl_instance_value!(i8, I8, "i8");
impl_instance_value!(i16, I16, "i16");
impl_instance_value!(i32, I32, "i32");
impl_instance_value!(i64, I64, "i64");
impl_instance_value!(u8, U8, "u8");
impl_instance_value!(u16, U16, "u16");
impl_instance_value!(u32, U32, "u32");
impl_instance_value!(u64, U64, "u64");
impl_instance_value!(f32, F32, "f32");
impl_instance_value!(f64, F64, "f64");
impl_instance_value!(char, Char, "char");

impl FromInstanceValue for String {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
        match value {
            InstanceValue::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl IntoInstanceValue for String {
    fn into_instance_value(self) -> InstanceValue {
        InstanceValue::String(self)
    }
}

impl IntoInstanceValue for &str {
    fn into_instance_value(self) -> InstanceValue {
        InstanceValue::String(self.to_string())
    }
}

impl From<String> for InstanceValue {
    fn from(v: String) -> Self {
        InstanceValue::String(v)
    }
}

impl From<&str> for InstanceValue {
    fn from(v: &str) -> Self {
        InstanceValue::String(v.to_string())
    }
}

impl FromInstanceValue for InstanceData {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
        match value {
            InstanceValue::Data(d) => Ok(d.clone()),
            other => Err(mismatch("data", other)),
        }
    }
}

impl IntoInstanceValue for InstanceData {
    fn into_instance_value(self) -> InstanceValue {
        InstanceValue::Data(self)
    }
}

impl From<InstanceData> for InstanceValue {
    fn from(v: InstanceData) -> Self {
        InstanceValue::Data(v)
    }
}

impl FromInstanceValue for InstanceValue {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
        Ok(value.clone())
    }
}

impl IntoInstanceValue for InstanceValue {
    fn into_instance_value(self) -> InstanceValue {
        self
    }
}

impl<T: FromInstanceValue> FromInstanceValue for Vec<T> {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
        match value {
            InstanceValue::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    T::from_instance_value(item).map_err(|e| e.at_key(&format!("[{}]", i)))
                })
                .collect(),
            other => Err(mismatch("sequence", other)),
        }
    }
}

impl<T: IntoInstanceValue> IntoInstanceValue for Vec<T> {
    fn into_instance_value(self) -> InstanceValue {
        InstanceValue::Sequence(self.into_iter().map(IntoInstanceValue::into_instance_value).collect())
    }
}

impl<T: FromInstanceValue> FromInstanceValue for Option<T> {
    fn from_instance_value(value: &InstanceValue) -> Result<Self, BundleError> {
        match value {
            InstanceValue::Null => Ok(None),
            other => T::from_instance_value(other).map(Some),
        }
    }
}

impl<T: IntoInstanceValue> IntoInstanceValue for Option<T> {
    fn into_instance_value(self) -> InstanceValue {
        match self {
            Some(v) => v.into_instance_value(),
            None => InstanceValue::Null,
        }
    }
}
