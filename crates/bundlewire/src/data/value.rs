// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance value types.

use crate::data::InstanceData;
use crate::TypeIdentifier;

/// A value stored under one key of an [`InstanceData`].
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceValue {
    // Special
    Null,

    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),

    // Composites
    Sequence(Vec<InstanceValue>),
    Data(InstanceData),
    /// Nested polymorphic value: identifier plus its own instance data.
    Bundle(TypeIdentifier, InstanceData),
}

impl InstanceValue {
    /// Short name of the stored shape, used in mismatch errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Sequence(_) => "sequence",
            Self::Data(_) => "data",
            Self::Bundle(..) => "bundle",
        }
    }

    /// Check if value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[InstanceValue]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    /// Nested map, for both plain data and bundle payloads.
    #[must_use]
    pub fn as_data(&self) -> Option<&InstanceData> {
        match self {
            Self::Data(d) | Self::Bundle(_, d) => Some(d),
            _ => None,
        }
    }

    /// Identifier of a nested bundle.
    #[must_use]
    pub fn bundle_type(&self) -> Option<&TypeIdentifier> {
        match self {
            Self::Bundle(id, _) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_accessors() {
        let v = InstanceValue::I32(42);
        assert_eq!(v.as_i32(), Some(42));
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.kind_name(), "i32");

        let v = InstanceValue::String("hello".into());
        assert_eq!(v.as_str(), Some("hello"));
        assert!(!v.is_null());
        assert!(InstanceValue::Null.is_null());
    }

    #[test]
    fn test_bundle_value() {
        let mut inner = InstanceData::new();
        inner.put("r", 5i32);
        let v = InstanceValue::Bundle(TypeIdentifier::from_static("Circle"), inner);
        assert_eq!(v.bundle_type().map(TypeIdentifier::as_str), Some("Circle"));
        assert_eq!(v.as_data().and_then(|d| d.get("r")), Some(&InstanceValue::I32(5)));
        assert_eq!(v.kind_name(), "bundle");
    }
}
