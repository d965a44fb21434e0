// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parcel: in-memory binary transport for envelopes.
//!
//! # Wire format
//!
//! All integers little-endian, no alignment padding.
//!
//! ```text
//! string   := u32 byte_len, utf8 bytes
//! map      := u32 entry_count, { string key, value }*
//! value    := u8 tag, body
//! sequence := u32 count, value*
//! bundle   := string type_id, map
//! ```
//!
//! | Tag | Value | Body |
//! |-----|-------|------|
//! | 0 | Null | - |
//! | 1 | Bool | u8 (0/1) |
//! | 2..5 | I8, I16, I32, I64 | LE integer |
//! | 6..9 | U8, U16, U32, U64 | LE integer |
//! | 10, 11 | F32, F64 | IEEE-754 bits |
//! | 12 | Char | u32 scalar value |
//! | 13 | String | string |
//! | 14 | Bytes | u32 len, bytes |
//! | 15 | Sequence | sequence |
//! | 16 | Data | map |
//! | 17 | Bundle | bundle |

use super::cursor::{ByteReader, ByteWriter};
use super::{TransportRead, TransportWrite, WireError, WireResult};
use crate::config::WireLimits;
use crate::data::{InstanceData, InstanceValue};
use crate::TypeIdentifier;
use std::collections::BTreeMap;

/// Value tags.
mod tag {
    pub const NULL: u8 = 0;
    pub const BOOL: u8 = 1;
    pub const I8: u8 = 2;
    pub const I16: u8 = 3;
    pub const I32: u8 = 4;
    pub const I64: u8 = 5;
    pub const U8: u8 = 6;
    pub const U16: u8 = 7;
    pub const U32: u8 = 8;
    pub const U64: u8 = 9;
    pub const F32: u8 = 10;
    pub const F64: u8 = 11;
    pub const CHAR: u8 = 12;
    pub const STRING: u8 = 13;
    pub const BYTES: u8 = 14;
    pub const SEQUENCE: u8 = 15;
    pub const DATA: u8 = 16;
    pub const BUNDLE: u8 = 17;
}

fn len_u32(what: &'static str, len: usize) -> WireResult<u32> {
    u32::try_from(len).map_err(|_| WireError::LimitExceeded {
        what,
        len,
        max: u32::MAX as usize,
    })
}

// ===================================================================
// Writer
// ===================================================================

/// Parcel writer: accumulates envelopes into a byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ParcelWriter {
    out: ByteWriter,
}

impl ParcelWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: ByteWriter::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.out.as_bytes()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.out.into_bytes()
    }

    fn put_string(&mut self, s: &str) -> WireResult<()> {
        self.out.write_u32_le(len_u32("string length", s.len())?);
        self.out.write_bytes(s.as_bytes());
        Ok(())
    }

    fn put_map(&mut self, map: &InstanceData) -> WireResult<()> {
        self.out.write_u32_le(len_u32("map entries", map.len())?);
        for (key, value) in map.iter() {
            self.put_string(key)?;
            self.put_value(value)?;
        }
        Ok(())
    }

    // @audit-ok: Simple pattern matching - one arm per value tag
    fn put_value(&mut self, value: &InstanceValue) -> WireResult<()> {
        match value {
            InstanceValue::Null => self.out.write_u8(tag::NULL),
            InstanceValue::Bool(v) => {
                self.out.write_u8(tag::BOOL);
                self.out.write_u8(u8::from(*v));
            }
            InstanceValue::I8(v) => {
                self.out.write_u8(tag::I8);
                self.out.write_bytes(&v.to_le_bytes());
            }
            InstanceValue::I16(v) => {
                self.out.write_u8(tag::I16);
                self.out.write_i16_le(*v);
            }
            InstanceValue::I32(v) => {
                self.out.write_u8(tag::I32);
                self.out.write_i32_le(*v);
            }
            InstanceValue::I64(v) => {
                self.out.write_u8(tag::I64);
                self.out.write_i64_le(*v);
            }
            InstanceValue::U8(v) => {
                self.out.write_u8(tag::U8);
                self.out.write_u8(*v);
            }
            InstanceValue::U16(v) => {
                self.out.write_u8(tag::U16);
                self.out.write_u16_le(*v);
            }
            InstanceValue::U32(v) => {
                self.out.write_u8(tag::U32);
                self.out.write_u32_le(*v);
            }
            InstanceValue::U64(v) => {
                self.out.write_u8(tag::U64);
                self.out.write_u64_le(*v);
            }
            InstanceValue::F32(v) => {
                self.out.write_u8(tag::F32);
                self.out.write_f32_le(*v);
            }
            InstanceValue::F64(v) => {
                self.out.write_u8(tag::F64);
                self.out.write_f64_le(*v);
            }
            InstanceValue::Char(v) => {
                self.out.write_u8(tag::CHAR);
                self.out.write_u32_le(u32::from(*v));
            }
            InstanceValue::String(s) => {
                self.out.write_u8(tag::STRING);
                self.put_string(s)?;
            }
            InstanceValue::Bytes(b) => {
                self.out.write_u8(tag::BYTES);
                self.out.write_u32_le(len_u32("byte array length", b.len())?);
                self.out.write_bytes(b);
            }
            InstanceValue::Sequence(items) => {
                self.out.write_u8(tag::SEQUENCE);
                self.out
                    .write_u32_le(len_u32("sequence length", items.len())?);
                for item in items {
                    self.put_value(item)?;
                }
            }
            InstanceValue::Data(map) => {
                self.out.write_u8(tag::DATA);
                self.put_map(map)?;
            }
            InstanceValue::Bundle(type_id, map) => {
                self.out.write_u8(tag::BUNDLE);
                self.put_string(type_id.as_str())?;
                self.put_map(map)?;
            }
        }
        Ok(())
    }
}

impl TransportWrite for ParcelWriter {
    fn write_string(&mut self, s: &str) -> WireResult<()> {
        self.put_string(s)
    }

    fn write_map(&mut self, map: &InstanceData) -> WireResult<()> {
        self.put_map(map)
    }
}

// ===================================================================
// Reader
// ===================================================================

/// Parcel reader over a borrowed buffer.
///
/// Every length prefix is validated against [`WireLimits`] before it is
/// used, and nothing is allocated ahead of the data actually present.
#[derive(Debug, Clone)]
pub struct ParcelReader<'a> {
    input: ByteReader<'a>,
    limits: WireLimits,
}

impl<'a> ParcelReader<'a> {
    /// Reader with [`WireLimits::default`].
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_limits(bytes, WireLimits::default())
    }

    #[must_use]
    pub fn with_limits(bytes: &'a [u8], limits: WireLimits) -> Self {
        Self {
            input: ByteReader::new(bytes),
            limits,
        }
    }

    #[must_use]
    pub fn limits(&self) -> &WireLimits {
        &self.limits
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.input.offset()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.input.is_eof()
    }

    /// Fail if unread bytes remain.
    pub fn finish(&self) -> WireResult<()> {
        if self.input.is_eof() {
            Ok(())
        } else {
            Err(WireError::TrailingBytes {
                offset: self.input.offset(),
                remaining: self.input.remaining(),
            })
        }
    }

    fn check_limit(what: &'static str, len: usize, max: usize) -> WireResult<()> {
        if len > max {
            log::debug!("[parcel] {} {} exceeds limit {}", what, len, max);
            return Err(WireError::LimitExceeded { what, len, max });
        }
        Ok(())
    }

    fn take_len(&mut self, what: &'static str, max: usize) -> WireResult<usize> {
        let len = self.input.read_u32_le()? as usize;
        Self::check_limit(what, len, max)?;
        Ok(len)
    }

    fn take_string(&mut self) -> WireResult<String> {
        let len = self.take_len("string length", self.limits.max_string_len)?;
        let offset = self.input.offset();
        let bytes = self.input.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8 { offset })
    }

    fn take_map(&mut self, depth: usize) -> WireResult<InstanceData> {
        Self::check_limit("nesting depth", depth, self.limits.max_depth)?;
        let count = self.take_len("map entries", self.limits.max_entries)?;
        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let key_offset = self.input.offset();
            let key = self.take_string()?;
            let value = self.take_value(depth)?;
            if entries.contains_key(&key) {
                return Err(WireError::DuplicateKey {
                    offset: key_offset,
                    key,
                });
            }
            entries.insert(key, value);
        }
        Ok(entries.into_iter().collect())
    }

    // @audit-ok: Simple pattern matching - one arm per value tag
    fn take_value(&mut self, depth: usize) -> WireResult<InstanceValue> {
        let tag_offset = self.input.offset();
        let value = match self.input.read_u8()? {
            tag::NULL => InstanceValue::Null,
            tag::BOOL => match self.input.read_u8()? {
                0 => InstanceValue::Bool(false),
                1 => InstanceValue::Bool(true),
                other => {
                    return Err(WireError::InvalidTag {
                        offset: tag_offset + 1,
                        tag: other,
                    })
                }
            },
            tag::I8 => InstanceValue::I8(self.input.read_i8()?),
            tag::I16 => InstanceValue::I16(self.input.read_i16_le()?),
            tag::I32 => InstanceValue::I32(self.input.read_i32_le()?),
            tag::I64 => InstanceValue::I64(self.input.read_i64_le()?),
            tag::U8 => InstanceValue::U8(self.input.read_u8()?),
            tag::U16 => InstanceValue::U16(self.input.read_u16_le()?),
            tag::U32 => InstanceValue::U32(self.input.read_u32_le()?),
            tag::U64 => InstanceValue::U64(self.input.read_u64_le()?),
            tag::F32 => InstanceValue::F32(self.input.read_f32_le()?),
            tag::F64 => InstanceValue::F64(self.input.read_f64_le()?),
            tag::CHAR => {
                let offset = self.input.offset();
                let raw = self.input.read_u32_le()?;
                let c = char::from_u32(raw)
                    .ok_or(WireError::InvalidChar { offset, value: raw })?;
                InstanceValue::Char(c)
            }
            tag::STRING => InstanceValue::String(self.take_string()?),
            tag::BYTES => {
                let len = self.take_len("byte array length", self.limits.max_bytes_len)?;
                InstanceValue::Bytes(self.input.read_bytes(len)?.to_vec())
            }
            tag::SEQUENCE => {
                Self::check_limit("nesting depth", depth + 1, self.limits.max_depth)?;
                let count = self.take_len("sequence length", self.limits.max_entries)?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.take_value(depth + 1)?);
                }
                InstanceValue::Sequence(items)
            }
            tag::DATA => InstanceValue::Data(self.take_map(depth + 1)?),
            tag::BUNDLE => {
                let type_id = self.take_string()?;
                let map = self.take_map(depth + 1)?;
                InstanceValue::Bundle(TypeIdentifier::new(type_id), map)
            }
            other => {
                return Err(WireError::InvalidTag {
                    offset: tag_offset,
                    tag: other,
                })
            }
        };
        Ok(value)
    }
}

impl TransportRead for ParcelReader<'_> {
    fn read_string(&mut self) -> WireResult<String> {
        self.take_string()
    }

    fn read_map(&mut self) -> WireResult<InstanceData> {
        self.take_map(1)
    }
}
