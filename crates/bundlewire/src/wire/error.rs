// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

/// Transport-level encode/decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Input ended before a complete value could be read.
    UnexpectedEof { offset: usize, needed: usize },
    /// Unknown value tag.
    InvalidTag { offset: usize, tag: u8 },
    /// String bytes are not valid UTF-8.
    InvalidUtf8 { offset: usize },
    /// `char` value is not a Unicode scalar value.
    InvalidChar { offset: usize, value: u32 },
    /// Same key appears twice in one map.
    DuplicateKey { offset: usize, key: String },
    /// A length, count or depth exceeds the configured limit.
    LimitExceeded {
        what: &'static str,
        len: usize,
        max: usize,
    },
    /// Bytes left over after the last expected value.
    TrailingBytes { offset: usize, remaining: usize },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { offset, needed } => write!(
                f,
                "unexpected end of buffer at offset {} (need {} more bytes)",
                offset, needed
            ),
            Self::InvalidTag { offset, tag } => {
                write!(f, "invalid value tag 0x{:02x} at offset {}", tag, offset)
            }
            Self::InvalidUtf8 { offset } => write!(f, "invalid UTF-8 string at offset {}", offset),
            Self::InvalidChar { offset, value } => {
                write!(f, "invalid char 0x{:x} at offset {}", value, offset)
            }
            Self::DuplicateKey { offset, key } => {
                write!(f, "duplicate key '{}' at offset {}", key, offset)
            }
            Self::LimitExceeded { what, len, max } => {
                write!(f, "{} {} exceeds limit {}", what, len, max)
            }
            Self::TrailingBytes { offset, remaining } => write!(
                f,
                "{} trailing bytes after offset {}",
                remaining, offset
            ),
        }
    }
}

impl std::error::Error for WireError {}

pub type WireResult<T> = core::result::Result<T, WireError>;
