// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode / decode errors.

use crate::bundle::BundleError;
use crate::wire::WireError;
use crate::TypeIdentifier;
use std::fmt;

/// Failure while rebuilding a variant from an envelope.
#[derive(Debug)]
pub enum DecodeError {
    /// No producer registered for the identifier.
    UnknownType(TypeIdentifier),
    /// The variant rejected the instance data.
    MalformedPayload {
        type_id: TypeIdentifier,
        source: BundleError,
    },
    /// The producer failed, or produced a different variant.
    ConstructionFailure {
        type_id: TypeIdentifier,
        reason: String,
    },
    /// Decoded fine, but not into the variant the caller asked for.
    UnexpectedType {
        expected: &'static str,
        found: TypeIdentifier,
    },
    /// Transport could not deliver the identifier or the map.
    Wire(WireError),
}

impl DecodeError {
    /// Identifier the failure refers to, when one was read.
    #[must_use]
    pub fn type_id(&self) -> Option<&TypeIdentifier> {
        match self {
            Self::UnknownType(type_id)
            | Self::MalformedPayload { type_id, .. }
            | Self::ConstructionFailure { type_id, .. }
            | Self::UnexpectedType { found: type_id, .. } => Some(type_id),
            Self::Wire(_) => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(id) => write!(f, "Unknown type: {}", id),
            Self::MalformedPayload { type_id, source } => {
                write!(f, "Malformed payload for '{}': {}", type_id, source)
            }
            Self::ConstructionFailure { type_id, reason } => {
                write!(f, "Cannot construct '{}': {}", type_id, reason)
            }
            Self::UnexpectedType { expected, found } => {
                write!(f, "Unexpected type: expected {}, found '{}'", expected, found)
            }
            Self::Wire(e) => write!(f, "Wire error: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedPayload { source, .. } => Some(source),
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WireError> for DecodeError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

/// Failure while capturing a variant into an envelope.
#[derive(Debug)]
pub enum EncodeError {
    /// `write_instance_data` failed.
    Bundle {
        type_id: TypeIdentifier,
        source: BundleError,
    },
    Wire(WireError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundle { type_id, source } => {
                write!(f, "Cannot encode '{}': {}", type_id, source)
            }
            Self::Wire(e) => write!(f, "Wire error: {}", e),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bundle { source, .. } => Some(source),
            Self::Wire(e) => Some(e),
        }
    }
}

impl From<WireError> for EncodeError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::UnknownType(TypeIdentifier::from_static("Circle"));
        assert_eq!(err.to_string(), "Unknown type: Circle");

        let err = DecodeError::MalformedPayload {
            type_id: TypeIdentifier::from_static("Point"),
            source: BundleError::MissingField("y".into()),
        };
        assert_eq!(
            err.to_string(),
            "Malformed payload for 'Point': Missing field: y"
        );
        assert_eq!(err.type_id().map(|id| id.as_str()), Some("Point"));
    }

    #[test]
    fn test_wire_error_has_no_type_id() {
        let err = DecodeError::from(WireError::UnexpectedEof {
            offset: 4,
            needed: 2,
        });
        assert!(err.type_id().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}
