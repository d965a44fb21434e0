// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error, for callers that do not care which layer failed.

use crate::bundle::BundleError;
use crate::envelope::{DecodeError, EncodeError};
use crate::registry::RegistryError;
use crate::wire::WireError;
use std::fmt;

/// Any bundlewire failure.
#[derive(Debug)]
pub enum Error {
    // === Variant implementations ===
    Bundle(BundleError),

    // === Envelope ===
    Encode(EncodeError),
    Decode(DecodeError),

    // === Transport ===
    Wire(WireError),

    // === Registration ===
    Registry(RegistryError),
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bundle(e) => write!(f, "{}", e),
            Error::Encode(e) => write!(f, "{}", e),
            Error::Decode(e) => write!(f, "{}", e),
            Error::Wire(e) => write!(f, "{}", e),
            Error::Registry(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bundle(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Wire(e) => Some(e),
            Error::Registry(e) => Some(e),
        }
    }
}

impl From<BundleError> for Error {
    fn from(e: BundleError) -> Self {
        Error::Bundle(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Error::Wire(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}
