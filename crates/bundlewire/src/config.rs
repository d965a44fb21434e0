// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! bundlewire configuration - single source of truth for limits and policies.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time constants (wire limits, identifier bounds)
//! - **Level 2 (Dynamic)**: [`WireLimits`] and [`RegistryConfig`] values passed
//!   to readers and registries at construction time
//!
//! # Example
//!
//! ```rust
//! use bundlewire::config::{DuplicatePolicy, RegistryConfig, WireLimits};
//!
//! let limits = WireLimits::default().with_max_depth(8);
//! assert_eq!(limits.max_depth, 8);
//!
//! let cfg = RegistryConfig::default().with_duplicate_policy(DuplicatePolicy::Reject);
//! assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Reject);
//! ```

// =======================================================================
// Static limits
// =======================================================================

/// Maximum length of a [`TypeIdentifier`](crate::TypeIdentifier), in bytes.
pub const MAX_TYPE_ID_LEN: usize = 1024;

/// Default nesting depth accepted by the parcel reader.
///
/// Depth counts nested maps, sequences and bundles. The envelope payload
/// itself sits at depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum number of entries in one map or sequence.
pub const DEFAULT_MAX_ENTRIES: usize = 65_536;

/// Default maximum string length (16 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Default maximum byte-array length (64 MiB).
pub const DEFAULT_MAX_BYTES_LEN: usize = 64 * 1024 * 1024;

// =======================================================================
// Wire limits
// =======================================================================

/// Bounds enforced while decoding parcels.
///
/// Every length read from the wire is checked against these values before
/// any allocation, so a corrupted length prefix fails fast with
/// [`WireError::LimitExceeded`](crate::wire::WireError::LimitExceeded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireLimits {
    /// Maximum nesting depth of maps, sequences and bundles.
    pub max_depth: usize,
    /// Maximum entry count of a single map or sequence.
    pub max_entries: usize,
    /// Maximum UTF-8 string length in bytes.
    pub max_string_len: usize,
    /// Maximum byte-array length.
    pub max_bytes_len: usize,
}

impl WireLimits {
    /// Limits that accept anything the format can express.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
            max_entries: usize::MAX,
            max_string_len: usize::MAX,
            max_bytes_len: usize::MAX,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    #[must_use]
    pub const fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    #[must_use]
    pub const fn with_max_bytes_len(mut self, max_bytes_len: usize) -> Self {
        self.max_bytes_len = max_bytes_len;
        self
    }
}

impl Default for WireLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_bytes_len: DEFAULT_MAX_BYTES_LEN,
        }
    }
}

// =======================================================================
// Registry configuration
// =======================================================================

/// What a [`FactoryRegistry`](crate::FactoryRegistry) does when an
/// identifier is registered a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the previous factory (last registration wins).
    #[default]
    Overwrite,
    /// Keep the previous factory and return
    /// [`RegistryError::Duplicate`](crate::registry::RegistryError::Duplicate).
    Reject,
}

/// Registry construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Behavior on double registration.
    pub duplicate_policy: DuplicatePolicy,
}

impl RegistryConfig {
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
