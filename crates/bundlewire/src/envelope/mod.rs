// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing envelope: type identifier + instance data.
//!
//! ```text
//!   encode:  variant --type_identifier()------> id  --write_string--> wire
//!                    --write_instance_data()--> map --write_map-----> wire
//!
//!   decode:  wire --read_string--> id  --resolve()--> bare instance
//!            wire --read_map-----> map --construct_from_instance_data()
//! ```
//!
//! Both halves are read before resolution, so an unknown or malformed
//! envelope never leaves the stream in the middle of a value.

mod error;
#[cfg(test)]
mod tests;

pub use error::{DecodeError, EncodeError};

use crate::bundle::Bundleable;
use crate::data::InstanceData;
use crate::registry::{self, TypeResolver};
use crate::wire::{ParcelReader, ParcelWriter, TransportRead, TransportWrite, WireResult};
use crate::TypeIdentifier;

// ===================================================================
// Encode / decode
// ===================================================================

/// Identifier and instance data captured from a variant, not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedEnvelope {
    type_id: TypeIdentifier,
    data: InstanceData,
}

impl EncodedEnvelope {
    #[must_use]
    pub fn new(type_id: impl Into<TypeIdentifier>, data: InstanceData) -> Self {
        Self {
            type_id: type_id.into(),
            data,
        }
    }

    #[must_use]
    pub fn type_identifier(&self) -> &str {
        self.type_id.as_str()
    }

    #[must_use]
    pub fn data(&self) -> &InstanceData {
        &self.data
    }

    #[must_use]
    pub fn into_parts(self) -> (TypeIdentifier, InstanceData) {
        (self.type_id, self.data)
    }

    /// Write the identifier, then the map.
    pub fn write_to<W: TransportWrite + ?Sized>(&self, out: &mut W) -> WireResult<()> {
        out.write_string(self.type_id.as_str())?;
        out.write_map(&self.data)
    }

    /// Read one envelope without resolving it.
    pub fn read_from<R: TransportRead + ?Sized>(input: &mut R) -> WireResult<Self> {
        let type_id = input.read_string()?;
        let data = input.read_map()?;
        Ok(Self::new(type_id, data))
    }

    /// Resolve and rehydrate the captured variant.
    pub fn decode(&self, resolver: &dyn TypeResolver) -> Result<Box<dyn Bundleable>, DecodeError> {
        decode(resolver, self.type_id.as_str(), &self.data)
    }

    /// Write `envelopes` back to back.
    pub fn write_all<'e, W: TransportWrite + ?Sized>(
        envelopes: impl IntoIterator<Item = &'e EncodedEnvelope>,
        out: &mut W,
    ) -> WireResult<()> {
        envelopes
            .into_iter()
            .try_for_each(|envelope| envelope.write_to(out))
    }

    /// Envelopes remaining in `reader`, read lazily until end of input.
    pub fn read_iter<'r, 'a>(reader: &'r mut ParcelReader<'a>) -> EnvelopeIter<'r, 'a> {
        EnvelopeIter {
            reader,
            failed: false,
        }
    }

    /// Every envelope remaining in `reader`.
    pub fn read_all(reader: &mut ParcelReader<'_>) -> WireResult<Vec<EncodedEnvelope>> {
        Self::read_iter(reader).collect()
    }
}

/// Iterator returned by [`EncodedEnvelope::read_iter`].
///
/// After the first error it yields nothing more, since the reader is no
/// longer at an envelope boundary.
#[derive(Debug)]
pub struct EnvelopeIter<'r, 'a> {
    reader: &'r mut ParcelReader<'a>,
    failed: bool,
}

impl EnvelopeIter<'_, '_> {
    /// Offset of the next envelope.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }
}

impl Iterator for EnvelopeIter<'_, '_> {
    type Item = WireResult<EncodedEnvelope>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_eof() {
            return None;
        }
        let next = EncodedEnvelope::read_from(&mut *self.reader);
        self.failed = next.is_err();
        Some(next)
    }
}

/// Capture a variant's identifier and state.
///
/// # Errors
///
/// [`EncodeError::Bundle`] if the variant fails to write its instance data.
pub fn encode(bundle: &dyn Bundleable) -> Result<EncodedEnvelope, EncodeError> {
    let type_id = TypeIdentifier::new(bundle.type_identifier());
    let mut data = InstanceData::new();
    if let Err(source) = bundle.write_instance_data(&mut data) {
        log::debug!("[envelope] encode of '{}' failed: {}", type_id, source);
        return Err(EncodeError::Bundle { type_id, source });
    }
    log::trace!("[envelope] encoded '{}' ({} entries)", type_id, data.len());
    Ok(EncodedEnvelope { type_id, data })
}

/// Rebuild the variant named `type_id` from `data`.
///
/// The bare instance obtained from `resolver` is constructed exactly once;
/// if construction fails it is dropped and never reaches the caller.
/// While it is constructed, `resolver` is also the one nested bundles read
/// through [`InstanceData::get_bundle`] resolve against.
///
/// # Errors
///
/// - [`DecodeError::UnknownType`] / [`DecodeError::ConstructionFailure`]
///   from the resolver
/// - [`DecodeError::MalformedPayload`] if the variant rejects `data`
pub fn decode(
    resolver: &dyn TypeResolver,
    type_id: &str,
    data: &InstanceData,
) -> Result<Box<dyn Bundleable>, DecodeError> {
    let mut instance = resolver.resolve(type_id).map_err(|e| {
        log::debug!("[envelope] cannot resolve '{}': {}", type_id, e);
        e
    })?;

    let constructed =
        registry::with_resolver(resolver, || instance.construct_from_instance_data(data));
    if let Err(source) = constructed {
        log::debug!("[envelope] '{}' rejected its payload: {}", type_id, source);
        return Err(DecodeError::MalformedPayload {
            type_id: TypeIdentifier::new(type_id),
            source,
        });
    }

    log::trace!("[envelope] decoded '{}' ({} entries)", type_id, data.len());
    Ok(instance)
}

// ===================================================================
// Wrapping form
// ===================================================================

/// Owns one polymorphic value on its way across a boundary.
#[derive(Debug)]
pub struct Envelope {
    inner: Box<dyn Bundleable>,
}

impl Envelope {
    #[must_use]
    pub fn new(inner: Box<dyn Bundleable>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn from_bundleable<T: Bundleable>(value: T) -> Self {
        Self::new(Box::new(value))
    }

    #[must_use]
    pub fn bundleable(&self) -> &dyn Bundleable {
        self.inner.as_ref()
    }

    pub fn bundleable_mut(&mut self) -> &mut dyn Bundleable {
        self.inner.as_mut()
    }

    #[must_use]
    pub fn into_inner(self) -> Box<dyn Bundleable> {
        self.inner
    }

    #[must_use]
    pub fn type_identifier(&self) -> &str {
        self.inner.type_identifier()
    }

    /// Write `write_string(id)` then `write_map(data)`.
    pub fn write_to<W: TransportWrite + ?Sized>(&self, out: &mut W) -> Result<(), EncodeError> {
        encode(self.inner.as_ref())?.write_to(out)?;
        Ok(())
    }

    /// Read one envelope and rebuild its variant through `resolver`.
    ///
    /// The identifier and the map are both consumed before resolution: on
    /// any [`DecodeError`] other than [`DecodeError::Wire`], `input` is
    /// positioned right after this envelope.
    pub fn read_from<R: TransportRead + ?Sized>(
        input: &mut R,
        resolver: &dyn TypeResolver,
    ) -> Result<Self, DecodeError> {
        let encoded = EncodedEnvelope::read_from(input)?;
        encoded.decode(resolver).map(Self::new)
    }

    /// Write `envelopes` back to back, in order.
    ///
    /// Each envelope is encoded before any of its bytes are written, so a
    /// variant that fails to encode leaves the earlier ones intact.
    pub fn write_all<W: TransportWrite + ?Sized>(
        envelopes: &[Envelope],
        out: &mut W,
    ) -> Result<(), EncodeError> {
        envelopes.iter().try_for_each(|envelope| envelope.write_to(out))
    }

    /// Read and rebuild every envelope remaining in `reader`.
    ///
    /// # Errors
    ///
    /// The first failure, wire or decode. Earlier envelopes are dropped.
    pub fn read_all(
        reader: &mut ParcelReader<'_>,
        resolver: &dyn TypeResolver,
    ) -> Result<Vec<Envelope>, DecodeError> {
        let mut envelopes = Vec::new();
        for encoded in EncodedEnvelope::read_iter(reader) {
            envelopes.push(Self::new(encoded?.decode(resolver)?));
        }
        log::trace!("[envelope] read {} envelope(s)", envelopes.len());
        Ok(envelopes)
    }
}

// ===================================================================
// Directly-marshalable form
// ===================================================================

/// Marshal a variant without wrapping it, implemented for every
/// [`Bundleable`].
///
/// ```rust
/// use bundlewire::{Bundleable, FactoryRegistry, Marshal, ParcelReader, ParcelWriter};
///
/// #[derive(Debug, Bundleable, PartialEq)]
/// #[bundle(type_id = "Point")]
/// struct Point { x: i32, y: i32 }
///
/// let registry = FactoryRegistry::new();
/// registry.register::<Point>().unwrap();
///
/// let mut writer = ParcelWriter::new();
/// Point { x: 3, y: 4 }.marshal(&mut writer).unwrap();
///
/// let bytes = writer.into_bytes();
/// let mut reader = ParcelReader::new(&bytes);
/// let point = Point::unmarshal(&mut reader, &registry).unwrap();
/// assert_eq!(point, Point { x: 3, y: 4 });
/// ```
pub trait Marshal: Bundleable + Sized {
    fn marshal<W: TransportWrite + ?Sized>(&self, out: &mut W) -> Result<(), EncodeError> {
        encode(self)?.write_to(out)?;
        Ok(())
    }

    /// Decode the next envelope and require it to be `Self`.
    fn unmarshal<R: TransportRead + ?Sized>(
        input: &mut R,
        resolver: &dyn TypeResolver,
    ) -> Result<Self, DecodeError> {
        let decoded = EncodedEnvelope::read_from(input)?.decode(resolver)?;
        let found = TypeIdentifier::new(decoded.type_identifier());
        match decoded.downcast::<Self>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(DecodeError::UnexpectedType {
                expected: std::any::type_name::<Self>(),
                found,
            }),
        }
    }
}

impl<T: Bundleable> Marshal for T {}

/// Encode a single envelope into a standalone parcel.
pub fn to_parcel_bytes(bundle: &dyn Bundleable) -> Result<Vec<u8>, EncodeError> {
    let encoded = encode(bundle)?;
    let mut writer = ParcelWriter::new();
    encoded.write_to(&mut writer)?;
    Ok(writer.into_bytes())
}

/// Decode a parcel holding exactly one envelope.
///
/// # Errors
///
/// [`DecodeError::Wire`] with `TrailingBytes` if data follows the envelope.
pub fn from_parcel_bytes(
    bytes: &[u8],
    resolver: &dyn TypeResolver,
) -> Result<Box<dyn Bundleable>, DecodeError> {
    let mut reader = ParcelReader::new(bytes);
    let encoded = EncodedEnvelope::read_from(&mut reader)?;
    reader.finish()?;
    encoded.decode(resolver)
}
