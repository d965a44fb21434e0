// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::bundle::BundleError;
use crate::registry::FactoryRegistry;
use crate::wire::WireError;
use crate::Bundleable;

#[derive(Debug, Bundleable, PartialEq)]
#[bundle(type_id = "Point")]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Circle {
    radius: f64,
}

impl Bundleable for Circle {
    fn type_identifier(&self) -> &str {
        "Circle"
    }

    fn write_instance_data(&self, out: &mut InstanceData) -> Result<(), BundleError> {
        out.put("radius", self.radius);
        Ok(())
    }

    fn construct_from_instance_data(&mut self, data: &InstanceData) -> Result<(), BundleError> {
        let radius: f64 = data.get_as("radius")?;
        if radius <= 0.0 {
            return Err(BundleError::invalid("radius", "must be positive"));
        }
        self.radius = radius;
        Ok(())
    }
}

/// Refuses to serialize.
#[derive(Debug)]
struct Opaque;

impl Bundleable for Opaque {
    fn type_identifier(&self) -> &str {
        "Opaque"
    }

    fn write_instance_data(&self, _out: &mut InstanceData) -> Result<(), BundleError> {
        Err(BundleError::invalid("handle", "not transferable"))
    }

    fn construct_from_instance_data(&mut self, _data: &InstanceData) -> Result<(), BundleError> {
        Ok(())
    }
}

fn registry() -> FactoryRegistry {
    let registry = FactoryRegistry::new();
    registry.register::<Point>().unwrap();
    registry
        .register_factory("Circle", Circle::default)
        .unwrap();
    registry
}

fn point_data(x: i32, y: i32) -> InstanceData {
    let mut data = InstanceData::new();
    data.put("x", x);
    data.put("y", y);
    data
}

#[test]
fn test_encode_captures_identifier_and_state() {
    let encoded = encode(&Point { x: 3, y: 4 }).unwrap();
    assert_eq!(encoded.type_identifier(), "Point");
    assert_eq!(encoded.data(), &point_data(3, 4));
}

#[test]
fn test_encode_failure() {
    match encode(&Opaque) {
        Err(EncodeError::Bundle { type_id, source }) => {
            assert_eq!(type_id, "Opaque");
            assert_eq!(source.key(), "handle");
        }
        other => panic!("expected Bundle error, got {:?}", other),
    }
}

#[test]
fn test_decode_round_trip() {
    let decoded = decode(&registry(), "Point", &point_data(3, 4)).unwrap();
    assert_eq!(
        decoded.downcast_ref::<Point>(),
        Some(&Point { x: 3, y: 4 })
    );
}

#[test]
fn test_decode_missing_field() {
    let mut data = InstanceData::new();
    data.put("x", 3i32);

    match decode(&registry(), "Point", &data) {
        Err(DecodeError::MalformedPayload { type_id, source }) => {
            assert_eq!(type_id, "Point");
            assert!(matches!(source, BundleError::MissingField(ref k) if k == "y"));
        }
        other => panic!("expected MalformedPayload, got {:?}", other),
    }
}

#[test]
fn test_decode_rejected_value() {
    let mut data = InstanceData::new();
    data.put("radius", -1.0f64);

    let err = decode(&registry(), "Circle", &data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed payload for 'Circle': Invalid value for 'radius': must be positive"
    );
}

#[test]
fn test_decode_unknown_type() {
    let mut data = InstanceData::new();
    data.put("r", 5i32);

    let err = decode(&FactoryRegistry::new(), "Circle", &data).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType(ref id) if id == "Circle"));
}

#[test]
fn test_envelope_accessors() {
    let mut envelope = Envelope::from_bundleable(Point { x: 1, y: 2 });
    assert_eq!(envelope.type_identifier(), "Point");

    envelope
        .bundleable_mut()
        .downcast_mut::<Point>()
        .unwrap()
        .x = 10;
    assert_eq!(
        envelope.bundleable().downcast_ref::<Point>(),
        Some(&Point { x: 10, y: 2 })
    );

    let inner = envelope.into_inner().downcast::<Point>().unwrap();
    assert_eq!(*inner, Point { x: 10, y: 2 });
}

#[test]
fn test_envelope_write_read() {
    let mut writer = ParcelWriter::new();
    Envelope::from_bundleable(Point { x: 3, y: 4 })
        .write_to(&mut writer)
        .unwrap();
    Envelope::new(Box::new(Circle { radius: 2.5 }))
        .write_to(&mut writer)
        .unwrap();

    let bytes = writer.into_bytes();
    let registry = registry();
    let mut reader = ParcelReader::new(&bytes);

    let first = Envelope::read_from(&mut reader, &registry).unwrap();
    assert_eq!(first.type_identifier(), "Point");
    let second = Envelope::read_from(&mut reader, &registry).unwrap();
    assert_eq!(
        second.bundleable().downcast_ref::<Circle>(),
        Some(&Circle { radius: 2.5 })
    );
    assert!(reader.finish().is_ok());
}

#[test]
fn test_unknown_type_leaves_stream_aligned() {
    let mut writer = ParcelWriter::new();
    Circle { radius: 1.0 }.marshal(&mut writer).unwrap();
    Point { x: 7, y: 8 }.marshal(&mut writer).unwrap();
    let bytes = writer.into_bytes();

    let registry = FactoryRegistry::new();
    registry.register::<Point>().unwrap();

    let mut reader = ParcelReader::new(&bytes);
    let err = Envelope::read_from(&mut reader, &registry).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType(_)));

    let point = Point::unmarshal(&mut reader, &registry).unwrap();
    assert_eq!(point, Point { x: 7, y: 8 });
    assert!(reader.is_eof());
}

#[test]
fn test_unmarshal_unexpected_type() {
    let mut writer = ParcelWriter::new();
    Circle { radius: 1.0 }.marshal(&mut writer).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = ParcelReader::new(&bytes);
    match Point::unmarshal(&mut reader, &registry()) {
        Err(DecodeError::UnexpectedType { expected, found }) => {
            assert!(expected.ends_with("Point"));
            assert_eq!(found, "Circle");
        }
        other => panic!("expected UnexpectedType, got {:?}", other),
    }
}

#[test]
fn test_truncated_envelope_is_wire_error() {
    let bytes = to_parcel_bytes(&Point { x: 3, y: 4 }).unwrap();
    let truncated = &bytes[..bytes.len() - 2];

    let err = from_parcel_bytes(truncated, &registry()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::UnexpectedEof { .. })
    ));
}

#[test]
fn test_parcel_bytes_round_trip_and_trailing_data() {
    let mut bytes = to_parcel_bytes(&Point { x: -1, y: i32::MAX }).unwrap();
    let decoded = from_parcel_bytes(&bytes, &registry()).unwrap();
    assert_eq!(
        decoded.downcast_ref::<Point>(),
        Some(&Point { x: -1, y: i32::MAX })
    );

    bytes.push(0);
    let err = from_parcel_bytes(&bytes, &registry()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::TrailingBytes { remaining: 1, .. })
    ));
}

#[test]
fn test_encoded_envelope_read_without_registry() {
    let bytes = to_parcel_bytes(&Point { x: 3, y: 4 }).unwrap();
    let mut reader = ParcelReader::new(&bytes);

    let raw = EncodedEnvelope::read_from(&mut reader).unwrap();
    assert_eq!(raw.type_identifier(), "Point");
    assert_eq!(raw.data(), &point_data(3, 4));
}

#[test]
fn test_envelope_sequence_round_trip() {
    let envelopes = vec![
        Envelope::from_bundleable(Point { x: 1, y: 2 }),
        Envelope::from_bundleable(Circle { radius: 0.5 }),
        Envelope::from_bundleable(Point { x: 3, y: 4 }),
    ];
    let mut writer = ParcelWriter::new();
    Envelope::write_all(&envelopes, &mut writer).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = ParcelReader::new(&bytes);
    let decoded = Envelope::read_all(&mut reader, &registry()).unwrap();
    let ids: Vec<_> = decoded.iter().map(Envelope::type_identifier).collect();
    assert_eq!(ids, vec!["Point", "Circle", "Point"]);
    assert_eq!(
        decoded[2].bundleable().downcast_ref::<Point>(),
        Some(&Point { x: 3, y: 4 })
    );
    assert!(reader.finish().is_ok());

    let mut empty = ParcelReader::new(&[]);
    assert!(Envelope::read_all(&mut empty, &registry()).unwrap().is_empty());
}

#[test]
fn test_write_all_stops_at_failing_variant() {
    let envelopes = vec![
        Envelope::from_bundleable(Point { x: 1, y: 2 }),
        Envelope::new(Box::new(Opaque)),
        Envelope::from_bundleable(Point { x: 3, y: 4 }),
    ];
    let mut writer = ParcelWriter::new();
    let err = Envelope::write_all(&envelopes, &mut writer).unwrap_err();
    assert!(matches!(err, EncodeError::Bundle { .. }));

    let bytes = writer.into_bytes();
    let mut reader = ParcelReader::new(&bytes);
    let raw = EncodedEnvelope::read_all(&mut reader).unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].data(), &point_data(1, 2));
}

#[test]
fn test_encoded_sequence_without_registry() {
    let raw = vec![
        EncodedEnvelope::new("Point", point_data(5, 6)),
        EncodedEnvelope::new("Unregistered", InstanceData::new()),
    ];
    let mut writer = ParcelWriter::new();
    EncodedEnvelope::write_all(&raw, &mut writer).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = ParcelReader::new(&bytes);
    assert_eq!(EncodedEnvelope::read_all(&mut reader).unwrap(), raw);

    // the registry-backed read fails on the unknown variant
    let mut reader = ParcelReader::new(&bytes);
    assert!(matches!(
        Envelope::read_all(&mut reader, &registry()),
        Err(DecodeError::UnknownType(ref id)) if id == "Unregistered"
    ));
}

#[test]
fn test_read_iter_ends_after_error() {
    let mut writer = ParcelWriter::new();
    EncodedEnvelope::new("Point", point_data(1, 1))
        .write_to(&mut writer)
        .unwrap();
    let mut bytes = writer.into_bytes();
    bytes.extend_from_slice(&[0xff, 0xff]);

    let mut reader = ParcelReader::new(&bytes);
    let mut iter = EncodedEnvelope::read_iter(&mut reader);
    assert!(iter.next().unwrap().is_ok());
    let second_offset = iter.offset();
    assert!(iter.next().unwrap().is_err());
    assert!(iter.next().is_none());
    assert!(second_offset > 0);
}
