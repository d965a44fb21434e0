// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Randomized round trips and concurrent decoding.

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Random test data

use bundlewire::{
    from_parcel_bytes, to_parcel_bytes, Bundleable, EncodedEnvelope, FactoryRegistry,
    InstanceData, InstanceValue, ParcelReader, ParcelWriter, WireLimits,
};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Bundleable, PartialEq)]
#[bundle(type_id = "telemetry.Sample")]
struct Sample {
    sensor: String,
    seq: u64,
    offset: i16,
    reading: f64,
    gain: f32,
    flags: Vec<bool>,
    note: Option<String>,
    initial: char,
    raw: Vec<u8>,
}

fn random_string(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(0..24);
    (0..len).map(|_| rng.char('a'..='z')).collect()
}

fn random_sample(rng: &mut fastrand::Rng) -> Sample {
    Sample {
        sensor: random_string(rng),
        seq: rng.u64(..),
        offset: rng.i16(..),
        reading: rng.f64() * 1e6 - 5e5,
        gain: rng.f32(),
        flags: (0..rng.usize(0..8)).map(|_| rng.bool()).collect(),
        note: if rng.bool() {
            Some(random_string(rng))
        } else {
            None
        },
        initial: rng.char(..),
        raw: (0..rng.usize(0..64)).map(|_| rng.u8(..)).collect(),
    }
}

fn random_value(rng: &mut fastrand::Rng, depth: usize) -> InstanceValue {
    let max_kind = if depth == 0 { 14 } else { 17 };
    match rng.u8(0..max_kind) {
        0 => InstanceValue::Null,
        1 => InstanceValue::Bool(rng.bool()),
        2 => InstanceValue::I8(rng.i8(..)),
        3 => InstanceValue::I16(rng.i16(..)),
        4 => InstanceValue::I32(rng.i32(..)),
        5 => InstanceValue::I64(rng.i64(..)),
        6 => InstanceValue::U8(rng.u8(..)),
        7 => InstanceValue::U16(rng.u16(..)),
        8 => InstanceValue::U32(rng.u32(..)),
        9 => InstanceValue::U64(rng.u64(..)),
        10 => InstanceValue::F64(rng.f64()),
        11 => InstanceValue::Char(rng.char(..)),
        12 => InstanceValue::String(random_string(rng)),
        13 => InstanceValue::Bytes((0..rng.usize(0..16)).map(|_| rng.u8(..)).collect()),
        14 => InstanceValue::Sequence(
            (0..rng.usize(0..4))
                .map(|_| random_value(rng, depth - 1))
                .collect(),
        ),
        15 => InstanceValue::Data(random_map(rng, depth - 1)),
        _ => InstanceValue::Bundle(random_string(rng).into(), random_map(rng, depth - 1)),
    }
}

fn random_map(rng: &mut fastrand::Rng, depth: usize) -> InstanceData {
    (0..rng.usize(0..6))
        .map(|i| (format!("k{}", i), random_value(rng, depth)))
        .collect()
}

#[test]
fn random_samples_round_trip() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let registry = FactoryRegistry::new();
    registry.register::<Sample>().unwrap();

    for _ in 0..200 {
        let sample = random_sample(&mut rng);
        let bytes = to_parcel_bytes(&sample).unwrap();
        let decoded = from_parcel_bytes(&bytes, &registry).unwrap();
        assert_eq!(decoded.downcast_ref::<Sample>(), Some(&sample));
    }
}

#[test]
fn random_raw_envelopes_round_trip() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut writer = ParcelWriter::new();
    let mut expected = Vec::new();

    for i in 0..50 {
        let envelope = EncodedEnvelope::new(format!("Type{}", i), random_map(&mut rng, 3));
        envelope.write_to(&mut writer).unwrap();
        expected.push(envelope);
    }

    let bytes = writer.into_bytes();
    let mut reader = ParcelReader::with_limits(&bytes, WireLimits::unbounded());
    for envelope in &expected {
        assert_eq!(&EncodedEnvelope::read_from(&mut reader).unwrap(), envelope);
    }
    reader.finish().unwrap();
}

#[test]
fn random_truncation_never_panics() {
    let mut rng = fastrand::Rng::with_seed(7);
    let sample = random_sample(&mut rng);
    let bytes = to_parcel_bytes(&sample).unwrap();

    let registry = FactoryRegistry::new();
    registry.register::<Sample>().unwrap();

    for cut in 0..bytes.len() {
        assert!(from_parcel_bytes(&bytes[..cut], &registry).is_err());
    }
}

#[test]
fn concurrent_decode_while_registering() {
    let registry = Arc::new(FactoryRegistry::new());
    registry.register::<Sample>().unwrap();

    let mut rng = fastrand::Rng::with_seed(99);
    let payloads: Arc<Vec<(Sample, Vec<u8>)>> = Arc::new(
        (0..32)
            .map(|_| {
                let sample = random_sample(&mut rng);
                let bytes = to_parcel_bytes(&sample).unwrap();
                (sample, bytes)
            })
            .collect(),
    );

    let decoders: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let payloads = Arc::clone(&payloads);
            thread::spawn(move || {
                for _ in 0..20 {
                    for (sample, bytes) in payloads.iter() {
                        let decoded = from_parcel_bytes(bytes, registry.as_ref()).unwrap();
                        assert_eq!(decoded.downcast_ref::<Sample>(), Some(sample));
                    }
                }
            })
        })
        .collect();

    for i in 0..64 {
        registry
            .register_factory(format!("late.Type{}", i), || Sample {
                sensor: String::new(),
                seq: 0,
                offset: 0,
                reading: 0.0,
                gain: 0.0,
                flags: Vec::new(),
                note: None,
                initial: '\0',
                raw: Vec::new(),
            })
            .unwrap();
    }

    for decoder in decoders {
        decoder.join().unwrap();
    }
    assert_eq!(registry.len(), 65);
}
