// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bundlewire::{from_parcel_bytes, Bundleable, FactoryRegistry};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

#[derive(Debug, Clone, Bundleable)]
#[bundle(type_id = "Point")]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Bundleable)]
#[bundle(type_id = "Track")]
struct Track {
    name: String,
    points: Vec<Point>,
    tag: Option<String>,
    blob: Vec<u8>,
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let registry = REGISTRY.get_or_init(|| {
        let registry = FactoryRegistry::new();
        registry.register::<Point>().unwrap();
        registry.register::<Track>().unwrap();
        registry
    });

    // Must never panic, whatever the bytes claim to be
    let _ = from_parcel_bytes(data, registry);
});
