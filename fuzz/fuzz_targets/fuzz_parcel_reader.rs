// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bundlewire::{EncodedEnvelope, ParcelReader, ParcelWriter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ParcelReader::new(data);
    while !reader.is_eof() {
        let Ok(envelope) = EncodedEnvelope::read_from(&mut reader) else {
            break;
        };

        // Anything accepted must re-encode to a parcel that decodes the same
        let mut writer = ParcelWriter::new();
        envelope.write_to(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let again = EncodedEnvelope::read_from(&mut ParcelReader::new(&bytes)).unwrap();
        assert_eq!(again.type_identifier(), envelope.type_identifier());
        assert_eq!(again.data().len(), envelope.data().len());
    }
});
