// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport boundary.
//!
//! The envelope only needs two primitives from a channel: strings and
//! instance-data maps. [`TransportWrite`] and [`TransportRead`] capture that
//! contract; [`ParcelWriter`] / [`ParcelReader`] implement it over a byte
//! buffer.

mod cursor;
mod error;
mod parcel;

pub use cursor::{ByteReader, ByteWriter};
pub use error::{WireError, WireResult};
pub use parcel::{ParcelReader, ParcelWriter};

use crate::data::InstanceData;

/// Write side of a channel.
pub trait TransportWrite {
    fn write_string(&mut self, s: &str) -> WireResult<()>;
    fn write_map(&mut self, map: &InstanceData) -> WireResult<()>;
}

/// Read side of a channel.
///
/// Each call consumes one complete, self-delimited value.
pub trait TransportRead {
    fn read_string(&mut self) -> WireResult<String>;
    fn read_map(&mut self) -> WireResult<InstanceData>;
}

impl<W: TransportWrite + ?Sized> TransportWrite for &mut W {
    fn write_string(&mut self, s: &str) -> WireResult<()> {
        (**self).write_string(s)
    }

    fn write_map(&mut self, map: &InstanceData) -> WireResult<()> {
        (**self).write_map(map)
    }
}

impl<R: TransportRead + ?Sized> TransportRead for &mut R {
    fn read_string(&mut self) -> WireResult<String> {
        (**self).read_string()
    }

    fn read_map(&mut self) -> WireResult<InstanceData> {
        (**self).read_map()
    }
}
