// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! bundlewire-inspect - Dump the envelopes contained in a parcel
//!
//! Decodes every envelope as a raw `(type id, instance data)` pair, so no
//! variant needs to be registered.

mod render;

use anyhow::{bail, Context, Result};
use bundlewire::{EncodedEnvelope, ParcelReader, WireLimits};
use clap::Parser;
use colored::*;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Dump bundlewire parcels
#[derive(Parser, Debug)]
#[command(name = "bundlewire-inspect")]
#[command(version)]
#[command(about = "Dump the envelopes contained in a bundlewire parcel")]
struct Args {
    /// Parcel file (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Input is hex text instead of raw bytes
    #[arg(long)]
    hex: bool,

    /// Print one JSON document instead of a tree
    #[arg(long)]
    json: bool,

    /// Maximum nesting depth accepted while decoding
    #[arg(long, default_value_t = bundlewire::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    // Initialize logger for RUST_LOG-based debug output
    env_logger::init();

    let args = Args::parse();

    if args.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let bytes = read_input(args.file.as_deref(), args.hex)?;
    let limits = WireLimits::default().with_max_depth(args.max_depth);
    let envelopes = decode_all(&bytes, limits)?;

    if args.json {
        let docs: Vec<_> = envelopes
            .iter()
            .enumerate()
            .map(|(i, env)| render::envelope_to_json(i, env))
            .collect();
        println!("{}", serde_json::to_string_pretty(&docs)?);
    } else {
        println!(
            "{} {} envelope(s), {} bytes",
            "parcel:".bold(),
            envelopes.len(),
            bytes.len()
        );
        for (i, env) in envelopes.iter().enumerate() {
            print!("{}", render::render_tree(i, env));
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>, hex: bool) -> Result<Vec<u8>> {
    let raw = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };

    if hex {
        let text = std::str::from_utf8(&raw).context("hex input is not UTF-8")?;
        parse_hex(text)
    } else {
        Ok(raw)
    }
}

/// Hex text to bytes; whitespace and an optional `0x` prefix are ignored.
fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if let Some((i, c)) = digits.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit()) {
        bail!("invalid hex digit {:?} at digit {}", c, i);
    }
    if digits.len() % 2 != 0 {
        bail!("hex input has an odd number of digits ({})", digits.len());
    }

    digits
        .as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let pair = std::str::from_utf8(pair).context("hex digits are ASCII")?;
            u8::from_str_radix(pair, 16)
                .with_context(|| format!("invalid hex byte at digit {}", i * 2))
        })
        .collect()
}

/// Every envelope in `bytes`, in order.
fn decode_all(bytes: &[u8], limits: WireLimits) -> Result<Vec<EncodedEnvelope>> {
    let mut reader = ParcelReader::with_limits(bytes, limits);
    let mut iter = EncodedEnvelope::read_iter(&mut reader);
    let mut envelopes = Vec::new();

    loop {
        let offset = iter.offset();
        let Some(envelope) = iter.next() else {
            break;
        };
        let envelope = envelope
            .with_context(|| format!("envelope #{} at offset {}", envelopes.len(), offset))?;
        log::debug!(
            "[inspect] envelope #{} '{}' at offset {}",
            envelopes.len(),
            envelope.type_identifier(),
            offset
        );
        envelopes.push(envelope);
    }
    Ok(envelopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlewire::{InstanceData, ParcelWriter};
    use std::io::Write;

    fn parcel() -> Vec<u8> {
        let mut writer = ParcelWriter::new();
        for (id, x) in [("Point", 3i32), ("Circle", 5)] {
            let mut data = InstanceData::new();
            data.put("x", x);
            EncodedEnvelope::new(id.to_string(), data)
                .write_to(&mut writer)
                .unwrap();
        }
        writer.into_bytes()
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x01 ff\n0A").unwrap(), vec![0x01, 0xff, 0x0a]);
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
        // non-ASCII input is an error, not a panic
        let err = parse_hex("aéb").unwrap_err();
        assert!(err.to_string().contains("invalid hex digit"));
        assert!(parse_hex("é1").is_err());
    }

    #[test]
    fn test_decode_all_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&parcel()).unwrap();

        let bytes = read_input(Some(file.path()), false).unwrap();
        let envelopes = decode_all(&bytes, WireLimits::default()).unwrap();
        let ids: Vec<_> = envelopes.iter().map(|e| e.type_identifier()).collect();
        assert_eq!(ids, vec!["Point", "Circle"]);
    }

    #[test]
    fn test_decode_all_from_hex_file() {
        let hex: String = parcel().iter().map(|b| format!("{:02x} ", b)).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(hex.as_bytes()).unwrap();

        let bytes = read_input(Some(file.path()), true).unwrap();
        assert_eq!(bytes, parcel());
    }

    #[test]
    fn test_truncated_parcel_reports_envelope() {
        let bytes = parcel();
        let err = decode_all(&bytes[..bytes.len() - 1], WireLimits::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("envelope #1"));
    }
}
