// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tree and JSON rendering of raw envelopes.

use bundlewire::{EncodedEnvelope, InstanceData, InstanceValue};
use colored::*;
use serde_json::{json, Map, Number, Value};
use std::fmt::Write;

const BYTES_PREVIEW: usize = 16;

/// Colored, indented tree for one envelope.
pub fn render_tree(index: usize, envelope: &EncodedEnvelope) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({} entries)",
        format!("#{}", index).dimmed(),
        envelope.type_identifier().yellow().bold(),
        envelope.data().len()
    );
    render_map(&mut out, envelope.data(), 1);
    out
}

fn render_map(out: &mut String, map: &InstanceData, depth: usize) {
    for (key, value) in map.iter() {
        render_entry(out, key, value, depth);
    }
}

fn render_entry(out: &mut String, key: &str, value: &InstanceValue, depth: usize) {
    let indent = "  ".repeat(depth);
    let kind = value.kind_name().dimmed();
    match value {
        InstanceValue::Data(map) => {
            let _ = writeln!(out, "{}{} {}", indent, key.cyan(), kind);
            render_map(out, map, depth + 1);
        }
        InstanceValue::Bundle(type_id, map) => {
            let _ = writeln!(
                out,
                "{}{} {} {}",
                indent,
                key.cyan(),
                kind,
                type_id.as_str().yellow()
            );
            render_map(out, map, depth + 1);
        }
        InstanceValue::Sequence(items) => {
            let _ = writeln!(out, "{}{} {} [{}]", indent, key.cyan(), kind, items.len());
            for (i, item) in items.iter().enumerate() {
                render_entry(out, &format!("[{}]", i), item, depth + 1);
            }
        }
        scalar => {
            let _ = writeln!(
                out,
                "{}{} {} = {}",
                indent,
                key.cyan(),
                kind,
                scalar_text(scalar).green()
            );
        }
    }
}

fn scalar_text(value: &InstanceValue) -> String {
    match value {
        InstanceValue::Null => "null".to_string(),
        InstanceValue::Bool(v) => v.to_string(),
        InstanceValue::I8(v) => v.to_string(),
        InstanceValue::I16(v) => v.to_string(),
        InstanceValue::I32(v) => v.to_string(),
        InstanceValue::I64(v) => v.to_string(),
        InstanceValue::U8(v) => v.to_string(),
        InstanceValue::U16(v) => v.to_string(),
        InstanceValue::U32(v) => v.to_string(),
        InstanceValue::U64(v) => v.to_string(),
        InstanceValue::F32(v) => v.to_string(),
        InstanceValue::F64(v) => v.to_string(),
        InstanceValue::Char(v) => format!("{:?}", v),
        InstanceValue::String(s) => format!("{:?}", s),
        InstanceValue::Bytes(b) => {
            let preview = hex(&b[..b.len().min(BYTES_PREVIEW)]);
            let suffix = if b.len() > BYTES_PREVIEW { " ..." } else { "" };
            format!("{}{} ({} bytes)", preview, suffix, b.len())
        }
        InstanceValue::Sequence(_) | InstanceValue::Data(_) | InstanceValue::Bundle(..) => {
            String::new()
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// JSON object `{"index", "type_id", "data"}` for one envelope.
pub fn envelope_to_json(index: usize, envelope: &EncodedEnvelope) -> Value {
    json!({
        "index": index,
        "type_id": envelope.type_identifier(),
        "data": map_to_json(envelope.data()),
    })
}

fn map_to_json(map: &InstanceData) -> Value {
    let object: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.to_string(), value_to_json(value)))
        .collect();
    Value::Object(object)
}

/// Lossy JSON view: byte arrays become hex strings, non-finite floats null.
pub fn value_to_json(value: &InstanceValue) -> Value {
    match value {
        InstanceValue::Null => Value::Null,
        InstanceValue::Bool(v) => Value::Bool(*v),
        InstanceValue::I8(v) => json!(v),
        InstanceValue::I16(v) => json!(v),
        InstanceValue::I32(v) => json!(v),
        InstanceValue::I64(v) => json!(v),
        InstanceValue::U8(v) => json!(v),
        InstanceValue::U16(v) => json!(v),
        InstanceValue::U32(v) => json!(v),
        InstanceValue::U64(v) => json!(v),
        InstanceValue::F32(v) => float_to_json(f64::from(*v)),
        InstanceValue::F64(v) => float_to_json(*v),
        InstanceValue::Char(v) => Value::String(v.to_string()),
        InstanceValue::String(s) => Value::String(s.clone()),
        InstanceValue::Bytes(b) => Value::String(hex(b)),
        InstanceValue::Sequence(items) => Value::Array(items.iter().map(value_to_json).collect()),
        InstanceValue::Data(map) => map_to_json(map),
        InstanceValue::Bundle(type_id, map) => json!({
            "type_id": type_id.as_str(),
            "data": map_to_json(map),
        }),
    }
}

fn float_to_json(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}
