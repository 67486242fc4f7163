//! # Content Hashing
//!
//! `contentHash = hex(SHA-256(canonical_json(data)))`.
//!
//! Canonical JSON is compact, with the keys of every object sorted by byte
//! order at every depth. Arrays keep their order. Scalars use `serde_json`'s
//! own rendering. Two payloads with the same keys and values always hash
//! equal regardless of insertion order, on every channel.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::entities::DocumentData;

/// Render a value as canonical JSON.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Hex SHA-256 of the canonical payload.
pub fn content_hash(data: &DocumentData) -> String {
    let canonical = canonical_json(&Value::Object(data.clone()));
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}
