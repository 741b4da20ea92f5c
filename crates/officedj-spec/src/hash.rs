//! Canonical hashing of profiles and blueprints.
//!
//! Hashes are computed over a canonical JSON form (sorted keys, no
//! whitespace) so that two structurally equal values always hash the same
//! regardless of field order in memory.

use serde::Serialize;

use crate::blueprint::Blueprint;
use crate::error::SpecError;
use crate::profile::Profile;

/// Computes the canonical BLAKE3 hash of a profile.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn profile_hash(profile: &Profile) -> Result<String, SpecError> {
    canonical_hash(profile)
}

/// Computes the canonical BLAKE3 hash of a blueprint.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn blueprint_hash(blueprint: &Blueprint) -> Result<String, SpecError> {
    canonical_hash(blueprint)
}

/// Hashes any serializable value through its canonical JSON form.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String, SpecError> {
    let value = serde_json::to_value(value)?;
    let canonical = canonicalize_json(&value);
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Canonicalizes a JSON value: sorted object keys, no insignificant
/// whitespace, integral floats printed without a fraction.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
