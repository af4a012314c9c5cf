//! Hashing System - SHA-256 for Pixel Content and Reports
//!
//! Content hashes key deduplication; report hashes make a run's record
//! comparable across machines.

use image::{ColorType, DynamicImage};
use serde::Serialize;
use serde_json::{Value, to_string};
use sha2::{Sha256, Digest};
use std::fmt;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Digest of decoded pixel content.
///
/// Covers the color type and dimensions along with the raw sample bytes, so
/// two buffers that happen to share bytes but not shape never collide.
/// File name and container encoding play no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of_image(img: &DynamicImage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([color_tag(img.color())]);
        hasher.update(img.width().to_le_bytes());
        hasher.update(img.height().to_le_bytes());
        hasher.update(img.as_bytes());
        Self(hasher.finalize().into())
    }
}

/// Fixed per-layout tag so the key does not depend on formatting output.
fn color_tag(color: ColorType) -> u8 {
    match color {
        ColorType::L8 => 1,
        ColorType::La8 => 2,
        ColorType::Rgb8 => 3,
        ColorType::Rgba8 => 4,
        ColorType::L16 => 5,
        ColorType::La16 => 6,
        ColorType::Rgb16 => 7,
        ColorType::Rgba16 => 8,
        ColorType::Rgb32F => 9,
        ColorType::Rgba32F => 10,
        _ => 0,
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Compute the hash of a run report
pub fn compute_report_hash<T: Serialize>(report: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(report)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
