//! Deterministic cache key derivation.
//!
//! Keys are derived from request parameters by serializing them to
//! canonical JSON and hashing the result with a 32-bit rolling hash,
//! rendered in base 36 and namespaced under a fixed `geopoio-` prefix.
//! The same parameters always produce the same key, so equivalent
//! requests share cache entries across calls and coordinators.
//!
//! The 32-bit hash space is an accepted collision risk: keys are
//! content-derived and entries immutable once written, so a collision
//! returns a stale-but-valid POI set rather than corrupt data.

use serde::Serialize;

/// Namespace prefix shared by every key this crate writes.
///
/// [`crate::cache::CacheLayer::clear_prefix`] scopes deletion to this
/// prefix so co-resident data in a shared store is untouched.
pub const KEY_NAMESPACE: &str = "geopoio-";

/// Derives a deterministic cache key from serializable parameters.
///
/// The result has the form `geopoio-{prefix}-{hash36}`. Parameters are
/// serialized with serde_json, which is canonical for the tuple/struct
/// parameters used here (field order is fixed by the type).
pub fn cache_key<P: Serialize>(prefix: &str, params: &P) -> String {
    // Serialization of plain data types cannot fail
    let serialized = serde_json::to_string(params).unwrap_or_default();
    format!(
        "{}{}-{}",
        KEY_NAMESPACE,
        prefix,
        to_base36(rolling_hash(&serialized))
    )
}

/// 32-bit rolling hash (`h * 31 + byte`, wrapping).
fn rolling_hash(input: &str) -> u32 {
    let mut hash: i32 = 0;
    for byte in input.bytes() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(byte as i32);
    }
    hash.unsigned_abs()
}

/// Renders a u32 in base 36 (digits then lowercase letters).
fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}
