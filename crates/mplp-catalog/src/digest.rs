//! # Catalog Digest
//!
//! Deterministic fingerprints of the schema catalog.
//!
//! Documents are first reduced to a canonical form: compact JSON with object
//! keys sorted bytewise, independent of the key order in the source file.
//! The catalog form is each module's `<name>:<canonical json>\n` line in
//! canonical module order.
//!
//! - [`catalog_checksum`] / [`schema_checksum`]: 64-bit FNV-1a over the
//!   canonical bytes. Fast, for change detection only.
//! - `catalog_crypto_hash` (feature `crypto-hash`): BLAKE3 over the same
//!   bytes, for integrity checks that need collision resistance.

use crate::schema::SchemaCatalog;
use serde_json::Value;
use std::fmt::Write;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

// =============================================================================
// CANONICAL FORM
// =============================================================================

/// Canonical compact serialization of one document.
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Canonical serialization of a whole catalog.
#[must_use]
pub fn catalog_canonical_bytes(catalog: &SchemaCatalog) -> Vec<u8> {
    let mut out = String::new();
    for (module, schema) in catalog.iter() {
        out.push_str(module.as_str());
        out.push(':');
        write_canonical(schema, &mut out);
        out.push('\n');
    }
    out.into_bytes()
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}", Value::from(key.as_str()));
                out.push(':');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
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
        // Display of a scalar Value is its compact JSON text.
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

// =============================================================================
// CHECKSUMS
// =============================================================================

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Checksum of a single document.
///
/// Two documents that differ only in key order have the same checksum.
#[must_use]
pub fn schema_checksum(schema: &Value) -> u64 {
    fnv1a(canonical_json(schema).as_bytes())
}

/// Checksum of the whole catalog. Same catalog, same checksum.
#[must_use]
pub fn catalog_checksum(catalog: &SchemaCatalog) -> u64 {
    fnv1a(&catalog_canonical_bytes(catalog))
}

// =============================================================================
// CRYPTOGRAPHIC HASH
// =============================================================================

/// BLAKE3 hash of the canonical catalog serialization, as 64 hex characters.
///
/// # Requires
///
/// This function is only available with the `crypto-hash` feature enabled.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn catalog_crypto_hash(catalog: &SchemaCatalog) -> String {
    blake3::hash(&catalog_canonical_bytes(catalog))
        .to_hex()
        .to_string()
}

/// Verify a catalog against a BLAKE3 hex digest (case-insensitive).
///
/// # Requires
///
/// This function is only available with the `crypto-hash` feature enabled.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn verify_catalog_hash(catalog: &SchemaCatalog, expected_hash: &str) -> bool {
    catalog_crypto_hash(catalog).eq_ignore_ascii_case(expected_hash.trim())
}

// =============================================================================
// TESTS
// =============================================================================
