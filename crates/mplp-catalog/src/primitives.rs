//! # Catalog Primitives
//!
//! Fixed constants of the MPLP schema catalog.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Every embedded schema document is expected to agree with them; the lint
//! module checks that it does.

/// MPLP protocol version declared by every embedded schema
/// (`properties.protocol_version.const`).
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// JSON Schema dialect used by the catalog.
pub const SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Required prefix of every schema `$id`.
pub const SCHEMA_ID_PREFIX: &str = "https://mplp.dev/schemas/v1.0/";

/// Root fields every schema document must carry.
pub const REQUIRED_ROOT_FIELDS: [&str; 5] = ["$schema", "$id", "title", "description", "type"];

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of an externally supplied schema document (1 MB).
///
/// Applies to documents handed to the compatibility check from files or
/// HTTP bodies. The embedded documents are far below this.
pub const MAX_SCHEMA_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth walked by the lint and summary passes.
///
/// Deeper subtrees are skipped so that a hostile document cannot exhaust
/// the stack.
pub const MAX_WALK_DEPTH: usize = 64;
