//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! The catalog is immutable, so handlers only read from [`AppState`] and
//! never take a lock.

use super::{
    AppState,
    types::{
        CheckResponse, CompatResponse, DigestResponse, ErrorResponse, HealthResponse,
        ModuleEntry, ModuleListResponse, ModuleResponse, StatusResponse, TierEntry, TiersResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use mplp_catalog::{
    CatalogError, ModuleName, SchemaSummary, Tier, catalog_checksum, catalog_crypto_hash,
    check_compatibility, lint_catalog, module_status, tier_counts,
};
use serde_json::Value;

/// Error half of every fallible handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a catalog error to its HTTP status.
///
/// Unknown modules are 404, malformed input is 400, anything else is 500.
pub fn error_response(err: &CatalogError) -> ApiError {
    let status = match err {
        CatalogError::UnknownModule(_) => StatusCode::NOT_FOUND,
        CatalogError::SchemaParse { .. } | CatalogError::SerializationError(_) => {
            StatusCode::BAD_REQUEST
        }
        CatalogError::IoError(_) | CatalogError::ConfigError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Resolve a path segment to a module.
fn resolve_module(name: &str) -> Result<ModuleName, ApiError> {
    name.parse::<ModuleName>().map_err(|e| {
        tracing::debug!(module = %name, "Unknown module requested");
        error_response(&e)
    })
}

/// Schema of `module`, or 404 when the catalog lacks it.
fn schema_of(state: &AppState, module: ModuleName) -> Result<&Value, ApiError> {
    state
        .catalog
        .get(module)
        .ok_or_else(|| error_response(&CatalogError::UnknownModule(module.to_string())))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// MODULE HANDLERS
// =============================================================================

/// List every module with its status and schema `$id`.
pub async fn modules_handler(State(state): State<AppState>) -> impl IntoResponse {
    let modules = state
        .catalog
        .iter()
        .map(|(module, schema)| ModuleEntry {
            name: module,
            status: module_status(module.as_str()),
            schema_id: schema
                .get("$id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Json(ModuleListResponse {
        modules,
        counts: tier_counts(),
    })
}

/// Status and summary of one module.
pub async fn module_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = resolve_module(&name)?;
    let schema = schema_of(&state, module)?;

    Ok(Json(ModuleResponse {
        name: module,
        status: module_status(module.as_str()),
        summary: SchemaSummary::from_schema(module, schema),
    }))
}

/// Raw schema document of one module.
pub async fn module_schema_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let module = resolve_module(&name)?;
    schema_of(&state, module).map(|schema| Json(schema.clone()))
}

// =============================================================================
// STATUS & TIER HANDLERS
// =============================================================================

/// Status of any string. Always 200; unknown names report `unknown`.
pub async fn status_handler(Path(name): Path<String>) -> impl IntoResponse {
    Json(StatusResponse::for_name(&name))
}

/// Status of the empty name, which `/status/{name}` cannot capture.
pub async fn status_empty_handler() -> impl IntoResponse {
    Json(StatusResponse::for_name(""))
}

/// Tier → modules, in priority order.
pub async fn tiers_handler() -> impl IntoResponse {
    Json(TiersResponse {
        tiers: Tier::ALL.into_iter().map(TierEntry::from).collect(),
    })
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// Every schema as one JSON array, in canonical module order.
pub async fn schemas_handler(State(state): State<AppState>) -> impl IntoResponse {
    let schemas: Vec<Value> = state.catalog.all_schemas().into_iter().cloned().collect();
    Json(schemas)
}

/// Lint the whole catalog.
pub async fn check_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = lint_catalog(&state.catalog);
    if !report.passed() {
        tracing::warn!(errors = report.error_count(), "Catalog lint reported errors");
    }
    Json(CheckResponse::from(report))
}

/// Compare a submitted (older) schema against the embedded one.
pub async fn compat_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(source): Json<Value>,
) -> Result<Json<CompatResponse>, ApiError> {
    let module = resolve_module(&name)?;
    if !source.is_object() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Schema document must be a JSON object")),
        ));
    }
    let target = schema_of(&state, module)?;

    let report = check_compatibility(&source, target);
    tracing::info!(
        module = %module,
        compatible = report.compatible(),
        changes = report.changes.len(),
        "Compatibility check"
    );

    Ok(Json(CompatResponse {
        module,
        compatible: report.compatible(),
        report,
    }))
}

/// Catalog checksum and BLAKE3 hash.
pub async fn digest_handler(State(state): State<AppState>) -> impl IntoResponse {
    let checksum = catalog_checksum(&state.catalog);
    Json(DigestResponse {
        modules: state.catalog.len(),
        checksum,
        checksum_hex: format!("{checksum:016x}"),
        algorithm: "blake3".to_string(),
        hash: catalog_crypto_hash(&state.catalog),
    })
}
