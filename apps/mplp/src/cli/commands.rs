//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{CheckFormat, CliError};
use crate::api::{self, AppState, StatusResponse};
use crate::config::MplpConfig;
use mplp_catalog::{
    CatalogError, CatalogLintReport, MAX_SCHEMA_BYTES, ModuleName, SchemaCatalog, SchemaSummary,
    Severity, Tier, catalog_checksum, catalog_crypto_hash, check_compatibility, lint_catalog,
    lint_schema, module_status, schema_source, tier_counts,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Canonicalize an input path and make sure it is a regular file no larger
/// than `max_size`.
fn validate_input_file(path: &Path, max_size: u64) -> Result<PathBuf, CatalogError> {
    let canonical = path.canonicalize().map_err(|e| {
        CatalogError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CatalogError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| CatalogError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > max_size {
        return Err(CatalogError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }

    Ok(canonical)
}

/// Print a value as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CatalogError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// MODULES COMMAND
// =============================================================================

/// List modules with their tier, optionally filtered to one tier.
pub fn cmd_modules(json_mode: bool, tier: Option<Tier>) -> Result<(), CliError> {
    let modules: Vec<ModuleName> = match tier {
        Some(tier) => tier.modules().to_vec(),
        None => ModuleName::ALL.to_vec(),
    };

    if json_mode {
        let entries: Vec<Value> = modules
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m,
                    "status": module_status(m.as_str()),
                })
            })
            .collect();
        print_json(&entries)?;
        return Ok(());
    }

    println!("MPLP Modules");
    println!("============");
    for module in &modules {
        println!("  {:<10} {}", module.as_str(), module_status(module.as_str()));
    }

    if tier.is_none() {
        let counts = tier_counts();
        println!();
        println!(
            "{} modules: {} production-ready ({}%), {} enterprise-standard, {} pending",
            counts.total,
            counts.production_ready,
            counts.production_ready_percent(),
            counts.enterprise_standard,
            counts.pending
        );
    }

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Print the tier status of any name. Unknown names are not an error.
pub fn cmd_status(json_mode: bool, name: &str) {
    let status = StatusResponse::for_name(name);

    if json_mode {
        if let Err(e) = print_json(&status) {
            tracing::error!("Failed to print status: {}", e);
        }
        return;
    }

    println!("{}", status.status);
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Print a module's schema document or its summary.
pub fn cmd_show(json_mode: bool, name: &str, summary: bool) -> Result<(), CliError> {
    let catalog = SchemaCatalog::global()?;
    let module: ModuleName = name.parse()?;
    let schema = catalog.get_by_name(name)?;

    if !summary {
        print_json(schema)?;
        return Ok(());
    }

    let summary = SchemaSummary::from_schema(module, schema);
    if json_mode {
        print_json(&summary)?;
        return Ok(());
    }

    println!("{}", summary.title);
    println!("{}", "=".repeat(summary.title.chars().count()));
    println!("Module:           {}", module);
    println!("Status:           {}", module_status(module.as_str()));
    println!("Schema ID:        {}", summary.schema_id);
    println!(
        "Protocol version: {}",
        summary.protocol_version.as_deref().unwrap_or("-")
    );
    println!("Description:      {}", summary.description);
    println!();
    println!("Properties ({}):", summary.properties.len());
    for property in &summary.properties {
        let marker = if summary.is_required(property) { "*" } else { " " };
        println!("  {} {}", marker, property);
    }
    println!();
    println!("Definitions: {}", summary.definitions.join(", "));
    println!("Enums:       {}", summary.enum_count);

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Lint the catalog, or one module of it.
pub fn cmd_check(format: CheckFormat, module: Option<&str>, strict: bool) -> Result<(), CliError> {
    let catalog = SchemaCatalog::global()?;

    let report = match module {
        Some(name) => {
            let schema = catalog.get_by_name(name)?;
            CatalogLintReport {
                reports: vec![lint_schema(name, schema)],
            }
        }
        None => lint_catalog(catalog),
    };

    let errors = report.error_count();
    let warnings = report.warning_count();

    match format {
        CheckFormat::Json => print_json(&report)?,
        CheckFormat::Junit => print!("{}", render_junit(&report)),
        CheckFormat::Text => print_check_text(&report),
    }

    if errors > 0 || (strict && warnings > 0) {
        return Err(CliError::CheckFailed { errors, warnings });
    }
    Ok(())
}

fn print_check_text(report: &CatalogLintReport) {
    for module_report in &report.reports {
            if module_report.findings.is_empty() {
                println!("  ok    {}", module_report.schema);
                continue;
            }
        for finding in &module_report.findings {
            let label = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warn ",
            };
            println!(
                "  {} {} {} {}: {}",
                label, module_report.schema, finding.code, finding.path, finding.message
            );
        }
    }
    println!();
    println!(
        "{} schema(s) checked: {} error(s), {} warning(s)",
        report.reports.len(),
        report.error_count(),
        report.warning_count()
    );
}

// =============================================================================
// JUNIT REPORT
// =============================================================================

/// Render a lint report as JUnit XML.
///
/// Each schema is a testsuite. Errors become failed testcases and warnings
/// skipped ones; a schema without findings is one passing
/// `schema-validation` testcase. `tests` on the root counts schemas.
pub fn render_junit(report: &CatalogLintReport) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites name=\"MPLP Schema Validation\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
        report.reports.len(),
        report.error_count(),
        report.warning_count()
    ));

    for module_report in &report.reports {
        let schema = xml_escape(&module_report.schema);
        let failures = module_report.error_count();
        let skipped = module_report.warning_count();
        xml.push_str(&format!(
            "  <testsuite name=\"{schema}\" tests=\"{}\" failures=\"{failures}\" errors=\"0\" skipped=\"{skipped}\">\n",
            module_report.findings.len().max(1)
        ));

        if module_report.findings.is_empty() {
            xml.push_str(&format!(
                "    <testcase name=\"schema-validation\" classname=\"{schema}\" />\n"
            ));
        }
        for finding in &module_report.findings {
            let message = xml_escape(&finding.message);
            xml.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"{schema}\">\n",
                finding.code
            ));
            match finding.severity {
                Severity::Error => xml.push_str(&format!(
                    "      <failure message=\"{message}\" type=\"{}\">Location: {}</failure>\n",
                    finding.code,
                    xml_escape(&finding.path)
                )),
                Severity::Warning => {
                    xml.push_str(&format!("      <skipped message=\"{message}\" />\n"))
                }
            }
            xml.push_str("    </testcase>\n");
        }
        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>\n");
    xml
}

/// Escape the five XML special characters for text and attribute values.
fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// COMPAT COMMAND
// =============================================================================

/// Compare an older schema file against the embedded schema of `name`.
pub fn cmd_compat(json_mode: bool, name: &str, against: &Path) -> Result<(), CliError> {
    let catalog = SchemaCatalog::global()?;
    let module: ModuleName = name.parse()?;
    let target = catalog.get_by_name(name)?;

    let path = validate_input_file(against, MAX_SCHEMA_BYTES as u64)?;
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CatalogError::IoError(format!("Read file: {}", e)))?;
    let source: Value = serde_json::from_str(&text).map_err(|e| CatalogError::SchemaParse {
        module: against.display().to_string(),
        message: e.to_string(),
    })?;

    let report = check_compatibility(&source, target);
    let breaking = report.breaking_changes().count();

    if json_mode {
        print_json(&report)?;
    } else {
        println!("Compatibility: {} ({} -> embedded)", module, against.display());
        println!(
            "Versions: {} -> {}",
            report.source_version.as_deref().unwrap_or("-"),
            report.target_version.as_deref().unwrap_or("-")
        );
        if report.changes.is_empty() {
            println!("No changes detected");
        }
        for change in &report.changes {
            let label = if change.breaking { "breaking" } else { "warning " };
            println!("  {} {} {}: {}", label, change.kind, change.path, change.message);
        }
        println!();
        println!(
            "{}",
            if report.compatible() {
                "Compatible"
            } else {
                "NOT compatible"
            }
        );
    }

    if breaking > 0 {
        return Err(CliError::Incompatible { breaking });
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write every embedded schema, byte for byte, to `<output>/mplp-<module>.json`.
pub fn cmd_export(json_mode: bool, output: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(output).map_err(|e| {
        CatalogError::IoError(format!(
            "Cannot create output directory '{}': {}",
            output.display(),
            e
        ))
    })?;

    let mut written = Vec::new();
    for module in ModuleName::ALL {
        let path = output.join(module.schema_file_name());
        std::fs::write(&path, schema_source(module))
            .map_err(|e| CatalogError::IoError(format!("Write {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Exported schema");
        written.push(path);
    }

    if json_mode {
        let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        print_json(&serde_json::json!({ "files": files }))?;
    } else {
        println!(
            "Exported {} schemas to {}",
            written.len(),
            output.display()
        );
    }
    Ok(())
}

// =============================================================================
// DIGEST COMMAND
// =============================================================================

/// Print the catalog checksum and BLAKE3 hash.
pub fn cmd_digest(json_mode: bool) -> Result<(), CliError> {
    let catalog = SchemaCatalog::global()?;
    let checksum = catalog_checksum(catalog);
    let hash = catalog_crypto_hash(catalog);

    if json_mode {
        print_json(&serde_json::json!({
            "modules": catalog.len(),
            "checksum": checksum,
            "checksum_hex": format!("{checksum:016x}"),
            "algorithm": "blake3",
            "hash": hash,
        }))?;
        return Ok(());
    }

    println!("Modules:  {}", catalog.len());
    println!("Checksum: {:016x}", checksum);
    println!("BLAKE3:   {}", hash);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CliError> {
    let config = MplpConfig::load(config_path)?;
    let server = config.server.with_overrides(host, port);
    let state = AppState::embedded()?;

    println!("MPLP Schema Catalog Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:    {}", server.host);
    println!("  Port:    {}", server.port);
    println!("  Modules: {}", state.catalog.len());
    println!();
    println!("Endpoints:");
    println!("  GET  /modules               - List modules");
    println!("  GET  /modules/{{name}}        - Module summary");
    println!("  GET  /modules/{{name}}/schema - Schema document");
    println!("  GET  /status/{{name}}         - Tier status");
    println!("  GET  /tiers                 - Modules by tier");
    println!("  GET  /schemas               - All schemas");
    println!("  GET  /check                 - Lint the catalog");
    println!("  POST /compat/{{name}}         - Compatibility check");
    println!("  GET  /digest                - Catalog checksum");
    println!("  GET  /health                - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&server.bind_addr(), state).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
