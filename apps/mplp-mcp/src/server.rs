//! # MPLP MCP Server
//!
//! Implements `ServerHandler` with 5 MCP tools that proxy to the MPLP HTTP API.

use crate::client::MplpClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to an MPLP catalog HTTP API.
#[derive(Clone)]
pub struct MplpMcp {
    client: MplpClient,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

// =============================================================================
// TOOL PARAMETER STRUCTS
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StatusParams {
    /// Any name; names that are not modules report `unknown`.
    #[schemars(description = "Name to classify (e.g. 'context', 'network')")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ModuleParams {
    /// One of the ten protocol module names.
    #[schemars(
        description = "Module name: context, plan, confirm, trace, role, extension, core, collab, dialog or network"
    )]
    pub module: String,
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl MplpMcp {
    pub fn new(client: MplpClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List the MPLP protocol modules with their maturity tier")]
    async fn mplp_modules(&self) -> Result<CallToolResult, McpError> {
        match self.client.modules().await {
            Ok(resp) => Ok(text_result(format_modules(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Get the maturity tier of a name (production-ready, enterprise-standard, pending or unknown)")]
    async fn mplp_status(
        &self,
        params: Parameters<StatusParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.status(&params.0.name).await {
            Ok(resp) => Ok(text_result(format_status(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Get the full JSON Schema document of a module")]
    async fn mplp_schema(
        &self,
        params: Parameters<ModuleParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.schema(&params.0.module).await {
            Ok(resp) => {
                let text = serde_json::to_string_pretty(&resp)
                    .map_err(|e| McpError::internal_error(format!("{e}"), None))?;
                Ok(text_result(text))
            }
            Err(e) => Err(McpError::invalid_params(format!("{e}"), None)),
        }
    }

    #[tool(description = "Summarize a module's schema: title, version, properties and required fields")]
    async fn mplp_summary(
        &self,
        params: Parameters<ModuleParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.summary(&params.0.module).await {
            Ok(resp) => Ok(text_result(format_summary(&resp))),
            Err(e) => Err(McpError::invalid_params(format!("{e}"), None)),
        }
    }

    #[tool(description = "Lint every schema in the catalog against the MPLP conventions")]
    async fn mplp_check(&self) -> Result<CallToolResult, McpError> {
        match self.client.check().await {
            Ok(resp) => Ok(text_result(format_check(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for MplpMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "MPLP schema catalog server. Use tools to list protocol modules, \
                 look up maturity tiers, read module schemas, and lint the catalog."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// RESPONSE FORMATTING
// =============================================================================

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn str_of<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("?")
}

fn strings_of(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// One line per module, followed by tier counts.
fn format_modules(resp: &Value) -> String {
    let mut parts = Vec::new();
    if let Some(modules) = resp.get("modules").and_then(Value::as_array) {
        parts.push(format!("Modules ({}):", modules.len()));
        for module in modules {
            parts.push(format!(
                "  {:<10} {}",
                str_of(module, "name"),
                str_of(module, "status")
            ));
        }
    }
    if let Some(counts) = resp.get("counts") {
        let count = |key: &str| counts.get(key).and_then(Value::as_u64).unwrap_or(0);
        parts.push(format!(
            "Production-ready: {}, enterprise-standard: {}, pending: {}",
            count("production_ready"),
            count("enterprise_standard"),
            count("pending")
        ));
    }
    if parts.is_empty() {
        "No modules.".to_string()
    } else {
        parts.join("\n")
    }
}

fn format_status(resp: &Value) -> String {
    format!("{}: {}", str_of(resp, "name"), str_of(resp, "status"))
}

/// Module header plus the fields of its schema summary.
fn format_summary(resp: &Value) -> String {
    let mut parts = vec![format!(
        "Module: {} ({})",
        str_of(resp, "name"),
        str_of(resp, "status")
    )];

    let Some(summary) = resp.get("summary") else {
        return parts.join("\n");
    };

    parts.push(format!("Title: {}", str_of(summary, "title")));
    if let Some(version) = summary.get("protocol_version").and_then(Value::as_str) {
        parts.push(format!("Protocol version: {version}"));
    }
    parts.push(format!("Schema: {}", str_of(summary, "schema_id")));

    let properties = strings_of(summary, "properties");
    if !properties.is_empty() {
        parts.push(format!(
            "Properties ({}): {}",
            properties.len(),
            properties.join(", ")
        ));
    }
    let required = strings_of(summary, "required");
    if !required.is_empty() {
        parts.push(format!("Required: {}", required.join(", ")));
    }
    let definitions = strings_of(summary, "definitions");
    if !definitions.is_empty() {
        parts.push(format!("Definitions: {}", definitions.join(", ")));
    }
    parts.join("\n")
}

/// Verdict line followed by every finding.
fn format_check(resp: &Value) -> String {
    let passed = resp.get("passed").and_then(Value::as_bool).unwrap_or(false);
    let errors = resp.get("errors").and_then(Value::as_u64).unwrap_or(0);
    let warnings = resp.get("warnings").and_then(Value::as_u64).unwrap_or(0);

    let mut parts = vec![format!(
        "{}: {errors} error(s), {warnings} warning(s)",
        if passed { "Passed" } else { "Failed" }
    )];

    let reports = resp
        .get("report")
        .and_then(|r| r.get("reports"))
        .and_then(Value::as_array);
    for report in reports.into_iter().flatten() {
        let schema = str_of(report, "schema");
        let findings = report.get("findings").and_then(Value::as_array);
        for finding in findings.into_iter().flatten() {
            parts.push(format!(
                "  [{}] {} {}{}: {}",
                str_of(finding, "severity"),
                str_of(finding, "code"),
                schema,
                str_of(finding, "path"),
                str_of(finding, "message")
            ));
        }
    }
    parts.join("\n")
}
