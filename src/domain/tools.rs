//! Tools exposed via Model Context Protocol
//!
//! Arithmetic and clock tools are pure. The docs tools go through the
//! cache-aside fetcher; upstream failures come back as `isError` text results
//! so a single failing fetch never turns into a JSON-RPC error.

use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::docs::{paginate::paginate, search, sections};
use crate::domain::utils::{
    format_number, normalize_doc_path, normalize_max_chars, normalize_search_limit,
};
use crate::errors::AppError;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};
use crate::AppState;

#[macros::mcp_tool(name = "add", description = "Add two numbers")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AddTool {
    /// First operand
    pub a: f64,
    /// Second operand
    pub b: f64,
}

#[macros::mcp_tool(name = "multiply", description = "Multiply two numbers")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct MultiplyTool {
    /// First factor
    pub a: f64,
    /// Second factor
    pub b: f64,
}

#[macros::mcp_tool(name = "get-time", description = "Current UTC time in ISO-8601 format")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTimeTool {}

#[macros::mcp_tool(
    name = "search-hono-docs",
    description = "Search the Hono documentation index and return matching pages"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchHonoDocsTool {
    /// Case-insensitive text to look for
    pub query: String,
    /// Maximum number of results (1-50, default 5)
    pub limit: Option<u32>,
}

#[macros::mcp_tool(
    name = "get-hono-page",
    description = "Fetch a Hono documentation page as markdown, paginated by characters"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetHonoPageTool {
    /// Documentation path such as /docs/api/routing
    pub path: String,
    /// Character offset to start from (default 0)
    pub offset: Option<u64>,
    /// Maximum characters to return (1000-120000, default 40000)
    #[serde(rename = "maxChars")]
    pub max_chars: Option<u32>,
}

#[macros::mcp_tool(
    name = "list-sections",
    description = "List the section headings of a Hono documentation page"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListSectionsTool {
    /// Documentation path such as /docs/api/routing
    pub path: String,
}

/// The registered tool set. Built once and never mutated afterwards.
pub fn tools_registry() -> &'static [Tool] {
    static TOOLS: OnceLock<Vec<Tool>> = OnceLock::new();
    TOOLS.get_or_init(|| {
        vec![
            AddTool::tool(),
            MultiplyTool::tool(),
            GetTimeTool::tool(),
            SearchHonoDocsTool::tool(),
            GetHonoPageTool::tool(),
            ListSectionsTool::tool(),
        ]
    })
}

pub fn build_tools_list() -> Vec<Tool> {
    tools_registry().to_vec()
}

pub fn add_text(a: f64, b: f64) -> String {
    format!(
        "{} + {} = {}",
        format_number(a),
        format_number(b),
        format_number(a + b)
    )
}

pub fn multiply_text(a: f64, b: f64) -> String {
    format!(
        "{} × {} = {}",
        format_number(a),
        format_number(b),
        format_number(a * b)
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };
    let arguments = tool_call.arguments.unwrap_or_default();

    let outcome = match tool_call.name.as_str() {
        "add" => parse_arguments::<AddTool>(arguments)
            .map(|args| ToolOutput::text(add_text(args.a, args.b))),
        "multiply" => parse_arguments::<MultiplyTool>(arguments)
            .map(|args| ToolOutput::text(multiply_text(args.a, args.b))),
        "get-time" => parse_arguments::<GetTimeTool>(arguments).map(|_| {
            ToolOutput::text(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        }),
        "search-hono-docs" => match parse_arguments::<SearchHonoDocsTool>(arguments) {
            Ok(args) => search_docs(state, args).await,
            Err(err) => Err(err),
        },
        "get-hono-page" => match parse_arguments::<GetHonoPageTool>(arguments) {
            Ok(args) => get_page(state, args).await,
            Err(err) => Err(err),
        },
        "list-sections" => match parse_arguments::<ListSectionsTool>(arguments) {
            Ok(args) => list_sections(state, args).await,
            Err(err) => Err(err),
        },
        _ => Err(AppError::not_found("tool_not_found", "unknown tool name")),
    };

    match outcome.and_then(ToolOutput::into_value) {
        Ok(value) => json_rpc_result(id, value),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|_| {
        AppError::bad_request(
            "invalid_arguments",
            "tool arguments do not match the input schema",
        )
    })
}

struct ToolOutput {
    text: String,
    is_error: bool,
    structured: Option<Map<String, Value>>,
}

impl ToolOutput {
    fn text(text: String) -> Self {
        Self {
            text,
            is_error: false,
            structured: None,
        }
    }

    fn failure(text: String) -> Self {
        Self {
            text,
            is_error: true,
            structured: None,
        }
    }

    fn with_structured(mut self, structured: Map<String, Value>) -> Self {
        self.structured = Some(structured);
        self
    }

    fn into_value(self) -> Result<Value, AppError> {
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(self.text, None, None))],
            is_error: self.is_error.then_some(true),
            meta: None,
            structured_content: self.structured,
        })
        .map_err(|err| AppError::internal(format!("tool result serialization failed: {err}")))
    }
}

async fn fetch_document(state: &AppState, url: &str) -> Result<String, String> {
    match state
        .fetcher
        .fetch_cached_with_cancel(url, state.cache_ttl_seconds, &state.shutdown)
        .await
    {
        Ok(fetched) if fetched.is_success() => {
            debug!(url, cache = ?fetched.cache, "document resolved");
            Ok(fetched.text)
        }
        Ok(fetched) => Err(format!(
            "Failed to fetch {url}: HTTP {}",
            fetched.status.as_u16()
        )),
        Err(err) => Err(format!("Failed to fetch {url}: {err}")),
    }
}

async fn search_docs(state: &AppState, args: SearchHonoDocsTool) -> Result<ToolOutput, AppError> {
    let limit = normalize_search_limit(args.limit)?;

    let index_text = match fetch_document(state, &state.site.index_url()).await {
        Ok(text) => text,
        Err(message) => {
            return Ok(ToolOutput::failure(format!(
                "Error searching Hono docs: {message}"
            )))
        }
    };

    let results = search::search(&index_text, &args.query, limit, &state.site.base_url);
    let text = search::render_results(&args.query, &results);
    Ok(ToolOutput::text(text).with_structured(Map::from_iter([
        ("query".to_string(), json!(args.query)),
        ("results".to_string(), json!(results)),
    ])))
}

async fn get_page(state: &AppState, args: GetHonoPageTool) -> Result<ToolOutput, AppError> {
    let path = normalize_doc_path(&args.path)?;
    let max_chars = normalize_max_chars(args.max_chars)?;
    let offset = usize::try_from(args.offset.unwrap_or(0)).map_err(|_| {
        AppError::bad_request("invalid_offset", "offset is out of range")
    })?;

    let url = state.site.page_url(&path);
    let full_text = match fetch_document(state, &url).await {
        Ok(text) => text,
        Err(message) => {
            return Ok(ToolOutput::failure(format!(
                "Error fetching Hono page {path}: {message}"
            )))
        }
    };

    let page = paginate(&full_text, offset, max_chars);
    Ok(ToolOutput::text(page.render()).with_structured(Map::from_iter([
        ("path".to_string(), json!(path)),
        ("url".to_string(), json!(url)),
        ("offset".to_string(), json!(page.offset)),
        ("nextOffset".to_string(), json!(page.next_offset)),
        ("totalLength".to_string(), json!(page.total_chars)),
    ])))
}

async fn list_sections(state: &AppState, args: ListSectionsTool) -> Result<ToolOutput, AppError> {
    let path = normalize_doc_path(&args.path)?;

    let markdown = match fetch_document(state, &state.site.page_url(&path)).await {
        Ok(text) => text,
        Err(message) => {
            return Ok(ToolOutput::failure(format!(
                "Error listing sections of {path}: {message}"
            )))
        }
    };

    let headings = sections::extract_sections(&markdown);
    let text = sections::render_outline(&path, &headings);
    Ok(ToolOutput::text(text).with_structured(Map::from_iter([
        ("path".to_string(), json!(path)),
        ("sections".to_string(), json!(headings)),
    ])))
}

#[cfg(test)]
mod tests {
    use super::{add_text, build_tools_list, multiply_text, parse_arguments, GetHonoPageTool};
    use serde_json::{json, Value};

    #[test]
    fn arithmetic_text() {
        assert_eq!(add_text(5.0, 3.0), "5 + 3 = 8");
        assert_eq!(multiply_text(5.0, 3.0), "5 × 3 = 15");
        assert_eq!(add_text(1.5, 2.0), "1.5 + 2 = 3.5");
    }

    #[test]
    fn registry_lists_tools_in_order() {
        let names: Vec<String> = build_tools_list()
            .into_iter()
            .map(|tool| tool.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "add",
                "multiply",
                "get-time",
                "search-hono-docs",
                "get-hono-page",
                "list-sections"
            ]
        );
    }

    #[test]
    fn page_arguments_use_camel_case_max_chars() {
        let arguments = json!({"path": "/docs/api/routing", "maxChars": 2000});
        let Value::Object(arguments) = arguments else {
            panic!("object expected");
        };
        let parsed: GetHonoPageTool = parse_arguments(arguments).expect("arguments parse");
        assert_eq!(parsed.max_chars, Some(2000));
        assert_eq!(parsed.offset, None);
    }

    #[test]
    fn rejects_arguments_of_wrong_type() {
        let Value::Object(arguments) = json!({"a": "five", "b": 3}) else {
            panic!("object expected");
        };
        let error = parse_arguments::<super::AddTool>(arguments).expect_err("expected bad args");
        assert!(error.to_string().contains("bad request"));
    }
}
