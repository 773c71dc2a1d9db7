//! Prompt templates exposed via Model Context Protocol

use std::collections::HashMap;

use rust_mcp_sdk::schema::{
    ContentBlock, GetPromptResult, Prompt, PromptArgument, PromptMessage, Role, TextContent,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};

pub const GREETING_PROMPT: &str = "greeting-template";

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<HashMap<String, String>>,
}

pub fn build_prompts_list() -> Vec<Prompt> {
    vec![Prompt {
        name: GREETING_PROMPT.to_string(),
        title: None,
        description: Some("A simple greeting prompt template".to_string()),
        arguments: vec![PromptArgument {
            name: "name".to_string(),
            title: None,
            description: Some("Name of the person to greet".to_string()),
            required: Some(true),
        }],
        icons: vec![],
        meta: None,
    }]
}

pub fn greeting_text(name: &str) -> String {
    format!("Please greet {name} in a friendly and professional manner.")
}

pub fn handle_prompts_get(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let request: GetPromptParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    if request.name != GREETING_PROMPT {
        return app_error_to_json_rpc(
            id,
            AppError::not_found("prompt_not_found", "unknown prompt name"),
        );
    }

    let Some(name) = request
        .arguments
        .as_ref()
        .and_then(|arguments| arguments.get("name"))
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
    else {
        return app_error_to_json_rpc(
            id,
            AppError::bad_request("missing_argument", "argument 'name' is required"),
        );
    };

    let result = GetPromptResult {
        description: Some("Greeting prompt".to_string()),
        messages: vec![PromptMessage {
            role: Role::User,
            content: ContentBlock::from(TextContent::new(greeting_text(name), None, None)),
        }],
        meta: None,
    };

    match serde_json::to_value(result) {
        Ok(value) => json_rpc_result(id, value),
        Err(err) => app_error_to_json_rpc(
            id,
            AppError::internal(format!("prompt result serialization failed: {err}")),
        ),
    }
}
