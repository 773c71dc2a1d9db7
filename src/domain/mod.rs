//! Tool and prompt integrations
//!
//! Provides the documentation tools, arithmetic helpers and prompt templates
//! exposed over the MCP protocol.

pub mod prompts;
pub mod tools;
pub mod utils;
