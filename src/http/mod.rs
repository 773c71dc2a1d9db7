//! HTTP transport layer for the Model Context Protocol
//!
//! Routes `/mcp` plus the status endpoints.

pub mod handlers;
