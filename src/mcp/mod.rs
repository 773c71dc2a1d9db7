//! Model Context Protocol server handling and JSON-RPC implementations
//!
//! Covers JSON-RPC validation, version negotiation, response formatting and
//! method routing.

pub mod rpc;
pub mod server;
