//! MCP (Model Context Protocol) server for codingops.
//!
//! Exposes the CODING DevOps tools to AI assistants over JSON-RPC on stdio.

pub mod args;
pub mod dispatcher;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use dispatcher::RequestDispatcher;
pub use server::McpServer;
pub use tools::{available_tools, ToolName};
