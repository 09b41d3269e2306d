//! openmcp-mcp: Tool-Invocation Surface
//!
//! Exposes the capability registry as MCP tools over JSON-RPC 2.0. Every
//! tagged capability becomes one tool; `tools/call` runs the same handler the
//! HTTP route does, so both transports return the same payload.
//!
//! ```text
//! POST /mcp              JSON-RPC endpoint
//! GET  /mcp/tools        tools/list shortcut
//! POST /mcp/tools/call   tools/call shortcut ({name, arguments})
//! ```

pub mod protocol;
pub mod router;
pub mod server;

pub use protocol::{JsonRpcError, McpRequest, McpResponse};
pub use router::create_router;
pub use server::{McpServer, ToolInfo};

/// MCP protocol revision implemented here
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "openmcp";

pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
