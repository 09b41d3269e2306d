//! openmcp-web: Dispatch Facade
//!
//! Wires every provider operation into a capability and serves the registry
//! over both transports from one router:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   openmcp-server (:8000)                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  /hot/{platform}, /zhihu, ... /news   hot lists              │
//! │  /get_weather/*                       weather                │
//! │  /login/*, /search/*, /health         music                  │
//! │  /api-registry/apis                   capability catalog     │
//! │  /mcp, /mcp/tools, /mcp/tools/call    MCP tool invocation    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The facade holds no business logic: each route resolves to a capability
//! and the capability's handler calls into `openmcp-upstream`.

pub mod capabilities;
pub mod dispatch;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, Providers};
