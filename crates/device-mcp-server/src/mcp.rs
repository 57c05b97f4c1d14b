//! MCP service implementation with tool routing
//!
//! This module provides the device-mcp MCP server implementation. Tool
//! calls are routed through the name-keyed [`ToolRegistry`] rather than a
//! macro-generated router so that every tool stays a plain trait object
//! with its own reverse mapping.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData as McpError, JsonObject, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use tokio_util::sync::CancellationToken;

use device_core::driver::{DeviceDriver, MockDriver};

use crate::tools::ToolRegistry;

/// Device MCP server
///
/// Exposes the mobile-device tool set over MCP:
///
/// - `list_available_devices`: enumerate Android/iOS devices
/// - `select_device`: resolve a platform/serial pair to a live device
/// - `screenrecord`: record the device screen
/// - `push_image`: push a local or downloaded image into the gallery
/// - `clear_image`: clear pushed gallery images
#[derive(Clone)]
pub struct DeviceMcpServer {
    /// Driver facade shared by all invocations
    driver: Arc<dyn DeviceDriver>,
    /// Registered tools, looked up by name
    tools: Arc<ToolRegistry>,
}

impl DeviceMcpServer {
    /// Creates a server over the given driver with the standard tool set
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use device_core::driver::MockDriver;
    /// use device_mcp_server::mcp::DeviceMcpServer;
    ///
    /// let server = DeviceMcpServer::new(Arc::new(MockDriver::new()));
    /// ```
    pub fn new(driver: Arc<dyn DeviceDriver>) -> Self {
        Self {
            driver,
            tools: Arc::new(ToolRegistry::standard()),
        }
    }

    /// Creates a server backed by [`MockDriver`], for testing and
    /// development
    pub fn new_with_mock() -> Self {
        Self::new(Arc::new(MockDriver::new()))
    }

    /// The tool registry this server routes through
    pub fn registry(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Routes one invocation to the named tool
    pub async fn dispatch(
        &self,
        name: &str,
        args: JsonObject,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.get(name).ok_or_else(|| {
            McpError::invalid_params(format!("unknown tool '{}'", name), None)
        })?;

        tracing::debug!(tool = name, "dispatching tool call");
        tool.call(&self.driver, &args, cancel).await
    }
}

impl Default for DeviceMcpServer {
    fn default() -> Self {
        Self::new_with_mock()
    }
}

impl ServerHandler for DeviceMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Mobile device automation tools. Use list_available_devices first, then pass \
                 the chosen platform and serial to the device-scoped tools."
                    .to_string(),
            ),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: self.tools.list_tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        self.dispatch(&request.name, args, context.ct).await
    }
}
