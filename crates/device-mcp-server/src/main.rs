//! device-mcp: Mobile device MCP server binary

use std::sync::Arc;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use device_core::driver::MockDriver;
use device_mcp_server::mcp::DeviceMcpServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    // Respects RUST_LOG environment variable
    // Default level: info
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("device_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    info!("device-mcp server starting...");
    info!("Protocol: Model Context Protocol (MCP)");
    info!("Transport: stdio");

    // MockDriver stands in until a transport-backed driver (ADB/usbmuxd)
    // is wired up by the embedding application.
    let driver = Arc::new(MockDriver::new());
    info!("Driver initialized: MockDriver (development backend)");

    let server = DeviceMcpServer::new(driver);

    info!("Initializing stdio transport...");

    // Start the server with stdio transport
    // This will handle MCP protocol communication via stdin/stdout
    let service = server.serve(stdio()).await?;

    info!("device-mcp server initialized successfully");
    info!("Server info: {:?}", service.peer_info());
    info!("Waiting for MCP requests...");

    // Wait for the service to complete (blocks until shutdown)
    service.waiting().await?;

    info!("device-mcp server shutting down");
    Ok(())
}
