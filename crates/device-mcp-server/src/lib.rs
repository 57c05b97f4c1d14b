//! device-mcp-server: Mobile device MCP server
//!
//! This library provides the Model Context Protocol (MCP) layer over the
//! [`device_core`] driver facade: a closed set of device tools
//! (enumeration, selection, screen recording, gallery image push/clear)
//! dispatched through a name-keyed registry.

pub mod action;
pub mod args;
pub mod mcp;
pub mod tools;
