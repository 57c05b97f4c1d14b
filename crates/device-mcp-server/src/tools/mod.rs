//! Device tool contract and registry
//!
//! Every device operation is a [`DeviceTool`]: a named unit with a
//! description, a declared option schema, a handler, and a reverse mapping
//! from planner actions back into invocations. The closed set of tools is
//! registered in a name-keyed [`ToolRegistry`] that the MCP handler routes
//! through.
//!
//! # Error policy
//!
//! Argument-shape problems abort the call with a protocol error
//! (`invalid_params`) before the driver is touched. Most driver failures
//! are captured into an error-flagged [`CallToolResult`] so callers always
//! receive a structured response; the exceptions (device resolution,
//! image push) abort as hard errors because the tool cannot produce a
//! meaningful envelope without them.

pub mod devices;
pub mod images;
pub mod record;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{
    CallToolResult, Content, ErrorData as McpError, JsonObject, Tool,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use device_core::driver::DeviceDriver;
use device_core::error::DriverError;
use device_core::model::{DeviceHandle, DeviceSelector, Platform};

use crate::action::{overlay_recognized, ActionDescriptor, ToolInvocation};
use crate::args;

pub use devices::{ListAvailableDevicesTool, SelectDeviceTool};
pub use images::{ClearImageTool, PushImageTool};
pub use record::ScreenRecordTool;

/// Semantic type of a declared tool option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// String-valued option
    String,
    /// Double-precision numeric option
    Number,
    /// Boolean flag
    Boolean,
}

impl OptionKind {
    /// The JSON-Schema type name for this kind
    pub fn json_type(&self) -> &'static str {
        match self {
            OptionKind::String => "string",
            OptionKind::Number => "number",
            OptionKind::Boolean => "boolean",
        }
    }
}

/// One declared argument of a tool
///
/// Declared options serve both documentation (surfaced to the planner via
/// `tools/list`) and upstream validation before invocation.
#[derive(Debug, Clone, Copy)]
pub struct ToolOption {
    /// Argument name, case-sensitive
    pub name: &'static str,
    /// Semantic type
    pub kind: OptionKind,
    /// Human-readable description
    pub description: &'static str,
    /// Optional enumeration of legal values
    pub allowed: Option<&'static [&'static str]>,
}

/// Shared `platform` option used by every device-scoped tool
pub(crate) const PLATFORM_OPTION: ToolOption = ToolOption {
    name: "platform",
    kind: OptionKind::String,
    description: "The platform type of the target device",
    allowed: Some(&["android", "ios"]),
};

/// Shared `serial` option used by every device-scoped tool
pub(crate) const SERIAL_OPTION: ToolOption = ToolOption {
    name: "serial",
    kind: OptionKind::String,
    description: "The device serial number or UDID",
    allowed: None,
};

/// Renders declared options into a JSON-Schema object for `tools/list`
pub fn input_schema(options: &[ToolOption]) -> Arc<JsonObject> {
    let mut properties = JsonObject::new();
    for option in options {
        let mut property = JsonObject::new();
        property.insert("type".to_string(), json!(option.kind.json_type()));
        property.insert("description".to_string(), json!(option.description));
        if let Some(allowed) = option.allowed {
            property.insert("enum".to_string(), json!(allowed));
        }
        properties.insert(option.name.to_string(), Value::Object(property));
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    Arc::new(schema)
}

/// A named, remotely invokable device operation
///
/// Implementations are stateless; all per-call state lives in the argument
/// object and the driver handle resolved inside the call.
#[async_trait]
pub trait DeviceTool: Send + Sync {
    /// Stable identifier used for routing
    fn name(&self) -> &'static str;

    /// Human-readable summary surfaced to the upstream planner
    fn description(&self) -> &'static str;

    /// Declared argument schema
    fn options(&self) -> &'static [ToolOption];

    /// Argument a bare-scalar action parameter maps onto, if any
    fn primary_argument(&self) -> Option<&'static str> {
        None
    }

    /// Executes the tool against the driver facade
    ///
    /// `cancel` fires when the caller abandons the invocation; long-running
    /// operations (screen recording) must observe it.
    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        args: &JsonObject,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError>;

    /// Converts a planner action into an invocation of this tool
    ///
    /// Precedence, highest first: custom overrides, nested mapping fields,
    /// the bare-scalar primary argument. Only keys declared in
    /// [`DeviceTool::options`] are recognized.
    fn to_invocation(&self, action: &ActionDescriptor) -> ToolInvocation {
        let mut arguments = JsonObject::new();

        if let Some(primary) = self.primary_argument() {
            match &action.params {
                Value::String(s) if !s.is_empty() => {
                    arguments.insert(primary.to_string(), Value::String(s.clone()));
                }
                Value::Number(n) => {
                    arguments.insert(primary.to_string(), Value::Number(n.clone()));
                }
                Value::Bool(b) => {
                    arguments.insert(primary.to_string(), Value::Bool(*b));
                }
                _ => {}
            }
        }

        let recognized: Vec<&str> = self.options().iter().map(|o| o.name).collect();
        if let Value::Object(params) = &action.params {
            overlay_recognized(&mut arguments, params, &recognized);
        }
        overlay_recognized(&mut arguments, &action.custom, &recognized);

        ToolInvocation {
            name: self.name().to_string(),
            arguments,
        }
    }
}

/// Builds the uniform success envelope `{"message": …, "data": …}`
pub fn success_result<T: Serialize>(
    message: impl Into<String>,
    data: &T,
) -> Result<CallToolResult, McpError> {
    let envelope = json!({
        "message": message.into(),
        "data": data,
    });
    let text = serde_json::to_string(&envelope).map_err(|e| {
        McpError::internal_error(format!("failed to serialize tool response: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Builds an error-flagged result carrying a human-readable message
///
/// Used for driver failures that should reach the caller as structured
/// content rather than a raised protocol fault.
pub fn failure_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Maps a driver error onto the MCP error split
///
/// Selection and parameter problems are the caller's to fix
/// (`invalid_params`); everything else is an internal failure.
pub fn convert_driver_error_to_mcp(error: DriverError) -> McpError {
    match &error {
        DriverError::DeviceNotFound { .. }
        | DriverError::InvalidParameter { .. }
        | DriverError::NotAnImage { .. } => McpError::invalid_params(format!("{}", error), None),
        _ => McpError::internal_error(format!("{}", error), None),
    }
}

/// Resolves the target device from `platform`/`serial` arguments
///
/// This is the setup step every device-scoped tool runs before its body:
/// it parses the selector fields and asks the facade for a live handle.
pub async fn resolve_device(
    driver: &Arc<dyn DeviceDriver>,
    args: &JsonObject,
) -> Result<DeviceHandle, McpError> {
    let platform = match args::string_arg(args, "platform") {
        s if s.is_empty() => None,
        s => Some(
            s.parse::<Platform>()
                .map_err(convert_driver_error_to_mcp)?,
        ),
    };
    let serial = match args::string_arg(args, "serial") {
        s if s.is_empty() => None,
        s => Some(s),
    };

    let selector = DeviceSelector { platform, serial };
    driver
        .select_device(&selector)
        .await
        .map_err(convert_driver_error_to_mcp)
}

/// Name-keyed lookup table over the closed set of device tools
pub struct ToolRegistry {
    tools: Vec<Arc<dyn DeviceTool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Creates a registry from an explicit tool set
    pub fn new(tools: Vec<Arc<dyn DeviceTool>>) -> Self {
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name(), i))
            .collect();
        Self { tools, index }
    }

    /// Creates the standard registry with all five device tools
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(ListAvailableDevicesTool),
            Arc::new(SelectDeviceTool),
            Arc::new(ScreenRecordTool),
            Arc::new(PushImageTool),
            Arc::new(ClearImageTool),
        ])
    }

    /// Looks a tool up by its routing name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DeviceTool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Iterates the registered tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DeviceTool>> {
        self.tools.iter()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Renders the registry for a `tools/list` response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| {
                Tool::new(
                    tool.name(),
                    tool.description(),
                    input_schema(tool.options()),
                )
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
