//! Device enumeration and selection tools

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ErrorData as McpError, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use device_core::driver::DeviceDriver;

use super::{
    failure_result, resolve_device, success_result, DeviceTool, ToolOption, PLATFORM_OPTION,
    SERIAL_OPTION,
};

/// Payload returned by `list_available_devices`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceListData {
    /// Android device serial numbers
    pub android_devices: Vec<String>,
    /// iOS device UDIDs
    pub ios_devices: Vec<String>,
    /// Total number of available devices
    pub total_count: usize,
    /// Number of Android devices
    pub android_count: usize,
    /// Number of iOS devices
    pub ios_count: usize,
}

/// The `list_available_devices` tool
pub struct ListAvailableDevicesTool;

#[async_trait]
impl DeviceTool for ListAvailableDevicesTool {
    fn name(&self) -> &'static str {
        "list_available_devices"
    }

    fn description(&self) -> &'static str {
        "List all available devices including Android devices and iOS devices. If there are \
         multiple devices returned, you need to let the user select one of them."
    }

    fn options(&self) -> &'static [ToolOption] {
        &[]
    }

    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        _args: &JsonObject,
        _cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let inventory = match driver.list_devices().await {
            Ok(inventory) => inventory,
            Err(err) => {
                tracing::error!(error = %err, "device enumeration failed");
                return Ok(failure_result(format!("Failed to list devices: {}", err)));
            }
        };

        let message = format!(
            "Found {} available devices ({} Android, {} iOS)",
            inventory.total(),
            inventory.android_count(),
            inventory.ios_count(),
        );
        let data = DeviceListData {
            total_count: inventory.total(),
            android_count: inventory.android_count(),
            ios_count: inventory.ios_count(),
            android_devices: inventory.android,
            ios_devices: inventory.ios,
        };
        success_result(message, &data)
    }
}

/// Payload returned by `select_device`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectDeviceData {
    /// UUID of the selected device
    #[serde(rename = "deviceUUID")]
    pub device_uuid: String,
}

/// The `select_device` tool
pub struct SelectDeviceTool;

#[async_trait]
impl DeviceTool for SelectDeviceTool {
    fn name(&self) -> &'static str {
        "select_device"
    }

    fn description(&self) -> &'static str {
        "Select a device to use from the list of available devices. Use the \
         list_available_devices tool first to get a list of available devices."
    }

    fn options(&self) -> &'static [ToolOption] {
        &[PLATFORM_OPTION, SERIAL_OPTION]
    }

    fn primary_argument(&self) -> Option<&'static str> {
        Some("serial")
    }

    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        args: &JsonObject,
        _cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let device = resolve_device(driver, args).await?;

        let message = format!("Selected device: {}", device.uuid());
        let data = SelectDeviceData {
            device_uuid: device.uuid().to_string(),
        };
        success_result(message, &data)
    }
}
