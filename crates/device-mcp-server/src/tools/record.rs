//! Screen recording tool

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ErrorData as McpError, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use device_core::driver::DeviceDriver;
use device_core::model::{RecordMethod, ScreenRecordOptions};

use super::{
    failure_result, resolve_device, success_result, DeviceTool, OptionKind, ToolOption,
    PLATFORM_OPTION, SERIAL_OPTION,
};
use crate::args;

const OPTIONS: &[ToolOption] = &[
    PLATFORM_OPTION,
    SERIAL_OPTION,
    ToolOption {
        name: "duration",
        kind: OptionKind::Number,
        description: "Recording duration in seconds. If not specified, recording will continue \
                      until the invocation is cancelled. ADB recording is limited to 180 seconds.",
        allowed: None,
    },
    ToolOption {
        name: "screenRecordPath",
        kind: OptionKind::String,
        description: "Custom path for the output video file. If not specified, a timestamped \
                      filename will be generated.",
        allowed: None,
    },
    ToolOption {
        name: "screenRecordWithAudio",
        kind: OptionKind::Boolean,
        description: "Enable audio recording (requires scrcpy and Android 11+). Default: false",
        allowed: None,
    },
    ToolOption {
        name: "screenRecordWithScrcpy",
        kind: OptionKind::Boolean,
        description: "Force use of scrcpy for recording instead of ADB. Default: false \
                      (auto-detect based on audio requirement)",
        allowed: None,
    },
];

/// Payload returned by `screenrecord`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRecordData {
    /// Path to the recorded video file
    pub video_path: String,
    /// Duration of the recording in seconds
    pub duration: f64,
    /// Recording method used
    pub method: RecordMethod,
}

/// The `screenrecord` tool
pub struct ScreenRecordTool;

#[async_trait]
impl DeviceTool for ScreenRecordTool {
    fn name(&self) -> &'static str {
        "screenrecord"
    }

    fn description(&self) -> &'static str {
        "Record the screen of the mobile device. Supports both ADB screenrecord and scrcpy \
         recording methods. ADB recording is limited to 180 seconds, while scrcpy supports \
         longer recordings and audio capture on Android 11+."
    }

    fn options(&self) -> &'static [ToolOption] {
        OPTIONS
    }

    fn primary_argument(&self) -> Option<&'static str> {
        Some("duration")
    }

    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        args: &JsonObject,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let device = resolve_device(driver, args).await?;

        let mut builder = ScreenRecordOptions::builder();
        let duration = args::number_arg(args, "duration");
        if duration > 0.0 {
            builder = builder.duration(duration);
        }
        let output_path = args::string_arg(args, "screenRecordPath");
        if !output_path.is_empty() {
            builder = builder.output_path(output_path);
        }
        let opts = builder
            .with_audio(args::bool_arg(args, "screenRecordWithAudio"))
            .with_scrcpy(args::bool_arg(args, "screenRecordWithScrcpy"))
            .build();

        let video_path = match driver.screen_record(&device, &opts, cancel).await {
            Ok(path) => path,
            Err(err) => {
                tracing::error!(error = %err, device = %device, "screen recording failed");
                return Ok(failure_result(format!("Failed to record screen: {}", err)));
            }
        };

        let message = format!(
            "Screen recording completed successfully. Video saved to: {}",
            video_path.display()
        );
        let data = ScreenRecordData {
            video_path: video_path.to_string_lossy().into_owned(),
            duration: opts.duration.unwrap_or(0.0),
            method: opts.method(),
        };
        success_result(message, &data)
    }
}
