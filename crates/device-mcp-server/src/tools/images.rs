//! Gallery image push and clear tools

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ErrorData as McpError, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use device_core::driver::DeviceDriver;
use device_core::model::DeviceHandle;
use device_core::util::download::download_to_temp;
use device_core::util::image_type::detect_and_rename;

use super::{
    convert_driver_error_to_mcp, failure_result, resolve_device, success_result, DeviceTool,
    OptionKind, ToolOption, PLATFORM_OPTION, SERIAL_OPTION,
};
use crate::args;

const PUSH_OPTIONS: &[ToolOption] = &[
    PLATFORM_OPTION,
    SERIAL_OPTION,
    ToolOption {
        name: "imagePath",
        kind: OptionKind::String,
        description: "Path to the local image file to push to the device",
        allowed: None,
    },
    ToolOption {
        name: "imageUrl",
        kind: OptionKind::String,
        description: "URL of the image to download and push to the device",
        allowed: None,
    },
    ToolOption {
        name: "cleanup",
        kind: OptionKind::Boolean,
        description: "Whether to delete the downloaded file after pushing it to the device",
        allowed: None,
    },
    ToolOption {
        name: "clearBefore",
        kind: OptionKind::Boolean,
        description: "Whether to clear images before pushing (if applicable)",
        allowed: None,
    },
];

/// Payload returned by `push_image`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushImageData {
    /// Path of the image that was pushed
    pub image_path: String,
    /// URL the image was downloaded from, when one was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether images were cleared before pushing
    #[serde(default, skip_serializing_if = "is_false")]
    pub cleared: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A local image file ready to push
///
/// `downloaded` marks files this invocation fetched itself; only those are
/// candidates for post-push cleanup. Ownership of the file belongs to the
/// invocation until it is deleted or handed back to the caller.
#[derive(Debug, Clone)]
pub(crate) struct StagedImage {
    pub path: PathBuf,
    pub source_url: Option<String>,
    pub downloaded: bool,
}

impl StagedImage {
    fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source_url: None,
            downloaded: false,
        }
    }
}

fn remove_best_effort(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(error = %err, path = %path.display(), "failed to remove downloaded image");
    }
}

/// Pushes a staged file, handling pre-clear and downloaded-file cleanup
///
/// Push failure is fatal: the call aborts with a hard error after deleting
/// the downloaded file when `cleanup` was requested. A failed pre-clear is
/// only a warning.
pub(crate) async fn push_staged(
    driver: &Arc<dyn DeviceDriver>,
    device: &DeviceHandle,
    staged: StagedImage,
    cleanup: bool,
    clear_before: bool,
) -> Result<CallToolResult, McpError> {
    let mut cleared = false;
    if clear_before {
        match driver.clear_images(device).await {
            Ok(()) => cleared = true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to clear images before pushing, continuing");
            }
        }
    }

    if let Err(err) = driver.push_image(device, &staged.path).await {
        if staged.downloaded && cleanup {
            remove_best_effort(&staged.path);
        }
        return Err(convert_driver_error_to_mcp(err));
    }

    if staged.downloaded && cleanup {
        tracing::info!(path = %staged.path.display(), "cleaning up downloaded image");
        remove_best_effort(&staged.path);
    }

    let mut message = match staged.source_url {
        Some(ref url) => format!("Successfully downloaded and pushed image from {} to device", url),
        None => "Successfully pushed image to device".to_string(),
    };
    if cleared {
        message.push_str(" (images cleared before pushing)");
    }

    let data = PushImageData {
        image_path: staged.path.to_string_lossy().into_owned(),
        image_url: staged.source_url,
        cleared,
    };
    success_result(message, &data)
}

/// The `push_image` tool
pub struct PushImageTool;

#[async_trait]
impl DeviceTool for PushImageTool {
    fn name(&self) -> &'static str {
        "push_image"
    }

    fn description(&self) -> &'static str {
        "Push an image to the device's gallery. For Android, the image will be pushed to the \
         DCIM/Camera directory. For iOS, the image will be added to the device's photo album."
    }

    fn options(&self) -> &'static [ToolOption] {
        PUSH_OPTIONS
    }

    fn primary_argument(&self) -> Option<&'static str> {
        Some("imageUrl")
    }

    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        args: &JsonObject,
        _cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let image_path = args::string_arg(args, "imagePath");
        let image_url = args::string_arg(args, "imageUrl");
        let cleanup = args::bool_arg(args, "cleanup");
        let clear_before = args::bool_arg(args, "clearBefore");

        // Argument shape is checked before any driver call.
        if image_path.is_empty() && image_url.is_empty() {
            return Err(McpError::invalid_params(
                "either imagePath or imageUrl is required",
                None,
            ));
        }

        let device = resolve_device(driver, args).await?;

        let staged = if !image_url.is_empty() {
            tracing::info!(url = %image_url, "downloading image from URL");
            let downloaded = download_to_temp(&image_url)
                .await
                .map_err(convert_driver_error_to_mcp)?;

            // A file without an image signature is pushed as-is; the
            // download is never deleted on this path.
            let local = match detect_and_rename(&downloaded) {
                Ok(renamed) => renamed,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        path = %downloaded.display(),
                        "could not classify downloaded image, using original file"
                    );
                    downloaded
                }
            };
            StagedImage {
                path: local,
                source_url: Some(image_url),
                downloaded: true,
            }
        } else {
            StagedImage::local(image_path)
        };

        push_staged(driver, &device, staged, cleanup, clear_before).await
    }
}

/// Payload returned by `clear_image`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearImageData {
    /// Whether the operation was successful
    pub success: bool,
}

/// The `clear_image` tool
pub struct ClearImageTool;

#[async_trait]
impl DeviceTool for ClearImageTool {
    fn name(&self) -> &'static str {
        "clear_image"
    }

    fn description(&self) -> &'static str {
        "Clear images from the device's gallery. For Android, this will remove all images from \
         the DCIM/Camera directory. For iOS, this will clear the images added through the \
         push_image tool."
    }

    fn options(&self) -> &'static [ToolOption] {
        &[PLATFORM_OPTION, SERIAL_OPTION]
    }

    async fn call(
        &self,
        driver: &Arc<dyn DeviceDriver>,
        args: &JsonObject,
        _cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let device = resolve_device(driver, args).await?;

        if let Err(err) = driver.clear_images(&device).await {
            tracing::error!(error = %err, device = %device, "clear images failed");
            return Ok(failure_result(format!(
                "Failed to clear images from device: {}",
                err
            )));
        }

        let data = ClearImageData { success: true };
        success_result("Successfully cleared images from device", &data)
    }
}
