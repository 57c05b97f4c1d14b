//! Device driver facade
//!
//! This module defines the [`DeviceDriver`] trait: the capability surface
//! the MCP tool layer calls into. Real implementations wrap platform
//! transports (ADB for Android, usbmuxd/lockdown for iOS) and live outside
//! this workspace; [`mock::MockDriver`] ships in-tree for testing and
//! development.
//!
//! Every method may block on USB or network I/O and may fail; callers
//! perform no retries at this layer. A single failed call surfaces
//! immediately, either as a protocol error or as a structured failure
//! response, at the tool layer's discretion.

pub mod mock;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DriverResult;
use crate::model::{DeviceHandle, DeviceInventory, DeviceSelector, ScreenRecordOptions};

pub use mock::MockDriver;

/// Capability surface for mobile-device operations
///
/// Implementations must be safe to share across concurrent invocations:
/// the tool layer holds one driver behind an `Arc` and every request gets
/// its own execution path. The only cross-invocation state permitted is
/// the OS-level pairing side effect owned by the implementation.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// Enumerates connected devices on both platforms
    ///
    /// iOS enumeration pairs each discovered device as a side effect.
    /// Devices that fail driver construction or pairing are omitted from
    /// the result (logged, not reported).
    async fn list_devices(&self) -> DriverResult<DeviceInventory>;

    /// Pairs an iOS device by UDID
    ///
    /// Pairing mutates persistent OS pairing state and is idempotent:
    /// pairing an already-paired device succeeds.
    async fn pair(&self, udid: &str) -> DriverResult<()>;

    /// Resolves a selector to a live device handle
    ///
    /// An empty selector resolves to the first available device. This is
    /// the setup step every device-scoped tool runs before its body.
    async fn select_device(&self, selector: &DeviceSelector) -> DriverResult<DeviceHandle>;

    /// Pushes a local image file into the device gallery
    ///
    /// Android: the file lands in DCIM/Camera and the media store is
    /// refreshed. iOS: the image is added to the photo library.
    async fn push_image(&self, device: &DeviceHandle, path: &Path) -> DriverResult<()>;

    /// Removes gallery images previously pushed to the device
    async fn clear_images(&self, device: &DeviceHandle) -> DriverResult<()>;

    /// Records the device screen and returns the output video path
    ///
    /// The recording must observe `cancel` and terminate early when it
    /// fires; a partial output file is acceptable, blocking past
    /// cancellation is not.
    async fn screen_record(
        &self,
        device: &DeviceHandle,
        opts: &ScreenRecordOptions,
        cancel: CancellationToken,
    ) -> DriverResult<PathBuf>;
}
