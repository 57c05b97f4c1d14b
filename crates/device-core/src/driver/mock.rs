//! Mock device driver for testing
//!
//! This module provides a [`MockDriver`] implementation of the
//! [`DeviceDriver`] trait for testing and development purposes. The mock
//! simulates a small fleet of connected devices without requiring ADB or
//! an iOS pairing service.
//!
//! # Features
//!
//! - **Mock device fleet:** two Android serials and one iOS UDID by default
//! - **Configurable delay:** simulate slow USB/network operations
//! - **Error injection:** fail every operation, or only `push_image`
//! - **Pairing failures:** mark UDIDs whose pairing fails, exercising the
//!   silent-omission path in enumeration
//! - **Observable state:** pushed paths, clear count, and select count are
//!   recorded for assertions
//!
//! # Examples
//!
//! ```
//! use device_core::{
//!     driver::{DeviceDriver, MockDriver},
//!     model::DeviceSelector,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let driver = MockDriver::new();
//!
//!     let inventory = driver.list_devices().await.unwrap();
//!     assert_eq!(inventory.total(), 3);
//!
//!     let selector = DeviceSelector::by_serial("emulator-5554");
//!     let device = driver.select_device(&selector).await.unwrap();
//!     assert_eq!(device.uuid(), "emulator-5554");
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::DeviceDriver;
use crate::error::{DriverError, DriverResult};
use crate::model::{
    DeviceHandle, DeviceInventory, DeviceSelector, Platform, ScreenRecordOptions,
};

/// Mock device driver for testing and development
///
/// Thread-safe; share it across tasks with `Arc`. Without a configured
/// delay all operations complete immediately.
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Android serials reported by enumeration
    android: Vec<String>,
    /// iOS UDIDs reported by enumeration
    ios: Vec<String>,
    /// UDIDs whose pairing fails
    pairing_failures: Vec<String>,
    /// Optional delay applied before every operation
    delay: Option<Duration>,
    /// Optional delay simulating the recording itself
    recording_delay: Option<Duration>,
    /// Optional error injected into every operation
    error_injection: Option<DriverError>,
    /// Optional failure reason injected into push_image only
    push_failure: Option<String>,
    /// Optional failure reason injected into clear_images only
    clear_failure: Option<String>,
    /// Optional failure reason injected into screen_record only
    recording_failure: Option<String>,
    /// Paths passed to push_image
    pushed: Mutex<Vec<PathBuf>>,
    /// Number of clear_images calls
    clear_count: AtomicUsize,
    /// Number of select_device calls
    select_count: AtomicUsize,
}

impl MockDriver {
    /// Creates a mock driver with the default device fleet
    ///
    /// The fleet holds two Android devices (`emulator-5554`,
    /// `0123456789ABCDEF`) and one iOS device
    /// (`00008110-000A29EA3403401E`).
    pub fn new() -> Self {
        Self {
            android: vec!["emulator-5554".to_string(), "0123456789ABCDEF".to_string()],
            ios: vec!["00008110-000A29EA3403401E".to_string()],
            ..Self::default()
        }
    }

    /// Creates a mock driver with explicit device lists
    pub fn with_devices(android: Vec<String>, ios: Vec<String>) -> Self {
        Self {
            android,
            ios,
            ..Self::default()
        }
    }

    /// Sets a delay applied before every async operation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets a delay simulating the screen-recording capture itself
    ///
    /// Unlike [`MockDriver::with_delay`] this only affects
    /// `screen_record`, so cancellation behavior can be exercised without
    /// slowing device resolution down.
    pub fn with_recording_delay(mut self, delay: Duration) -> Self {
        self.recording_delay = Some(delay);
        self
    }

    /// Injects an error returned by every operation
    pub fn with_error(mut self, error: DriverError) -> Self {
        self.error_injection = Some(error);
        self
    }

    /// Makes `push_image` fail with the given reason
    pub fn with_push_failure(mut self, reason: impl Into<String>) -> Self {
        self.push_failure = Some(reason.into());
        self
    }

    /// Makes `clear_images` fail with the given reason
    pub fn with_clear_failure(mut self, reason: impl Into<String>) -> Self {
        self.clear_failure = Some(reason.into());
        self
    }

    /// Makes `screen_record` fail with the given reason
    pub fn with_recording_failure(mut self, reason: impl Into<String>) -> Self {
        self.recording_failure = Some(reason.into());
        self
    }

    /// Marks a UDID whose pairing fails during enumeration
    pub fn with_pairing_failure(mut self, udid: impl Into<String>) -> Self {
        self.pairing_failures.push(udid.into());
        self
    }

    /// Paths passed to `push_image` so far
    pub fn pushed_paths(&self) -> Vec<PathBuf> {
        self.pushed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of `clear_images` calls so far
    pub fn clear_count(&self) -> usize {
        self.clear_count.load(Ordering::SeqCst)
    }

    /// Number of `select_device` calls so far
    pub fn select_count(&self) -> usize {
        self.select_count.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    /// Re-constructs the injected error; DriverError is not Clone because
    /// of the io::Error variant
    fn check_error_injection(&self) -> DriverResult<()> {
        let Some(ref error) = self.error_injection else {
            return Ok(());
        };
        Err(match error {
            DriverError::DeviceNotFound { selector } => DriverError::DeviceNotFound {
                selector: selector.clone(),
            },
            DriverError::PairingFailed { udid, reason } => DriverError::PairingFailed {
                udid: udid.clone(),
                reason: reason.clone(),
            },
            DriverError::InvalidParameter { parameter, reason } => {
                DriverError::InvalidParameter {
                    parameter: parameter.clone(),
                    reason: reason.clone(),
                }
            }
            DriverError::NotAnImage { content_type } => DriverError::NotAnImage {
                content_type: content_type.clone(),
            },
            DriverError::DownloadFailed { url, reason } => DriverError::DownloadFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            DriverError::PushFailed { reason } => DriverError::PushFailed {
                reason: reason.clone(),
            },
            DriverError::ClearFailed { reason } => DriverError::ClearFailed {
                reason: reason.clone(),
            },
            DriverError::RecordingFailed { reason } => DriverError::RecordingFailed {
                reason: reason.clone(),
            },
            DriverError::IoError(e) => {
                DriverError::IoError(std::io::Error::new(e.kind(), e.to_string()))
            }
        })
    }

    fn find_device(&self, selector: &DeviceSelector) -> Option<DeviceHandle> {
        let android = self
            .android
            .iter()
            .map(|s| DeviceHandle::new(Platform::Android, s.clone()));
        let ios = self
            .ios
            .iter()
            .map(|s| DeviceHandle::new(Platform::Ios, s.clone()));

        android.chain(ios).find(|device| {
            let platform_matches = selector
                .platform
                .map(|p| device.platform == p)
                .unwrap_or(true);
            let serial_matches = selector
                .serial
                .as_ref()
                .map(|s| device.udid == *s)
                .unwrap_or(true);
            platform_matches && serial_matches
        })
    }

    fn recording_path(opts: &ScreenRecordOptions) -> PathBuf {
        if let Some(ref path) = opts.output_path {
            return path.clone();
        }
        let timestamp: String = chrono::Utc::now()
            .to_rfc3339()
            .chars()
            .map(|c| match c {
                ':' => '-',
                '+' | '.' => '_',
                _ => c,
            })
            .collect();
        std::env::temp_dir()
            .join("device-mcp")
            .join(format!("recording-{}.mp4", timestamp))
    }
}

#[async_trait]
impl DeviceDriver for MockDriver {
    async fn list_devices(&self) -> DriverResult<DeviceInventory> {
        self.apply_delay().await;
        self.check_error_injection()?;

        // iOS enumeration pairs each device; failures drop the device
        // from the inventory rather than failing the call.
        let mut ios = Vec::with_capacity(self.ios.len());
        for udid in &self.ios {
            match self.pair(udid).await {
                Ok(()) => ios.push(udid.clone()),
                Err(err) => {
                    tracing::warn!(udid = %udid, error = %err, "skipping unpaired iOS device");
                }
            }
        }

        Ok(DeviceInventory {
            android: self.android.clone(),
            ios,
        })
    }

    async fn pair(&self, udid: &str) -> DriverResult<()> {
        self.apply_delay().await;

        if self.pairing_failures.iter().any(|u| u == udid) {
            return Err(DriverError::PairingFailed {
                udid: udid.to_string(),
                reason: "trust dialog declined".to_string(),
            });
        }
        Ok(())
    }

    async fn select_device(&self, selector: &DeviceSelector) -> DriverResult<DeviceHandle> {
        self.select_count.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.check_error_injection()?;

        self.find_device(selector)
            .ok_or_else(|| DriverError::DeviceNotFound {
                selector: selector.clone(),
            })
    }

    async fn push_image(&self, _device: &DeviceHandle, path: &Path) -> DriverResult<()> {
        self.apply_delay().await;
        self.check_error_injection()?;

        if let Some(ref reason) = self.push_failure {
            return Err(DriverError::PushFailed {
                reason: reason.clone(),
            });
        }

        if let Ok(mut pushed) = self.pushed.lock() {
            pushed.push(path.to_path_buf());
        }
        Ok(())
    }

    async fn clear_images(&self, _device: &DeviceHandle) -> DriverResult<()> {
        self.apply_delay().await;
        self.check_error_injection()?;

        if let Some(ref reason) = self.clear_failure {
            return Err(DriverError::ClearFailed {
                reason: reason.clone(),
            });
        }

        self.clear_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn screen_record(
        &self,
        _device: &DeviceHandle,
        opts: &ScreenRecordOptions,
        cancel: CancellationToken,
    ) -> DriverResult<PathBuf> {
        self.check_error_injection()?;
        opts.validate()?;

        if let Some(ref reason) = self.recording_failure {
            return Err(DriverError::RecordingFailed {
                reason: reason.clone(),
            });
        }

        let path = Self::recording_path(opts);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Simulated capture: wait out the configured delays unless the
        // invocation is cancelled first. A cancelled recording still
        // produces a (partial) file.
        let capture = async {
            self.apply_delay().await;
            if let Some(duration) = self.recording_delay {
                sleep(duration).await;
            }
        };
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(path = %path.display(), "recording cancelled, keeping partial file");
            }
            _ = capture => {}
        }

        tokio::fs::write(&path, b"\x00\x00\x00\x18ftypmp42").await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_new() {
        let driver = MockDriver::new();
        assert_eq!(driver.android.len(), 2);
        assert_eq!(driver.ios.len(), 1);
        assert!(driver.delay.is_none());
        assert!(driver.error_injection.is_none());
    }

    #[tokio::test]
    async fn test_list_devices() {
        let driver = MockDriver::new();
        let inventory = driver.list_devices().await.unwrap();

        assert_eq!(inventory.android_count(), 2);
        assert_eq!(inventory.ios_count(), 1);
        assert_eq!(inventory.total(), 3);
    }

    #[tokio::test]
    async fn test_list_devices_omits_pairing_failures() {
        let driver = MockDriver::new().with_pairing_failure("00008110-000A29EA3403401E");
        let inventory = driver.list_devices().await.unwrap();

        // The failing device is dropped silently, not reported.
        assert_eq!(inventory.ios_count(), 0);
        assert_eq!(inventory.android_count(), 2);
    }

    #[tokio::test]
    async fn test_list_devices_with_error_injection() {
        let driver = MockDriver::new().with_error(DriverError::ClearFailed {
            reason: "injected".to_string(),
        });

        assert!(driver.list_devices().await.is_err());
    }

    #[tokio::test]
    async fn test_pair_idempotent() {
        let driver = MockDriver::new();
        driver.pair("00008110-000A29EA3403401E").await.unwrap();
        driver.pair("00008110-000A29EA3403401E").await.unwrap();
    }

    #[tokio::test]
    async fn test_select_device_by_serial() {
        let driver = MockDriver::new();
        let selector = DeviceSelector::by_serial("0123456789ABCDEF");

        let device = driver.select_device(&selector).await.unwrap();
        assert_eq!(device.platform, Platform::Android);
        assert_eq!(device.uuid(), "0123456789ABCDEF");
    }

    #[tokio::test]
    async fn test_select_device_by_platform() {
        let driver = MockDriver::new();
        let selector = DeviceSelector::by_platform(Platform::Ios);

        let device = driver.select_device(&selector).await.unwrap();
        assert_eq!(device.platform, Platform::Ios);
        assert_eq!(device.uuid(), "00008110-000A29EA3403401E");
    }

    #[tokio::test]
    async fn test_select_device_empty_selector_prefers_android() {
        let driver = MockDriver::new();

        let device = driver.select_device(&DeviceSelector::default()).await.unwrap();
        assert_eq!(device.platform, Platform::Android);
        assert_eq!(device.uuid(), "emulator-5554");
    }

    #[tokio::test]
    async fn test_select_device_not_found() {
        let driver = MockDriver::new();
        let selector = DeviceSelector::by_serial("nonexistent");

        let result = driver.select_device(&selector).await;
        assert!(matches!(result.unwrap_err(), DriverError::DeviceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_select_device_platform_serial_mismatch() {
        let driver = MockDriver::new();
        let selector = DeviceSelector {
            platform: Some(Platform::Ios),
            serial: Some("emulator-5554".to_string()),
        };

        assert!(driver.select_device(&selector).await.is_err());
    }

    #[tokio::test]
    async fn test_select_count_tracking() {
        let driver = MockDriver::new();
        assert_eq!(driver.select_count(), 0);

        let _ = driver.select_device(&DeviceSelector::default()).await;
        let _ = driver.select_device(&DeviceSelector::by_serial("missing")).await;
        assert_eq!(driver.select_count(), 2);
    }

    #[tokio::test]
    async fn test_push_image_records_path() {
        let driver = MockDriver::new();
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");

        driver.push_image(&device, Path::new("/tmp/photo.png")).await.unwrap();

        let pushed = driver.pushed_paths();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0], PathBuf::from("/tmp/photo.png"));
    }

    #[tokio::test]
    async fn test_push_image_with_push_failure() {
        let driver = MockDriver::new().with_push_failure("device storage full");
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");

        let result = driver.push_image(&device, Path::new("/tmp/photo.png")).await;
        assert!(matches!(result.unwrap_err(), DriverError::PushFailed { .. }));
        assert!(driver.pushed_paths().is_empty());
    }

    #[tokio::test]
    async fn test_clear_images_counts() {
        let driver = MockDriver::new();
        let device = DeviceHandle::new(Platform::Ios, "00008110-000A29EA3403401E");

        driver.clear_images(&device).await.unwrap();
        driver.clear_images(&device).await.unwrap();
        assert_eq!(driver.clear_count(), 2);
    }

    #[tokio::test]
    async fn test_screen_record_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("capture.mp4");

        let driver = MockDriver::new();
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");
        let opts = ScreenRecordOptions::builder()
            .duration(30.0)
            .output_path(&output)
            .build();

        let path = driver
            .screen_record(&device, &opts, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(path, output);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_screen_record_rejects_bad_duration() {
        let driver = MockDriver::new();
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");
        let opts = ScreenRecordOptions::builder().duration(-1.0).build();

        let result = driver
            .screen_record(&device, &opts, CancellationToken::new())
            .await;
        assert!(matches!(result.unwrap_err(), DriverError::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn test_screen_record_observes_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cancelled.mp4");

        // A long delay stands in for a long recording; cancellation must
        // cut it short and still leave an output file behind.
        let driver = MockDriver::new().with_recording_delay(Duration::from_secs(30));
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");
        let opts = ScreenRecordOptions::builder().output_path(&output).build();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let start = std::time::Instant::now();
        let path = driver.screen_record(&device, &opts, cancel).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(5), "recording blocked past cancellation");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_delay_timing() {
        let delay = Duration::from_millis(50);
        let driver = MockDriver::new().with_delay(delay);

        let start = std::time::Instant::now();
        let _ = driver.list_devices().await.unwrap();
        assert!(start.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_error_injection_flow() {
        let driver = MockDriver::new().with_error(DriverError::PushFailed {
            reason: "injected".to_string(),
        });
        let device = DeviceHandle::new(Platform::Android, "emulator-5554");

        assert!(driver.list_devices().await.is_err());
        assert!(driver.select_device(&DeviceSelector::default()).await.is_err());
        assert!(driver.push_image(&device, Path::new("/tmp/x.png")).await.is_err());
        assert!(driver.clear_images(&device).await.is_err());
    }
}
