//! Data models and type definitions for device-core
//!
//! This module defines the core types used throughout the workspace:
//! - Platform and device identification types
//! - Device selection and enumeration types
//! - Screen recording options

use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Mobile platform of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android device, addressed by ADB serial
    Android,
    /// iOS device, addressed by UDID
    Ios,
}

impl Platform {
    /// Returns the platform as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(DriverError::InvalidParameter {
                parameter: "platform".to_string(),
                reason: format!("unknown platform '{}', expected 'android' or 'ios'", other),
            }),
        }
    }
}

/// Criteria for selecting a connected device
///
/// Both fields are optional; `None` matches any value. An empty selector
/// resolves to the first available device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceSelector {
    /// Restrict matching to one platform
    pub platform: Option<Platform>,
    /// Exact serial number (Android) or UDID (iOS)
    pub serial: Option<String>,
}

impl DeviceSelector {
    /// Creates a selector matching a specific serial/UDID on any platform
    pub fn by_serial(serial: impl Into<String>) -> Self {
        Self {
            platform: None,
            serial: Some(serial.into()),
        }
    }

    /// Creates a selector matching any device of the given platform
    pub fn by_platform(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            serial: None,
        }
    }

    /// Whether the selector places no constraint on the device
    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.serial.is_none()
    }
}

impl std::fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.platform, &self.serial) {
            (None, None) => write!(f, "any device"),
            (Some(platform), None) => write!(f, "platform={}", platform),
            (None, Some(serial)) => write!(f, "serial={}", serial),
            (Some(platform), Some(serial)) => {
                write!(f, "platform={} serial={}", platform, serial)
            }
        }
    }
}

/// Handle to a resolved, live device
///
/// Produced by [`crate::driver::DeviceDriver::select_device`] and consumed
/// by device-scoped operations. Scoped to a single invocation; there is no
/// persistent registry of handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceHandle {
    /// Platform of the resolved device
    pub platform: Platform,
    /// Serial number (Android) or UDID (iOS)
    pub udid: String,
}

impl DeviceHandle {
    /// Creates a new device handle
    pub fn new(platform: Platform, udid: impl Into<String>) -> Self {
        Self {
            platform,
            udid: udid.into(),
        }
    }

    /// Unique identifier of the device
    pub fn uuid(&self) -> &str {
        &self.udid
    }
}

impl std::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.platform, self.udid)
    }
}

/// Connected devices grouped by platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceInventory {
    /// Android device serial numbers
    pub android: Vec<String>,
    /// iOS device UDIDs
    pub ios: Vec<String>,
}

impl DeviceInventory {
    /// Number of Android devices
    pub fn android_count(&self) -> usize {
        self.android.len()
    }

    /// Number of iOS devices
    pub fn ios_count(&self) -> usize {
        self.ios.len()
    }

    /// Total number of devices across both platforms
    pub fn total(&self) -> usize {
        self.android.len() + self.ios.len()
    }
}

/// Recording method used for a screen capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordMethod {
    /// ADB screenrecord (limited to 180 seconds, no audio)
    Adb,
    /// scrcpy recording (longer captures, audio on Android 11+)
    Scrcpy,
}

impl RecordMethod {
    /// Returns the method as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMethod::Adb => "adb",
            RecordMethod::Scrcpy => "scrcpy",
        }
    }
}

impl std::fmt::Display for RecordMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for a screen recording session
///
/// All fields are optional. Without a duration the recording runs until the
/// invocation is cancelled; without an output path the backend picks a
/// timestamped file in its own temp directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenRecordOptions {
    /// Recording duration in seconds
    pub duration: Option<f64>,
    /// Custom path for the output video file
    pub output_path: Option<PathBuf>,
    /// Capture device audio (requires scrcpy)
    pub with_audio: bool,
    /// Force scrcpy instead of ADB screenrecord
    pub with_scrcpy: bool,
}

impl ScreenRecordOptions {
    /// Creates a builder for recording options
    pub fn builder() -> ScreenRecordOptionsBuilder {
        ScreenRecordOptionsBuilder::default()
    }

    /// The recording method implied by these options
    ///
    /// Audio capture is only available through scrcpy, so requesting audio
    /// selects scrcpy even when `with_scrcpy` is unset.
    pub fn method(&self) -> RecordMethod {
        if self.with_scrcpy || self.with_audio {
            RecordMethod::Scrcpy
        } else {
            RecordMethod::Adb
        }
    }

    /// Validates the option combination
    pub fn validate(&self) -> Result<(), DriverError> {
        if let Some(duration) = self.duration {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(DriverError::InvalidParameter {
                    parameter: "duration".to_string(),
                    reason: format!("must be a positive number of seconds, got {}", duration),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`ScreenRecordOptions`]
#[derive(Debug, Clone, Default)]
pub struct ScreenRecordOptionsBuilder {
    options: ScreenRecordOptions,
}

impl ScreenRecordOptionsBuilder {
    /// Sets the recording duration in seconds
    pub fn duration(mut self, seconds: f64) -> Self {
        self.options.duration = Some(seconds);
        self
    }

    /// Sets a custom output path for the video file
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.output_path = Some(path.into());
        self
    }

    /// Enables audio capture
    pub fn with_audio(mut self, audio: bool) -> Self {
        self.options.with_audio = audio;
        self
    }

    /// Forces scrcpy recording
    pub fn with_scrcpy(mut self, scrcpy: bool) -> Self {
        self.options.with_scrcpy = scrcpy;
        self
    }

    /// Builds the options
    pub fn build(self) -> ScreenRecordOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_as_str() {
        assert_eq!(Platform::Android.as_str(), "android");
        assert_eq!(Platform::Ios.as_str(), "ios");
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("IOS".parse::<Platform>().unwrap(), Platform::Ios);
    }

    #[test]
    fn test_platform_from_str_unknown() {
        let err = "windows".parse::<Platform>().unwrap_err();
        assert!(err.to_string().contains("windows"));
        assert!(matches!(err, DriverError::InvalidParameter { .. }));
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Android).unwrap();
        assert_eq!(json, "\"android\"");

        let platform: Platform = serde_json::from_str("\"ios\"").unwrap();
        assert_eq!(platform, Platform::Ios);
    }

    #[test]
    fn test_selector_constructors() {
        let by_serial = DeviceSelector::by_serial("emulator-5554");
        assert_eq!(by_serial.serial.as_deref(), Some("emulator-5554"));
        assert!(by_serial.platform.is_none());

        let by_platform = DeviceSelector::by_platform(Platform::Ios);
        assert_eq!(by_platform.platform, Some(Platform::Ios));
        assert!(by_platform.serial.is_none());
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(DeviceSelector::default().to_string(), "any device");
        assert_eq!(
            DeviceSelector::by_serial("abc").to_string(),
            "serial=abc"
        );
        assert_eq!(
            DeviceSelector {
                platform: Some(Platform::Android),
                serial: Some("abc".to_string()),
            }
            .to_string(),
            "platform=android serial=abc"
        );
    }

    #[test]
    fn test_selector_is_empty() {
        assert!(DeviceSelector::default().is_empty());
        assert!(!DeviceSelector::by_serial("x").is_empty());
    }

    #[test]
    fn test_handle_uuid() {
        let handle = DeviceHandle::new(Platform::Android, "emulator-5554");
        assert_eq!(handle.uuid(), "emulator-5554");
        assert_eq!(handle.to_string(), "android:emulator-5554");
    }

    #[test]
    fn test_inventory_counts() {
        let inventory = DeviceInventory {
            android: vec!["a".to_string(), "b".to_string()],
            ios: vec!["c".to_string()],
        };

        assert_eq!(inventory.android_count(), 2);
        assert_eq!(inventory.ios_count(), 1);
        assert_eq!(inventory.total(), 3);
    }

    #[test]
    fn test_record_options_builder() {
        let opts = ScreenRecordOptions::builder()
            .duration(30.0)
            .output_path("/tmp/recording.mp4")
            .with_audio(true)
            .build();

        assert_eq!(opts.duration, Some(30.0));
        assert_eq!(opts.output_path.as_deref(), Some(std::path::Path::new("/tmp/recording.mp4")));
        assert!(opts.with_audio);
        assert!(!opts.with_scrcpy);
    }

    #[test]
    fn test_record_method_selection() {
        assert_eq!(ScreenRecordOptions::default().method(), RecordMethod::Adb);

        let audio = ScreenRecordOptions::builder().with_audio(true).build();
        assert_eq!(audio.method(), RecordMethod::Scrcpy);

        let scrcpy = ScreenRecordOptions::builder().with_scrcpy(true).build();
        assert_eq!(scrcpy.method(), RecordMethod::Scrcpy);
    }

    #[test]
    fn test_record_options_validate() {
        assert!(ScreenRecordOptions::default().validate().is_ok());
        assert!(ScreenRecordOptions::builder().duration(10.0).build().validate().is_ok());

        let zero = ScreenRecordOptions::builder().duration(0.0).build();
        assert!(zero.validate().is_err());

        let negative = ScreenRecordOptions::builder().duration(-5.0).build();
        assert!(negative.validate().is_err());
    }
}
