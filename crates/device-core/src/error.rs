//! Error types for device driver operations
//!
//! This module defines the error type shared by the driver facade and the
//! file utilities. Each variant carries enough context for a user-facing
//! message, and `remediation_hint()` suggests a next step for resolution.

use crate::model::DeviceSelector;

/// Result type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Error type for device driver and file-handling operations
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// No connected device matched the selector
    #[error("no device found matching {selector}")]
    DeviceNotFound {
        /// The selector that failed to match any device
        selector: DeviceSelector,
    },

    /// iOS device pairing failed
    #[error("failed to pair device '{udid}': {reason}")]
    PairingFailed {
        /// UDID of the device that failed to pair
        udid: String,
        /// Reason reported by the pairing service
        reason: String,
    },

    /// Invalid parameter provided
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Content sniffing found no image signature
    #[error("not a recognized image type: {content_type}")]
    NotAnImage {
        /// The content type that was detected instead
        content_type: String,
    },

    /// Remote fetch failed
    #[error("failed to download '{url}': {reason}")]
    DownloadFailed {
        /// URL that could not be fetched
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// Pushing an image to the device gallery failed
    #[error("failed to push image to device: {reason}")]
    PushFailed {
        /// Reason reported by the device backend
        reason: String,
    },

    /// Clearing device gallery images failed
    #[error("failed to clear images on device: {reason}")]
    ClearFailed {
        /// Reason reported by the device backend
        reason: String,
    },

    /// Screen recording failed
    #[error("screen recording failed: {reason}")]
    RecordingFailed {
        /// Reason reported by the recording backend
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DriverError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use device_core::{error::DriverError, model::DeviceSelector};
    ///
    /// let error = DriverError::DeviceNotFound {
    ///     selector: DeviceSelector::by_serial("emulator-5554"),
    /// };
    /// assert!(error.remediation_hint().contains("list_available_devices"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            DriverError::DeviceNotFound { .. } => {
                "Use the list_available_devices tool to see connected devices, then pass the \
                 serial (Android) or UDID (iOS) of one of them. Check USB connections and that \
                 the device has debugging enabled."
            }
            DriverError::PairingFailed { .. } => {
                "Unlock the iOS device and accept the trust dialog, then retry. Pairing state is \
                 kept by the OS pairing service, so a successful retry is remembered."
            }
            DriverError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "platform" => "Platform must be either 'android' or 'ios'.",
                "duration" => "Duration must be a positive number of seconds.",
                _ => "Check the parameter value against the tool's declared options.",
            },
            DriverError::NotAnImage { .. } => {
                "The file's leading bytes match no known image signature. The original file is \
                 left untouched; verify the source produces JPEG, PNG, GIF, WebP, BMP, TIFF, or \
                 SVG content."
            }
            DriverError::DownloadFailed { .. } => {
                "Check that the URL is reachable and returns a successful status. Nothing was \
                 sent to the device."
            }
            DriverError::PushFailed { .. } => {
                "Verify the image file exists and the device has storage available. For Android \
                 the target is DCIM/Camera; for iOS the photo library must be writable."
            }
            DriverError::ClearFailed { .. } => {
                "Clearing gallery images requires a responsive device. Retry once the device is \
                 unlocked and idle."
            }
            DriverError::RecordingFailed { .. } => {
                "ADB screenrecord is limited to 180 seconds; for longer captures or audio, set \
                 screenRecordWithScrcpy. Ensure the device screen is on."
            }
            DriverError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;

    #[test]
    fn test_device_not_found_message() {
        let error = DriverError::DeviceNotFound {
            selector: DeviceSelector::by_serial("emulator-5554"),
        };

        let msg = error.to_string();
        assert!(msg.contains("no device found"));
        assert!(msg.contains("emulator-5554"));
    }

    #[test]
    fn test_device_not_found_remediation() {
        let error = DriverError::DeviceNotFound {
            selector: DeviceSelector::by_platform(Platform::Ios),
        };

        let hint = error.remediation_hint();
        assert!(hint.contains("list_available_devices"));
    }

    #[test]
    fn test_pairing_failed_message() {
        let error = DriverError::PairingFailed {
            udid: "00008110-000A29EA3403401E".to_string(),
            reason: "user denied trust".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("00008110-000A29EA3403401E"));
        assert!(msg.contains("user denied trust"));
    }

    #[test]
    fn test_invalid_parameter_platform_hint() {
        let error = DriverError::InvalidParameter {
            parameter: "platform".to_string(),
            reason: "unknown platform 'windows'".to_string(),
        };

        assert!(error.to_string().contains("platform"));
        assert!(error.remediation_hint().contains("'android' or 'ios'"));
    }

    #[test]
    fn test_not_an_image_message() {
        let error = DriverError::NotAnImage {
            content_type: "application/pdf".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("not a recognized image type"));
        assert!(msg.contains("application/pdf"));
        assert!(error.remediation_hint().contains("left untouched"));
    }

    #[test]
    fn test_download_failed_message() {
        let error = DriverError::DownloadFailed {
            url: "https://example.com/a.png".to_string(),
            reason: "connection refused".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("https://example.com/a.png"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: DriverError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.remediation_hint().contains("permissions"));
    }
}
