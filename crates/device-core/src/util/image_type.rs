//! Image content sniffing and extension correction
//!
//! Downloaded files frequently arrive without a usable extension. This
//! module inspects a file's leading bytes, classifies the image subtype
//! from its magic numbers, and renames the file in place so the name
//! matches the content. Classification never trusts the existing file name
//! or any metadata.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{DriverError, DriverResult};

/// Number of leading bytes inspected for classification
const SNIFF_LEN: u64 = 512;

/// Classifies a byte buffer by magic numbers
///
/// Recognizes the image formats the device gallery accepts, plus a few
/// non-image types so the `NotAnImage` error can name what was actually
/// found. Buffers shorter than [`SNIFF_LEN`] are classified from whatever
/// is available.
pub fn detect_content_type(head: &[u8]) -> &'static str {
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if head.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP" {
        return "image/webp";
    }
    if head.starts_with(b"BM") {
        return "image/bmp";
    }
    if head.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || head.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return "image/tiff";
    }
    if head.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return "image/x-icon";
    }
    if let Some(svg) = detect_svg(head) {
        return svg;
    }
    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.is_empty() || looks_binary(head) {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// SVG has no binary signature; look for an `<svg` root element, possibly
/// behind an XML declaration.
fn detect_svg(head: &[u8]) -> Option<&'static str> {
    let text = std::str::from_utf8(head).unwrap_or_else(|e| {
        // A truncated multi-byte char at the buffer edge is fine
        std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or("")
    });
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("<svg") {
        return Some("image/svg+xml");
    }
    if trimmed.starts_with("<?xml") && trimmed.contains("<svg") {
        return Some("image/svg+xml");
    }
    None
}

fn looks_binary(head: &[u8]) -> bool {
    head.iter()
        .any(|&b| b < 0x09 || ((0x0E..0x20).contains(&b) && b != 0x1B))
}

/// Maps a detected content type to the gallery file extension
///
/// Unrecognized `image/*` subtypes fall back to `.jpg`; non-image types
/// map to `None`.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/bmp" => Some(".bmp"),
        "image/tiff" => Some(".tiff"),
        "image/svg+xml" => Some(".svg"),
        other if other.starts_with("image/") => Some(".jpg"),
        _ => None,
    }
}

/// Examines a file's content and renames it with the matching extension
///
/// Reads up to 512 bytes from the start of the file (short files are
/// fine), classifies the content, and:
///
/// - if the file name already ends with the detected extension, returns
///   the path unchanged with no filesystem mutation;
/// - otherwise renames the file in place to `name + extension` (same
///   directory, atomic rename) and returns the new path;
/// - if the content is not an image at all, returns
///   [`DriverError::NotAnImage`] and leaves the file untouched — callers
///   must not delete the file on this path.
///
/// # Examples
///
/// ```no_run
/// use device_core::util::image_type::detect_and_rename;
///
/// // download.tmp containing PNG bytes becomes download.tmp.png
/// let renamed = detect_and_rename(std::path::Path::new("/tmp/download.tmp")).unwrap();
/// assert!(renamed.to_string_lossy().ends_with(".png"));
/// ```
pub fn detect_and_rename(path: &Path) -> DriverResult<PathBuf> {
    let mut file = fs::File::open(path)?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.by_ref().take(SNIFF_LEN).read_to_end(&mut head)?;
    drop(file);

    let content_type = detect_content_type(&head);
    tracing::debug!(path = %path.display(), content_type, "detected file content type");

    let extension = extension_for(content_type).ok_or_else(|| DriverError::NotAnImage {
        content_type: content_type.to_string(),
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DriverError::InvalidParameter {
            parameter: "imagePath".to_string(),
            reason: format!("'{}' has no usable file name", path.display()),
        })?;

    if name.to_ascii_lowercase().ends_with(extension) {
        return Ok(path.to_path_buf());
    }

    let renamed = path.with_file_name(format!("{}{}", name, extension));
    fs::rename(path, &renamed)?;
    tracing::debug!(
        from = %path.display(),
        to = %renamed.display(),
        "renamed image file with detected extension"
    );
    Ok(renamed)
}
