//! Remote file download into the local temp directory
//!
//! Downloads land in `$TMPDIR/device-mcp/` under a unique timestamped name
//! with no meaningful extension; the content sniffer in
//! [`crate::util::image_type`] supplies the extension afterwards. Ownership
//! of a downloaded file belongs to the invocation that created it until it
//! is explicitly deleted or left for disk-level garbage collection.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::{DriverError, DriverResult};

/// Process-local sequence number; timestamps alone can collide when two
/// downloads start within the same clock tick.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Base directory for downloaded files
fn download_dir() -> PathBuf {
    std::env::temp_dir().join("device-mcp")
}

/// Generates a unique download file name
fn unique_name() -> String {
    let timestamp: String = chrono::Utc::now()
        .to_rfc3339()
        .chars()
        .map(|c| match c {
            ':' => '-',
            '+' | '.' => '_',
            _ => c,
        })
        .collect();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("download-{}-{}.tmp", timestamp, seq)
}

/// Downloads a URL into a uniquely named temp file
///
/// The body is streamed to disk rather than buffered; a failure mid-stream
/// removes the partial file (best effort) before returning
/// [`DriverError::DownloadFailed`]. Non-success HTTP statuses fail without
/// writing anything.
pub async fn download_to_temp(url: &str) -> DriverResult<PathBuf> {
    let failed = |reason: String| DriverError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url)
        .await
        .map_err(|e| failed(e.to_string()))?
        .error_for_status()
        .map_err(|e| failed(e.to_string()))?;

    let dir = download_dir();
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(unique_name());

    let mut file = tokio::fs::File::create(&path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(failed(e.to_string()));
            }
        };
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(url, path = %path.display(), "downloaded file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_names_differ() {
        let a = unique_name();
        let b = unique_name();
        assert_ne!(a, b);
        assert!(a.starts_with("download-"));
        assert!(a.ends_with(".tmp"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_io() {
        let result = download_to_temp("http://[not-a-host/image.png").await;

        let err = result.unwrap_err();
        assert!(matches!(err, DriverError::DownloadFailed { .. }));
        assert!(err.to_string().contains("[not-a-host"));
    }
}
