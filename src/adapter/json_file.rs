// Diagnostics sink writing events as ND-JSON lines with automatic
// size/time based rotation. Each dispatched event appends one line; when the
// current file exceeds the configured size or max age, a new file with a
// timestamp suffix is created.

use crate::domain::LogEvent;
use crate::error::SinkError;
use crate::port::Sink;
use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const DEFAULT_MAX_SIZE_MB: u64 = 10; // 10 MB
const DEFAULT_MAX_AGE_HOURS: i64 = 12; // 12 h

/// Internal shared state (file handle and creation time)
struct Inner {
    file: File,
    created_at: DateTime<Local>,
}

#[derive(Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
    base_name: String,
    inner: std::sync::Arc<Mutex<Option<Inner>>>,
    max_size_bytes: u64,
    max_age: ChronoDuration,
}

impl JsonFileSink {
    /// Create with default rotation settings (10 MB or 12 hours)
    pub async fn new(file_path: &str) -> Result<Self, SinkError> {
        Self::with_rotation(file_path, DEFAULT_MAX_SIZE_MB, DEFAULT_MAX_AGE_HOURS).await
    }

    /// Create with custom max size (MB) and max age (hours)
    pub async fn with_rotation(
        file_path: &str,
        max_size_mb: u64,
        max_age_hours: i64,
    ) -> Result<Self, SinkError> {
        let path = Path::new(file_path);
        let directory = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "logs".to_string());

        // Create directory if it doesn't exist
        tokio::fs::create_dir_all(&directory).await.ok();

        let file = Self::open_new_log_file(&directory, &base_name).await?;

        Ok(Self {
            directory,
            base_name,
            inner: std::sync::Arc::new(Mutex::new(Some(Inner {
                file,
                created_at: Local::now(),
            }))),
            max_size_bytes: max_size_mb * 1024 * 1024,
            max_age: ChronoDuration::hours(max_age_hours),
        })
    }

    async fn open_new_log_file(dir: &Path, base_name: &str) -> Result<File, SinkError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_{}.json", base_name, timestamp);
        let full_path = dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(full_path)
            .await?;

        Ok(file)
    }

    async fn rotate_if_needed(&self, inner: &mut Inner) -> Result<(), SinkError> {
        let metadata = inner.file.metadata().await?;
        let need_rotate_size = metadata.len() >= self.max_size_bytes;
        let need_rotate_time = Local::now() - inner.created_at >= self.max_age;

        if need_rotate_size || need_rotate_time {
            // Flush and sync current file
            inner.file.flush().await?;
            inner.file.sync_data().await?;

            // Open new file
            inner.file = Self::open_new_log_file(&self.directory, &self.base_name).await?;
            inner.created_at = Local::now();
        }

        Ok(())
    }

    async fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut guard = self.inner.lock().await;
        let inner = guard
            .as_mut()
            .ok_or_else(|| SinkError::Unavailable("Sink closed".into()))?;

        inner.file.write_all(line.as_bytes()).await?;
        inner.file.write_all(b"\n").await?;
        inner.file.flush().await?;

        self.rotate_if_needed(inner).await?;
        inner.file.sync_data().await?;

        Ok(())
    }
}

impl Sink for JsonFileSink {
    fn write(
        &self,
        event: LogEvent,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), SinkError>> + Send + '_>>
    {
        Box::pin(async move {
            let json = serde_json::to_string(&event)?;
            self.write_line(&json).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_json_file_sink_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("diagnostics.json");

        let sink = JsonFileSink::new(file_path.to_str().unwrap())
            .await
            .unwrap();

        let event = LogEvent::new(Level::Information, "test message")
            .with_property("ClientIP", "10.0.0.1");
        sink.write(event).await.unwrap();

        // Verify file was created and contains the event
        let files: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);

        let content = std::fs::read_to_string(files[0].path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["message"], "test message");
        assert_eq!(parsed["properties"]["ClientIP"], "10.0.0.1");
    }

    #[tokio::test]
    async fn test_json_file_sink_appends_one_line_per_event() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("diagnostics.json");

        let sink = JsonFileSink::new(file_path.to_str().unwrap())
            .await
            .unwrap();

        for i in 0..3 {
            let event = LogEvent::new(Level::Debug, format!("event {i}"));
            sink.write(event).await.unwrap();
        }

        let files: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
