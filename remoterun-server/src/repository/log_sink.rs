//! Log Sink
//!
//! Append-only log file owned by exactly one batch run. Standard output and
//! standard error of a running command are copied into the same sink by two
//! concurrent tasks, so every `append` holds the sink's lock for the whole
//! write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Log sink error type
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log file {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("log file {0} does not exist")]
    Missing(PathBuf),

    #[error("failed to open log file: {0}")]
    Open(#[source] std::io::Error),

    #[error("log sink is closed")]
    Closed,

    #[error("log file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Derives the log file location for a run
pub fn log_path(logs_dir: &Path, id: Uuid) -> PathBuf {
    logs_dir.join(format!("{}.log", id))
}

/// Reads the full current content of a log file, open sink or not
pub async fn read_log(path: &Path) -> Result<Vec<u8>, SinkError> {
    let mut file = File::open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => SinkError::Missing(path.to_path_buf()),
        _ => SinkError::Open(e),
    })?;

    let mut content = Vec::new();
    file.read_to_end(&mut content).await?;
    Ok(content)
}

pub struct LogSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LogSink {
    /// Creates a fresh, empty log file
    ///
    /// Fails with [`SinkError::AlreadyExists`] rather than truncating an existing log.
    pub async fn create(path: PathBuf) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => SinkError::AlreadyExists(path.clone()),
                _ => SinkError::Io(e),
            })?;

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one chunk as a single uninterrupted write
    pub async fn append(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut guard = self.file.lock().await;
        let file = guard.as_mut().ok_or(SinkError::Closed)?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Appends a newline-terminated text line
    pub async fn append_line(&self, line: &str) -> Result<(), SinkError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.append(buf.as_bytes()).await
    }

    /// Flushes, syncs and releases the file handle. Calling it again is a no-op.
    pub async fn close(&self) -> Result<(), SinkError> {
        let mut guard = self.file.lock().await;
        if let Some(mut file) = guard.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn is_closed(&self) -> bool {
        self.file.lock().await.is_none()
    }

    /// Returns everything written so far; valid while the sink is still open
    #[cfg(test)]
    pub(crate) async fn read(&self) -> Result<Vec<u8>, SinkError> {
        read_log(&self.path).await
    }
}
