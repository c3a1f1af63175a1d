use crate::domain::model::ErrorEvent;
use crate::domain::ports::ErrorSink;
use crate::utils::error::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

/// `2024-05-01 09:30:12,345 - ERROR - message`
pub fn format_event(event: &ErrorEvent) -> String {
    format!(
        "{} - {} - {}",
        event.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        event.level,
        event.message
    )
}

/// 只附加寫入的錯誤日誌檔
#[derive(Debug)]
pub struct FileErrorLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileErrorLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ErrorSink for FileErrorLog {
    fn record(&self, event: ErrorEvent) {
        let line = format_event(&event);
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(file, "{}", line) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not write to error log");
        }
    }
}
