use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append-only, timestamped log of the steps a rename went through.
///
/// Logging never fails a rename: if the file cannot be opened or written the
/// log silently becomes a no-op.
#[derive(Debug, Default)]
pub struct TransactionLog {
    file: Option<File>,
}

impl TransactionLog {
    pub fn open(path: Option<&Path>) -> Self {
        let file = path.and_then(|path| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).ok()?;
            }
            OpenOptions::new().create(true).append(true).open(path).ok()
        });
        Self { file }
    }

    pub fn log(&mut self, message: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let written = writeln!(
            file,
            "[{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )
        .and_then(|()| file.flush());
        if written.is_err() {
            self.file = None;
        }
    }
}
