use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const LOCK_FILE_NAME: &str = "reproj.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300;

/// Guards a solution against two reproj processes editing it at once.
///
/// The lock lives in the solution's `.reproj` directory and records
/// `pid:timestamp`. Locks older than five minutes, or whose process has gone
/// away, are taken over.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    owner: String,
}

impl LockFile {
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let lock_path = state_dir.join(LOCK_FILE_NAME);

        if let Some(holder) = read_holder(&lock_path)? {
            if let Some((pid, timestamp)) = holder {
                if now_secs().saturating_sub(timestamp) <= STALE_LOCK_TIMEOUT_SECS
                    && is_process_running(pid)
                {
                    return Err(anyhow!(
                        "Another reproj process is already running (PID: {}). \
                        If this is incorrect, remove the lock file at: {}",
                        pid,
                        lock_path.display()
                    ));
                }
            }
            fs::remove_file(&lock_path).context("Failed to remove stale lock file")?;
        }

        fs::create_dir_all(state_dir).context("Failed to create .reproj directory")?;

        let owner = format!("{}:{}", process::id(), now_secs());
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .context("Failed to create lock file")?;
        file.write_all(owner.as_bytes())
            .context("Failed to write lock file")?;

        Ok(Self {
            path: lock_path,
            owner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock if it is still ours.
    pub fn release(self) -> Result<()> {
        self.remove_if_owned()
    }

    fn remove_if_owned(&self) -> Result<()> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim() == self.owner => {
                fs::remove_file(&self.path).context("Failed to remove lock file")
            },
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to read lock file"),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = self.remove_if_owned();
    }
}

/// `None` when there is no lock file, `Some(None)` when it cannot be parsed.
fn read_holder(lock_path: &Path) -> Result<Option<Option<(u32, u64)>>> {
    let content = match fs::read_to_string(lock_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("Failed to read lock file"),
    };

    let holder = content.trim().split_once(':').and_then(|(pid, timestamp)| {
        Some((pid.parse::<u32>().ok()?, timestamp.parse::<u64>().ok()?))
    });
    Ok(Some(holder))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks that the process exists
    #[allow(clippy::cast_possible_wrap)]
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
    }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_QUERY_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn is_process_running(_pid: u32) -> bool {
    false
}
