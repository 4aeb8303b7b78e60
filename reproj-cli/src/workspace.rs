use anyhow::{Context, Result};
use reproj_core::{find_manifest, Config, Manifest, CONFIG_DIR};
use std::path::{Path, PathBuf};

/// A loaded solution: the manifest, the directory it lives in and the
/// config found there.
pub struct Solution {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub dir: PathBuf,
    pub config: Config,
}

impl Solution {
    pub fn open(explicit: Option<&Path>) -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        let manifest_path = match explicit {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => current_dir.join(path),
            None => find_manifest(&current_dir)?,
        };
        let dir = manifest_path
            .parent()
            .map_or_else(|| current_dir.clone(), Path::to_path_buf);

        let manifest = Manifest::open(&manifest_path)?;
        let config = Config::load(&dir).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring unreadable config: {e:#}");
            Config::default()
        });

        Ok(Self {
            manifest,
            manifest_path,
            dir,
            config,
        })
    }

    /// `.reproj` next to the manifest: lock, log and backups live here.
    pub fn state_dir(&self) -> PathBuf {
        self.dir.join(CONFIG_DIR)
    }
}
