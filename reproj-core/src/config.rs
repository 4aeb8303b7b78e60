use crate::scanner::ScanOptions;
use crate::symbols::SymbolRenamer;
use crate::transaction::TransactionOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".reproj";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Extension of the source files whose namespaces are rewritten
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Extension of project descriptor files
    #[serde(default = "default_descriptor_extension")]
    pub descriptor_extension: String,

    /// Directory names skipped in addition to the built-in list
    #[serde(default)]
    pub exclude_dirs: Vec<String>,

    /// File name globs skipped in addition to the built-in list
    #[serde(default)]
    pub exclude_files: Vec<String>,

    /// Rename log, relative to the solution directory. Empty disables it.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Copy the project directory aside before renaming it
    #[serde(default)]
    pub backup: bool,

    /// Default output format: "summary" or "json"
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            descriptor_extension: default_descriptor_extension(),
            exclude_dirs: vec![],
            exclude_files: vec![],
            log_file: default_log_file(),
            backup: false,
            output: default_output(),
        }
    }
}

fn default_source_extension() -> String {
    "cs".to_string()
}

fn default_descriptor_extension() -> String {
    "csproj".to_string()
}

fn default_log_file() -> String {
    format!("{CONFIG_DIR}/rename.log")
}

fn default_output() -> String {
    "summary".to_string()
}

impl Config {
    /// Load `.reproj/config.toml` from `solution_dir` if it exists.
    pub fn load(solution_dir: &Path) -> Result<Self> {
        let config_path = solution_dir.join(CONFIG_DIR).join("config.toml");
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        // Return default config if no config file exists
        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extension: self.defaults.source_extension.clone(),
            exclude_dirs: self.defaults.exclude_dirs.clone(),
            exclude_files: self.defaults.exclude_files.clone(),
        }
    }

    pub fn symbol_renamer(&self) -> SymbolRenamer {
        SymbolRenamer::new(
            self.scan_options(),
            vec![self.defaults.descriptor_extension.clone()],
        )
    }

    /// Transaction options with the log path resolved against `solution_dir`.
    pub fn transaction_options(&self, solution_dir: &Path) -> TransactionOptions {
        let log_file = (!self.defaults.log_file.trim().is_empty()).then(|| {
            let path = PathBuf::from(&self.defaults.log_file);
            if path.is_absolute() {
                path
            } else {
                solution_dir.join(path)
            }
        });

        TransactionOptions {
            descriptor_extension: self.defaults.descriptor_extension.clone(),
            log_file,
        }
    }
}
