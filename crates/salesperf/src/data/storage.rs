//! Data directory storage
//!
//! Directory structure:
//! ~/.salesperf/
//!   policy.yaml          # Analytics policy overrides (optional)
//!   salesperf.log        # Rotating log file
//!   reports/
//!     2024-06-sales.json

use std::fs;
use std::path::{Path, PathBuf};

use salesperf_core::AnalyticsPolicy;

use crate::util::io::atomic_write;

pub const POLICY_FILE_NAME: &str = "policy.yaml";

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            StorageError::Invalid(msg) => write!(f, "Invalid policy: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Read and validate a policy file
pub fn load_policy_file(path: &Path) -> Result<AnalyticsPolicy, StorageError> {
    let content = fs::read_to_string(path).map_err(|e| {
        StorageError::Io(format!("Failed to read policy {}: {e}", path.display()))
    })?;

    let policy: AnalyticsPolicy = serde_saphyr::from_str(&content)
        .map_err(|e| StorageError::Parse(format!("Failed to parse policy: {e}")))?;

    policy
        .validate()
        .map_err(|e| StorageError::Invalid(e.to_string()))?;
    Ok(policy)
}

/// Manages the data directory
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the default data directory path (~/.salesperf/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".salesperf")
    }

    pub fn policy_path(&self) -> PathBuf {
        self.root.join(POLICY_FILE_NAME)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// Check if the data directory exists and has been initialized
    pub fn exists(&self) -> bool {
        self.root.exists() && self.reports_dir().exists()
    }

    /// Initialize the data directory structure
    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Io(format!("Failed to create data directory: {e}")))?;
        fs::create_dir_all(self.reports_dir())
            .map_err(|e| StorageError::Io(format!("Failed to create reports directory: {e}")))?;
        Ok(())
    }

    /// Policy from `explicit` if given, else `policy.yaml` in the data
    /// directory if present, else the defaults
    pub fn load_policy(&self, explicit: Option<&Path>) -> Result<AnalyticsPolicy, StorageError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading policy from explicit path");
            return load_policy_file(path);
        }

        let path = self.policy_path();
        if !path.exists() {
            tracing::debug!("no policy file, using defaults");
            return Ok(AnalyticsPolicy::default());
        }
        load_policy_file(&path)
    }

    /// Write `policy` to `policy.yaml`, returning the path written
    pub fn save_policy(&self, policy: &AnalyticsPolicy) -> Result<PathBuf, StorageError> {
        if !self.exists() {
            self.init()?;
        }

        let yaml = serde_saphyr::to_string(policy)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize policy: {e}")))?;

        let path = self.policy_path();
        atomic_write(&path, &yaml)
            .map_err(|e| StorageError::Io(format!("Failed to write policy: {e}")))?;
        Ok(path)
    }

    /// Save a rendered report under `reports/`, returning the path written
    pub fn save_report(&self, name: &str, content: &str) -> Result<PathBuf, StorageError> {
        if !self.exists() {
            self.init()?;
        }

        let path = self.reports_dir().join(sanitize_filename(name));
        atomic_write(&path, content)
            .map_err(|e| StorageError::Io(format!("Failed to write report: {e}")))?;
        Ok(path)
    }

    /// Get the root path of the data directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Sanitize a filename to be safe for the filesystem
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
