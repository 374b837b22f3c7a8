//! # Service Configuration
//!
//! Configuration is assembled in three layers, lowest precedence first:
//! built-in defaults, an optional YAML file, and `CLINIC_*` environment
//! variables.
//!
//! The YAML file is taken from `CLINIC_CONFIG` when set, otherwise from
//! `clinic.yaml` inside the data directory if such a file exists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "clinic.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the CSV record files
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// Origin allowed by CORS (the web frontend)
    pub allowed_origin: String,
    /// Fallback tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
    pub patients_file: String,
    pub receipts_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            log_filter: "info".to_string(),
            patients_file: "patients.csv".to_string(),
            receipts_file: "receipts.csv".to_string(),
        }
    }
}

/// ~/Documents/Dental Clinic, or ./data when no documents directory is known
fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .map(|documents| documents.join("Dental Clinic"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve environment variables
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // The data directory has to be known before we can look for clinic.yaml in it
        if let Some(data_directory) = lookup("CLINIC_DATA_DIR") {
            config.data_directory = PathBuf::from(data_directory);
        }

        let config_path = match lookup("CLINIC_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let candidate = config.data_directory.join(CONFIG_FILE_NAME);
                candidate.exists().then_some(candidate)
            }
        };

        if let Some(path) = config_path {
            config = Self::from_yaml_file(&path)?;
        }

        config.apply_overrides(&lookup);
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CLINIC_DATA_DIR") {
            self.data_directory = PathBuf::from(value);
        }
        if let Some(value) = lookup("CLINIC_BIND_ADDR") {
            self.bind_address = value;
        }
        if let Some(value) = lookup("CLINIC_ALLOWED_ORIGIN") {
            self.allowed_origin = value;
        }
        if let Some(value) = lookup("CLINIC_LOG") {
            self.log_filter = value;
        }
    }

    pub fn patients_path(&self) -> PathBuf {
        self.data_directory.join(&self.patients_file)
    }

    pub fn receipts_path(&self) -> PathBuf {
        self.data_directory.join(&self.receipts_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from<'a>(vars: &'a HashMap<&'a str, String>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let temp_dir = TempDir::new().unwrap();
        let mut vars = HashMap::new();
        vars.insert("CLINIC_DATA_DIR", temp_dir.path().display().to_string());

        let config = AppConfig::load_with(lookup_from(&vars)).unwrap();

        assert_eq!(config.data_directory, temp_dir.path());
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.allowed_origin, "http://localhost:8080");
        assert_eq!(config.patients_path(), temp_dir.path().join("patients.csv"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("bind_address: 0.0.0.0:4000\n").unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:4000");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.receipts_file, "receipts.csv");
    }

    #[test]
    fn test_yaml_in_data_directory_is_discovered() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "receipts_file: revenue_export.csv\nlog_filter: debug\n",
        )
        .unwrap();

        let mut vars = HashMap::new();
        vars.insert("CLINIC_DATA_DIR", temp_dir.path().display().to_string());

        let config = AppConfig::load_with(lookup_from(&vars)).unwrap();

        assert_eq!(config.receipts_file, "revenue_export.csv");
        assert_eq!(config.log_filter, "debug");
        // The env var wins over whatever the file says about the data directory
        assert_eq!(config.data_directory, temp_dir.path());
    }

    #[test]
    fn test_environment_overrides_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "bind_address: 0.0.0.0:4000\nallowed_origin: http://a.test\n").unwrap();

        let mut vars = HashMap::new();
        vars.insert("CLINIC_CONFIG", config_path.display().to_string());
        vars.insert("CLINIC_BIND_ADDR", "127.0.0.1:9999".to_string());

        let config = AppConfig::load_with(lookup_from(&vars)).unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9999");
        assert_eq!(config.allowed_origin, "http://a.test");
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let mut vars = HashMap::new();
        vars.insert("CLINIC_CONFIG", "/definitely/not/here/clinic.yaml".to_string());

        assert!(AppConfig::load_with(lookup_from(&vars)).is_err());
    }
}
