//! Configuration management for the hive aggregated API server
//!
//! Settings are resolved in three layers:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::{LogRotation, LoggingConfig};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiveApiServerConfig {
    /// How to reach the API server that stores hive.openshift.io/v1 objects
    pub kube: KubeClientConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Kubernetes client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeClientConfig {
    /// Explicit kubeconfig file; inferred when unset
    pub kubeconfig: Option<PathBuf>,
    /// Context inside the kubeconfig
    pub context: Option<String>,
    /// Use the pod service account
    pub in_cluster: bool,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    Validation(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl HiveApiServerConfig {
    /// Load configuration from the first config file found and the environment
    ///
    /// An unreadable or malformed file is an error rather than being skipped.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("HIVE_APISERVER_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/hive/apiserver.toml")),
            Some(PathBuf::from("./hive-apiserver.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply `HIVE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Kubernetes client
        if let Some(path) = lookup("HIVE_KUBECONFIG") {
            self.kube.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = lookup("HIVE_KUBE_CONTEXT") {
            self.kube.context = Some(context);
        }
        if let Some(in_cluster) = lookup("HIVE_IN_CLUSTER") {
            self.kube.in_cluster = in_cluster.parse().unwrap_or(self.kube.in_cluster);
        }

        // Logging
        if let Some(level) = lookup("HIVE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("HIVE_LOG_DIR") {
            self.logging.file_path = Some(dir);
        }
        if let Some(rotation) = lookup("HIVE_LOG_ROTATION") {
            if let Ok(rotation) = rotation.parse::<LogRotation>() {
                self.logging.rotation = rotation;
            }
        }
        if let Some(json) = lookup("HIVE_LOG_JSON") {
            self.logging.json_format = json.parse().unwrap_or(self.logging.json_format);
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        if self.kube.in_cluster && self.kube.kubeconfig.is_some() {
            return Err(ConfigError::Validation(
                "in_cluster and kubeconfig are mutually exclusive".to_string(),
            ));
        }

        if self.kube.context.is_some() && self.kube.kubeconfig.is_none() {
            return Err(ConfigError::Validation(
                "A kube context requires an explicit kubeconfig".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HiveApiServerConfig::default();
        assert!(!config.kube.in_cluster);
        assert!(config.kube.kubeconfig.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[kube]
kubeconfig = "/etc/hive/kubeconfig"
context = "admin"

[logging]
level = "debug"
rotation = "hourly"
"#
        )
        .unwrap();

        let config = HiveApiServerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.kube.kubeconfig,
            Some(PathBuf::from("/etc/hive/kubeconfig"))
        );
        assert_eq!(config.kube.context.as_deref(), Some("admin"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, LogRotation::Hourly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_errors() {
        let missing = HiveApiServerConfig::load_from_file(Path::new("/nonexistent/hive.toml"));
        assert!(matches!(missing, Err(ConfigError::FileRead { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[kube\nin_cluster = ").unwrap();
        let malformed = HiveApiServerConfig::load_from_file(file.path());
        assert!(matches!(malformed, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HIVE_IN_CLUSTER", "true"),
            ("HIVE_LOG_LEVEL", "warn"),
            ("HIVE_LOG_DIR", "/tmp/hive-logs"),
            ("HIVE_LOG_ROTATION", "never"),
            ("HIVE_LOG_JSON", "not-a-bool"),
        ]
        .into_iter()
        .collect();

        let mut config = HiveApiServerConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.kube.in_cluster);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file_path.as_deref(), Some("/tmp/hive-logs"));
        assert_eq!(config.logging.rotation, LogRotation::Never);
        assert!(!config.logging.json_format);
    }

    #[test]
    fn test_config_validation() {
        let mut config = HiveApiServerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = HiveApiServerConfig::default();
        config.kube.in_cluster = true;
        config.kube.kubeconfig = Some(PathBuf::from("/root/.kube/config"));
        assert!(config.validate().is_err());

        let mut config = HiveApiServerConfig::default();
        config.kube.context = Some("admin".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = HiveApiServerConfig::generate_sample();
        assert!(sample.contains("[kube]"));
        assert!(sample.contains("[logging]"));

        let parsed: HiveApiServerConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, HiveApiServerConfig::default());
    }
}
