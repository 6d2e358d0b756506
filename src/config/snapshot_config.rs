use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_VERSION, DEFAULT_ANDROID_BUILD_PROPS, DEFAULT_DISK_BY_UUID, DEFAULT_GROUP_FILE,
    DEFAULT_OS_RELEASE, DEFAULT_PROC_ROOT, DEFAULT_RESOLV_CONF, DEFAULT_SYS_ROOT,
};
use crate::translate::LoadPolicy;

/// Filesystem locations read by [`SystemSource`](crate::source::SystemSource).
///
/// Overriding them points the adapter at a captured tree instead of the
/// live host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SourcePaths {
    pub proc_root: PathBuf,
    pub sys_root: PathBuf,
    pub resolv_conf: PathBuf,
    pub group_file: PathBuf,
    pub os_release: PathBuf,
    pub disk_by_uuid: PathBuf,
    pub android_build_props: Vec<PathBuf>,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            sys_root: PathBuf::from(DEFAULT_SYS_ROOT),
            resolv_conf: PathBuf::from(DEFAULT_RESOLV_CONF),
            group_file: PathBuf::from(DEFAULT_GROUP_FILE),
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            disk_by_uuid: PathBuf::from(DEFAULT_DISK_BY_UUID),
            android_build_props: DEFAULT_ANDROID_BUILD_PROPS
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

fn default_thread_details() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SnapshotConfig {
    pub version: String,
    pub description: String,
    /// How collection loaders treat records that fail to translate
    #[serde(default)]
    pub load_policy: LoadPolicy,
    /// Read per-thread details for every process (Linux only)
    #[serde(default = "default_thread_details")]
    pub thread_details: bool,
    #[serde(default)]
    pub paths: SourcePaths,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            description: format!("Default snapshot configuration for {}", std::env::consts::OS),
            load_policy: LoadPolicy::default(),
            thread_details: default_thread_details(),
            paths: SourcePaths::default(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: SnapshotConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        SnapshotConfig::default().save_to_yaml_file(path)
    }
}

/// Load a configuration file or create a default one.
///
/// * `Some(path)` that exists is parsed; a parse failure is an error.
/// * `Some(path)` that does not exist gets a default configuration written
///   to it.
/// * `None` uses the built-in defaults without touching the filesystem.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<SnapshotConfig> {
    match config_path {
        Some(path) if path.exists() => SnapshotConfig::from_yaml_file(path),
        Some(path) => {
            info!("Creating default config at {}", path.display());
            let config = SnapshotConfig::default();
            config.save_to_yaml_file(path)?;
            Ok(config)
        }
        None => {
            debug!("No config path provided, using default configuration");
            Ok(SnapshotConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SnapshotConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.load_policy, LoadPolicy::Strict);
        assert!(config.thread_details);
        assert_eq!(config.paths.proc_root, PathBuf::from("/proc"));
        assert_eq!(config.paths.android_build_props.len(), 3);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        let mut config = SnapshotConfig::default();
        config.load_policy = LoadPolicy::Lenient;
        config.thread_details = false;
        config.paths.proc_root = PathBuf::from("/captured/proc");
        config.save_to_yaml_file(&path).unwrap();

        let loaded = SnapshotConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.yaml");
        fs::write(
            &path,
            "version: \"1.0\"\ndescription: partial\npaths:\n  proc_root: /tmp/proc\n",
        )
        .unwrap();

        let config = SnapshotConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.load_policy, LoadPolicy::Strict);
        assert!(config.thread_details);
        assert_eq!(config.paths.proc_root, PathBuf::from("/tmp/proc"));
        assert_eq!(config.paths.sys_root, PathBuf::from("/sys"));
    }

    #[test]
    fn test_lenient_policy_parses_lowercase() {
        let config: SnapshotConfig =
            serde_yaml::from_str("version: \"1.0\"\ndescription: x\nload_policy: lenient\n").unwrap();
        assert_eq!(config.load_policy, LoadPolicy::Lenient);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yaml");
        fs::write(&path, "version: [unclosed").unwrap();
        assert!(SnapshotConfig::from_yaml_file(&path).is_err());
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("device_snapshot.yaml");
        assert!(!path.exists());

        let config = load_or_create_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config, SnapshotConfig::default());

        let reloaded = load_or_create_config(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_or_create_without_path() {
        let config = load_or_create_config(None).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
    }
}
