use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_yml;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_ENV: &str = "TELEINFO_CONFIG";
const CONFIG_PATHS: [&str; 2] = ["config/teleinfo.yaml", "teleinfo.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Unable to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] serde_yml::Error),
}

fn teleinfo_name_default() -> String { return "teleinfo".to_string() }
fn teleinfo_tenant_default() -> String { return "default".to_string() }
fn teleinfo_check_required_labels_default() -> bool { return true }
fn teleinfo_channel_size_default() -> usize { return 10 }

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TeleinfoConfig {
    #[serde(default="teleinfo_name_default")]
    pub name: String,
    #[serde(default="teleinfo_tenant_default")]
    pub tenant: String,
    /* Reject frames which lack a label their frame type requires */
    #[serde(default="teleinfo_check_required_labels_default")]
    pub check_required_labels: bool,
    #[serde(default="teleinfo_channel_size_default")]
    pub channel_size: usize,
}

impl Default for TeleinfoConfig {
    fn default() -> Self {
        return TeleinfoConfig {
            name: teleinfo_name_default(),
            tenant: teleinfo_tenant_default(),
            check_required_labels: teleinfo_check_required_labels_default(),
            channel_size: teleinfo_channel_size_default(),
        }
    }
}

fn teleinfo_default() -> TeleinfoConfig { return TeleinfoConfig::default() }

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default="teleinfo_default")]
    pub teleinfo: TeleinfoConfig,
}

pub struct ConfigHolder {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl ConfigHolder {
    /// Loads the first config found: `$TELEINFO_CONFIG`, `config/teleinfo.yaml`, `teleinfo.yaml`.
    /// Without any of them the defaults are used.
    pub fn load() -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(p));
        }
        candidates.extend(CONFIG_PATHS.iter().map(PathBuf::from));

        for path in candidates {
            if !path.exists() {
                debug!("No config at {}", path.display());
                continue;
            }
            match Self::load_from(&path) {
                Ok(holder) => return holder,
                Err(e) => error!("{e}, falling back to the next candidate"),
            }
        }

        info!("No usable config file found, running with defaults");
        return ConfigHolder { config: Config::default(), path: None }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Config = serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        info!("Config loaded from {}", path.display());
        Ok(ConfigHolder { config, path: Some(path.to_path_buf()) })
    }

    pub fn get_teleinfo_copy(&self) -> TeleinfoConfig {
        return self.config.teleinfo.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c: Config = serde_yml::from_str("{}").unwrap();
        assert_eq!(c.teleinfo, TeleinfoConfig::default());
        assert_eq!(c.teleinfo.name, "teleinfo");
        assert!(c.teleinfo.check_required_labels);
        assert_eq!(c.teleinfo.channel_size, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "teleinfo:\n  name: linky\n  check_required_labels: false").unwrap();

        let holder = ConfigHolder::load_from(file.path()).unwrap();
        let c = holder.get_teleinfo_copy();
        assert_eq!(c.name, "linky");
        assert_eq!(c.tenant, "default");
        assert!(!c.check_required_labels);
        assert_eq!(holder.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(ConfigHolder::load_from(&missing), Err(ConfigError::Io(..))));

        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "teleinfo: [1, 2").unwrap();
        assert!(matches!(ConfigHolder::load_from(&broken), Err(ConfigError::Parse(..))));
    }
}
