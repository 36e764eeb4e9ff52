//! Connection settings for the Serf agent.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (`127.0.0.1:8800`, no auth token)
//! 2. YAML file from `--config` or `SERFCTL_CONFIG`:
//!    ```yaml
//!    raft-server:
//!      serf-address: 0.0.0.0:8800
//!      serf-auth: s3cret
//!    ```
//! 3. Environment variables `SERF_ADDRESS`, `SERF_AUTH_TOKEN`
//! 4. Command line flags

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8800";

pub const ENV_CONFIG: &str = "SERFCTL_CONFIG";
pub const ENV_ADDRESS: &str = "SERF_ADDRESS";
pub const ENV_AUTH_TOKEN: &str = "SERF_AUTH_TOKEN";

/// Where and how to reach the agent. Fixed for the whole process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Agent RPC address as configured (may be a bind address like `0.0.0.0:8800`).
    pub address: String,
    pub auth_token: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            auth_token: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(rename = "raft-server")]
    raft_server: RaftServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RaftServerSection {
    #[serde(rename = "serf-address")]
    serf_address: Option<String>,
    #[serde(rename = "serf-auth")]
    serf_auth: Option<String>,
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub address: Option<String>,
    pub auth_token: Option<String>,
}

/// Resolve the config from the process environment.
pub fn load(overrides: &Overrides) -> Result<ConnectionConfig, ConfigError> {
    resolve(overrides, |key| std::env::var(key).ok())
}

/// Resolve the config with an injectable environment lookup.
pub fn resolve<F>(overrides: &Overrides, env: F) -> Result<ConnectionConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    let mut config = ConnectionConfig::default();

    let file = overrides
        .config_file
        .clone()
        .or_else(|| lookup(ENV_CONFIG).map(PathBuf::from));
    if let Some(path) = file {
        let section = read_file(&path)?.raft_server;
        if let Some(address) = section.serf_address {
            config.address = address;
        }
        if let Some(token) = section.serf_auth {
            config.auth_token = token;
        }
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    if let Some(address) = lookup(ENV_ADDRESS) {
        config.address = address;
    }
    if let Some(token) = lookup(ENV_AUTH_TOKEN) {
        config.auth_token = token;
    }

    if let Some(address) = &overrides.address {
        config.address = address.clone();
    }
    if let Some(token) = &overrides.auth_token {
        config.auth_token = token.clone();
    }

    tracing::debug!(
        address = %config.address,
        auth = !config.auth_token.is_empty(),
        "resolved connection config"
    );
    Ok(config)
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn yaml(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_apply_without_sources() {
        let cfg = resolve(&Overrides::default(), no_env).unwrap();
        assert_eq!(cfg.address, "127.0.0.1:8800");
        assert_eq!(cfg.auth_token, "");
    }

    #[test]
    fn file_then_env_then_flags() {
        let file = yaml("raft-server:\n  serf-address: 0.0.0.0:9900\n  serf-auth: from-file\n");
        let mut overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let cfg = resolve(&overrides, no_env).unwrap();
        assert_eq!(cfg.address, "0.0.0.0:9900");
        assert_eq!(cfg.auth_token, "from-file");

        let env: HashMap<&str, &str> = HashMap::from([(ENV_AUTH_TOKEN, "from-env")]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());
        let cfg = resolve(&overrides, lookup).unwrap();
        assert_eq!(cfg.address, "0.0.0.0:9900");
        assert_eq!(cfg.auth_token, "from-env");

        overrides.address = Some(":7373".into());
        let cfg = resolve(&overrides, lookup).unwrap();
        assert_eq!(cfg.address, ":7373");
        assert_eq!(cfg.auth_token, "from-env");
    }

    #[test]
    fn config_path_from_env_and_partial_file() {
        let file = yaml("raft-server:\n  serf-auth: only-token\n");
        let path = file.path().to_string_lossy().to_string();
        let cfg = resolve(&Overrides::default(), |k| {
            (k == ENV_CONFIG).then(|| path.clone())
        })
        .unwrap();
        assert_eq!(cfg.address, DEFAULT_ADDRESS);
        assert_eq!(cfg.auth_token, "only-token");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let cfg = resolve(&Overrides::default(), |_| Some("  ".into())).unwrap();
        assert_eq!(cfg, ConnectionConfig::default());
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file = yaml("");
        let overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(resolve(&overrides, no_env).unwrap(), ConnectionConfig::default());
    }

    #[test]
    fn missing_and_malformed_files_fail() {
        let overrides = Overrides {
            config_file: Some(PathBuf::from("/definitely/not/here.yaml")),
            ..Default::default()
        };
        assert!(matches!(resolve(&overrides, no_env), Err(ConfigError::Read { .. })));

        let file = yaml("raft-server: [unterminated\n");
        let overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(resolve(&overrides, no_env), Err(ConfigError::Parse { .. })));
    }
}
