//! Configuration loaded from `~/.solfriends/config.yaml`
//!
//! Every field is optional in the file. Environment overrides:
//! - `SOLFRIENDS_RPC_URL`: RPC endpoint
//! - `SOLFRIENDS_KEYPAIR`: keypair file path

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{APP_DIR, CONFIG_FILE};
use crate::models::Cluster;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cluster: Cluster,
    /// Overrides the cluster's public endpoint
    pub rpc_url: Option<String>,
    pub keypair_path: PathBuf,
    /// Holds friends.json and the log file
    pub data_dir: PathBuf,
    pub commitment: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Config {
            cluster: Cluster::Devnet,
            rpc_url: None,
            keypair_path: home.join(".config").join("solana").join("id.json"),
            data_dir: home.join(APP_DIR),
            commitment: String::from("confirmed"),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SOLFRIENDS_RPC_URL") {
            self.rpc_url = Some(url);
        }
        if let Some(path) = lookup("SOLFRIENDS_KEYPAIR") {
            self.keypair_path = PathBuf::from(path);
        }
    }

    /// Endpoint actually used
    pub fn rpc_url(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or_else(|| self.cluster.rpc_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rpc_url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_partial_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "cluster: mainnet-beta\ncommitment: finalized\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cluster, Cluster::MainnetBeta);
        assert_eq!(config.commitment, "finalized");
        assert_eq!(config.rpc_url(), "https://api.mainnet-beta.solana.com");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "cluster: [unclosed").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "SOLFRIENDS_RPC_URL" => Some("http://127.0.0.1:8899".to_string()),
            "SOLFRIENDS_KEYPAIR" => Some("/tmp/id.json".to_string()),
            _ => None,
        });
        assert_eq!(config.rpc_url(), "http://127.0.0.1:8899");
        assert_eq!(config.keypair_path, PathBuf::from("/tmp/id.json"));
    }
}
