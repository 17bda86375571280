// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::chain_config::ChainConfig;
use crate::contract::ContractAddresses;
use crate::load_config::{find_in_parent, resolve_config_path, ConfigSource};
use crate::yaml::load_yaml_with_env;
use anyhow::{anyhow, bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "incoswap.config.yaml";
pub const DEFAULT_STORE_NAME: &str = "authorizations";
pub const ENV_PREFIX: &str = "INCOSWAP_";

/// Minor-unit scale of the confidential tokens
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Largest scale where `10^decimals` still fits in 64 bits
const MAX_TOKEN_DECIMALS: u8 = 19;

/// Where re-encryption authorizations are persisted
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// Lost when the process exits
    Memory,
    /// On-disk sled database, relative paths resolve against the data dir
    Sled { path: Option<PathBuf> },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sled { path: None }
    }
}

/// Storage resolved to a concrete location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sled(PathBuf),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UnscopedAppConfig {
    chain: ChainConfig,
    contracts: ContractAddresses,
    token_decimals: u8,
    store: StoreConfig,
    /// The data dir defaults to `~/.local/share/incoswap` on linux
    data_dir: Option<PathBuf>,
    /// The config file as found before loading. This is set by the loader and should not be
    /// used in configuration files.
    found_config_file: Option<PathBuf>,
}

impl Default for UnscopedAppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            contracts: ContractAddresses::default(),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            store: StoreConfig::default(),
            data_dir: None,
            found_config_file: None,
        }
    }
}

impl UnscopedAppConfig {
    /// Resolve using the OS data dir and the current working directory
    pub fn resolve(self) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(self, &OsDirs::data_dir()?, &env::current_dir()?)
    }

    pub fn resolve_with_defaults(self, default_data_dir: &Path, cwd: &Path) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(self, default_data_dir, cwd)
    }
}

/// The config actually used throughout the client
#[derive(Debug, Clone)]
pub struct AppConfig {
    chain: ChainConfig,
    contracts: ContractAddresses,
    token_decimals: u8,
    store: StoreBackend,
    data_dir: PathBuf,
    config_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn try_from_unscoped(
        config: UnscopedAppConfig,
        default_data_dir: &Path,
        cwd: &Path,
    ) -> Result<Self> {
        if config.token_decimals > MAX_TOKEN_DECIMALS {
            bail!(
                "token_decimals must be at most {MAX_TOKEN_DECIMALS}, got {}",
                config.token_decimals
            );
        }

        // Validate early so a bad url fails at startup and not at the first transaction
        config.chain.rpc()?;

        let data_dir = match config.data_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => clean(cwd.join(dir)),
            None => default_data_dir.to_path_buf(),
        };

        let store = match config.store {
            StoreConfig::Memory => StoreBackend::Memory,
            StoreConfig::Sled { path: None } => StoreBackend::Sled(data_dir.join(DEFAULT_STORE_NAME)),
            StoreConfig::Sled { path: Some(p) } if p.is_absolute() => StoreBackend::Sled(p),
            StoreConfig::Sled { path: Some(p) } => StoreBackend::Sled(clean(data_dir.join(p))),
        };

        Ok(AppConfig {
            chain: config.chain,
            contracts: config.contracts,
            token_decimals: config.token_decimals,
            store,
            data_dir,
            config_file: config.found_config_file,
        })
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub fn token_decimals(&self) -> u8 {
        self.token_decimals
    }

    pub fn store(&self) -> &StoreBackend {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The configuration file that was read, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

/// Value struct for passing loader state into the configuration
#[derive(Default, Serialize, Deserialize, Clone, Debug)]
struct LoaderOverrides {
    found_config_file: Option<PathBuf>,
}

/// Load the config from `config_file`, or from `incoswap.config.yaml` found upwards of the cwd or
/// in the OS config dir. A discovered file may be absent, in which case built-in defaults and
/// `INCOSWAP_` environment variables apply. An explicit file must exist.
pub fn load_config(config_file: Option<&Path>) -> Result<AppConfig> {
    let cwd = env::current_dir()?;
    let source = resolve_config_path(
        find_in_parent,
        &cwd,
        &OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file,
    );

    let mut figment = Figment::from(Serialized::defaults(UnscopedAppConfig::default()));

    let found = match &source {
        ConfigSource::Explicit(path) => Some(path.clone()),
        ConfigSource::Discovered(path) if path.exists() => Some(path.clone()),
        ConfigSource::Discovered(path) => {
            debug!(path = ?path, "No configuration file, using defaults");
            None
        }
    };

    if let Some(path) = &found {
        let loaded_yaml = load_yaml_with_env(path).context("Configuration file not found")?;
        figment = figment.merge(Yaml::string(&loaded_yaml));
    }

    let config: UnscopedAppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(LoaderOverrides {
            found_config_file: found,
        }))
        .extract()
        .context("Could not parse configuration")?;

    config.resolve()
}

pub struct OsDirs;

impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("incoswap"))
            .ok_or_else(|| anyhow!("The OS does not provide a config dir. See https://docs.rs/dirs for more information."))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|d| d.join("incoswap"))
            .ok_or_else(|| anyhow!("The OS does not provide a data dir. See https://docs.rs/dirs for more information."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use figment::Jail;

    #[test]
    fn test_deserialization() -> Result<()> {
        let config_str = r#"
data_dir: "./data"
token_decimals: 6
chain:
  name: "rivest"
  rpc_url: "wss://validator.example.org/ws"
  chain_id: 21097
contracts:
  swap_pool: "0x5550edF005ffFc7f398Dc7A2DD6d5021E8D97886"
  token_a: "0x811945cc1d17482359a27a4e7d43c352dfae0540"
  token_b: "0x79B912539834946DF7DFaA2539b31D2B4E487d76"
  mint_tokens: []
store:
  type: sled
  path: "cache"
"#;
        let unscoped: UnscopedAppConfig = serde_yaml::from_str(config_str)?;
        let config = unscoped
            .resolve_with_defaults(Path::new("/default/data"), Path::new("/my/cwd"))?;

        assert_eq!(config.chain().name, "rivest");
        assert_eq!(config.chain().chain_id, Some(21097));
        assert_eq!(
            config.contracts().token_a,
            address!("811945Cc1D17482359a27A4E7D43C352DFAE0540")
        );
        assert!(config.contracts().mint_tokens.is_empty());
        assert_eq!(config.data_dir(), Path::new("/my/cwd/data"));
        assert_eq!(
            config.store(),
            &StoreBackend::Sled(PathBuf::from("/my/cwd/data/cache"))
        );
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = UnscopedAppConfig::default()
            .resolve_with_defaults(Path::new("/default/data"), Path::new("/my/cwd"))?;

        assert_eq!(config.token_decimals(), DEFAULT_TOKEN_DECIMALS);
        assert_eq!(config.contracts(), &ContractAddresses::default());
        assert_eq!(config.contracts().mint_tokens.len(), 2);
        assert_eq!(
            config.store(),
            &StoreBackend::Sled(PathBuf::from("/default/data/authorizations"))
        );
        assert!(config.config_file().is_none());
        Ok(())
    }

    #[test]
    fn test_rejects_bad_values() {
        let unscoped: UnscopedAppConfig = serde_yaml::from_str("token_decimals: 20").unwrap();
        assert!(unscoped
            .resolve_with_defaults(Path::new("/d"), Path::new("/c"))
            .is_err());

        let unscoped: UnscopedAppConfig =
            serde_yaml::from_str("chain:\n  rpc_url: \"ftp://nope\"").unwrap();
        assert!(unscoped
            .resolve_with_defaults(Path::new("/d"), Path::new("/c"))
            .is_err());
    }

    #[test]
    fn test_file_not_found() -> Result<()> {
        let Err(err) = load_config(Some(Path::new("/nope/incoswap.config.yaml"))) else {
            bail!("error expected");
        };
        let Some(e) = err.downcast_ref::<std::io::Error>() else {
            bail!("io error expected");
        };

        assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_config_file_and_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TEST_TOKEN_B", "0x79B912539834946DF7DFaA2539b31D2B4E487d76");
            jail.set_env("INCOSWAP_CHAIN__NAME", "from-env");
            jail.set_env("INCOSWAP_STORE__TYPE", "memory");
            jail.create_file(
                DEFAULT_CONFIG_NAME,
                r#"
chain:
  name: "hardhat"
  rpc_url: "http://localhost:8545"
contracts:
  token_b: "${TEST_TOKEN_B}"
"#,
            )?;

            let config = load_config(None).map_err(|e| e.to_string())?;

            // env beats file
            assert_eq!(config.chain().name, "from-env");
            assert_eq!(config.chain().rpc_url, "http://localhost:8545");
            assert_eq!(config.store(), &StoreBackend::Memory);
            assert_eq!(
                config.contracts().token_b,
                address!("79B912539834946DF7DFaA2539b31D2B4E487d76")
            );
            // unspecified contracts keep their defaults
            assert_eq!(
                config.contracts().swap_pool,
                ContractAddresses::default().swap_pool
            );
            assert!(config
                .config_file()
                .is_some_and(|p| p.ends_with(DEFAULT_CONFIG_NAME)));
            Ok(())
        });
    }
}
