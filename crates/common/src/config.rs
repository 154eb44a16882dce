//! Layered configuration for `ens-admin`.
//!
//! Sources, in ascending order of precedence:
//!
//! 1. [`Config::default`]
//! 2. `ens-admin.toml` (or the file passed with `--config` / `ENS_ADMIN_CONFIG`)
//! 3. `ENS_ADMIN_` prefixed environment variables
//! 4. `MNEMONIC` and `ETH_RPC_URL`
//! 5. any provider merged by the caller, usually the command line

use crate::explorer::{DEFAULT_EXPLORER_HOST, DEFAULT_PRIMARY_NETWORK, Explorer};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

/// The mnemonic used by local development nodes.
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Networks on which the public [`TEST_MNEMONIC`] may be used as a fallback.
pub const LOCAL_NETWORKS: &[&str] = &["hardhat", "localhost", "anvil"];

/// Errors raised while building or validating a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Extract(#[from] ExtractConfigError),
    #[error("`rpc_url` is not set, pass --rpc-url or set ETH_RPC_URL")]
    MissingRpcUrl,
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

/// Represents a failed attempt to extract [`Config`] from a [`Figment`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique = HashSet::with_capacity(self.error.count());
        write!(f, "failed to extract ens-admin config:")?;
        for err in self.error.clone() {
            let err = err.to_string();
            if unique.insert(err.clone()) {
                write!(f, "\n{err}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

/// Settings shared by every procedure.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network name, selects the deployments directory and explorer prefix.
    pub network: String,
    /// JSON-RPC endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// BIP-39 phrase the authorities are derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// Derivation index of the account allowed to assign under the root node.
    pub registry_owner_index: u32,
    /// Derivation index of the account receiving the domains.
    pub domain_owner_index: u32,
    /// Private key overriding the registry owner derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_owner_key: Option<String>,
    /// Private key overriding the domain owner derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_owner_key: Option<String>,
    /// Root directory of the deployment artifacts.
    pub deployments: PathBuf,
    pub registry_artifact: String,
    pub resolver_artifact: String,
    /// Gas limit attached to every submission.
    pub gas_limit: u64,
    /// Confirmations required before a submission counts as confirmed.
    pub confirmations: u64,
    /// Seconds to wait for each confirmation.
    pub confirmation_timeout: u64,
    pub explorer_host: String,
    /// Network served from the bare explorer host.
    pub primary_network: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "sepolia".to_string(),
            rpc_url: None,
            mnemonic: None,
            registry_owner_index: 0,
            domain_owner_index: 1,
            registry_owner_key: None,
            domain_owner_key: None,
            deployments: PathBuf::from("deployments"),
            registry_artifact: "ENSRegistry".to_string(),
            resolver_artifact: "OffchainResolver".to_string(),
            gas_limit: 1_000_000,
            confirmations: 1,
            confirmation_timeout: 300,
            explorer_host: DEFAULT_EXPLORER_HOST.to_string(),
            primary_network: DEFAULT_PRIMARY_NETWORK.to_string(),
        }
    }
}

// Secrets are never printed.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "<redacted>")
        }
        f.debug_struct("Config")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("mnemonic", &redact(&self.mnemonic))
            .field("registry_owner_index", &self.registry_owner_index)
            .field("domain_owner_index", &self.domain_owner_index)
            .field("registry_owner_key", &redact(&self.registry_owner_key))
            .field("domain_owner_key", &redact(&self.domain_owner_key))
            .field("deployments", &self.deployments)
            .field("registry_artifact", &self.registry_artifact)
            .field("resolver_artifact", &self.resolver_artifact)
            .field("gas_limit", &self.gas_limit)
            .field("confirmations", &self.confirmations)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .field("explorer_host", &self.explorer_host)
            .field("primary_network", &self.primary_network)
            .finish()
    }
}

impl Config {
    /// The default config file name.
    pub const FILE_NAME: &'static str = "ens-admin.toml";

    /// Environment variable prefix.
    pub const ENV_PREFIX: &'static str = "ENS_ADMIN_";

    /// Returns the figment of every source except the command line.
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["CONFIG", "DEBUG"]))
            .merge(LegacyEnvProvider)
    }

    /// Loads the config from `file`, the environment and `overrides`, then validates it.
    pub fn load(file: &Path, overrides: impl Provider) -> Result<Self, ConfigError> {
        let config = Self::from_provider(Self::figment(file).merge(overrides))?;
        config.validate()?;
        debug!(?config, "loaded config");
        Ok(config)
    }

    /// Extracts a config from any provider, without validation.
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)
    }

    /// Checks the invariants the procedures rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rpc_url()?;
        if self.gas_limit == 0 {
            return Err(ConfigError::Zero("gas_limit"));
        }
        if self.confirmations == 0 {
            return Err(ConfigError::Zero("confirmations"));
        }
        if self.confirmation_timeout == 0 {
            return Err(ConfigError::Zero("confirmation_timeout"));
        }
        Ok(())
    }

    /// Returns the RPC endpoint.
    pub fn rpc_url(&self) -> Result<&str, ConfigError> {
        self.rpc_url.as_deref().filter(|url| !url.trim().is_empty()).ok_or(ConfigError::MissingRpcUrl)
    }

    /// Returns `true` if the configured network is a local development node.
    pub fn is_local_network(&self) -> bool {
        LOCAL_NETWORKS.contains(&self.network.as_str())
    }

    /// Returns the mnemonic, falling back to [`TEST_MNEMONIC`] on local networks.
    pub fn mnemonic(&self) -> Option<&str> {
        match self.mnemonic.as_deref() {
            Some(mnemonic) => Some(mnemonic),
            None if self.is_local_network() => {
                warn!(network = %self.network, "no mnemonic configured, using the test mnemonic");
                Some(TEST_MNEMONIC)
            }
            None => None,
        }
    }

    /// Returns the bound on each confirmation wait.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout)
    }

    /// Returns the explorer for the configured network.
    pub fn explorer(&self) -> Explorer {
        Explorer::new(&self.explorer_host, &self.network, &self.primary_network)
    }

    /// Returns the directory holding the artifacts of the configured network.
    pub fn deployments_dir(&self) -> PathBuf {
        self.deployments.join(&self.network)
    }
}

/// Reads the unprefixed `MNEMONIC` and `ETH_RPC_URL` variables hardhat projects use, skipping
/// empty ones.
#[derive(Clone, Copy, Debug, Default)]
struct LegacyEnvProvider;

impl LegacyEnvProvider {
    const VARS: [(&'static str, &'static str); 2] =
        [("MNEMONIC", "mnemonic"), ("ETH_RPC_URL", "rpc_url")];
}

impl Provider for LegacyEnvProvider {
    fn metadata(&self) -> Metadata {
        Env::raw().metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::default();
        for (var, key) in Self::VARS {
            if let Ok(value) = std::env::var(var)
                && !value.trim().is_empty()
            {
                dict.insert(key.to_string(), value.into());
            }
        }
        Ok(Map::from([(Profile::Default, dict)]))
    }
}
