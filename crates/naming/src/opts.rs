use crate::error::NamingError;
use clap::Parser;
use ens_admin_common::Config;
use figment::{
    Metadata, Profile, Provider,
    value::{Dict, Map, Value},
};
use std::path::PathBuf;

/// Options shared by every command, merged over the config file and environment.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Network options")]
pub struct AdminOpts {
    /// The config file.
    #[arg(long, env = "ENS_ADMIN_CONFIG", default_value = Config::FILE_NAME, value_name = "PATH")]
    pub config: PathBuf,

    /// The network name, e.g. `mainnet` or `sepolia`.
    ///
    /// Selects the deployments directory and the explorer subdomain.
    #[arg(long, short)]
    pub network: Option<String>,

    /// The RPC endpoint.
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,

    /// The root directory of the deployment artifacts.
    #[arg(long, value_name = "PATH")]
    pub deployments: Option<PathBuf>,

    /// Gas limit attached to every transaction.
    #[arg(long)]
    pub gas_limit: Option<u64>,

    /// Number of confirmations to wait for.
    #[arg(long)]
    pub confirmations: Option<u64>,

    /// Seconds to wait for each confirmation before aborting.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Provider for AdminOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        if let Some(network) = &self.network {
            dict.insert("network".to_string(), network.clone().into());
        }
        if let Some(rpc_url) = &self.rpc_url {
            dict.insert("rpc_url".to_string(), rpc_url.clone().into());
        }
        if let Some(deployments) = &self.deployments {
            // non UTF-8 paths are rejected rather than rewritten
            dict.insert("deployments".to_string(), Value::serialize(deployments)?);
        }
        if let Some(gas_limit) = self.gas_limit {
            dict.insert("gas_limit".to_string(), gas_limit.into());
        }
        if let Some(confirmations) = self.confirmations {
            dict.insert("confirmations".to_string(), confirmations.into());
        }
        if let Some(timeout) = self.timeout {
            dict.insert("confirmation_timeout".to_string(), timeout.into());
        }
        Ok(Map::from([(Profile::Default, dict)]))
    }
}

impl AdminOpts {
    /// Loads and validates the config, with these options taking precedence.
    pub fn load_config(&self) -> Result<Config, NamingError> {
        Ok(Config::load(&self.config, self)?)
    }
}
