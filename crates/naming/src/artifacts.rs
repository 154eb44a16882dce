//! Contract handles loaded from deployment artifacts.
//!
//! Artifacts follow the hardhat-deploy layout: `<deployments>/<network>/<Name>.json`, each file
//! holding at least the deployed `address` and the contract `abi`.

use crate::error::NamingError;
use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use ens_admin_common::Config;
use serde::Deserialize;
use std::{fmt, fs, io, path::Path};

/// The contracts the procedures call into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Registry,
    OffchainResolver,
}

impl ContractKind {
    /// Functions the artifact's interface must expose.
    pub fn required_functions(&self) -> &'static [&'static str] {
        match self {
            Self::Registry => &["owner", "resolver", "setSubnodeOwner", "setResolver"],
            Self::OffchainResolver => &["resolve"],
        }
    }

    /// The artifact name configured for this contract.
    pub fn artifact_name<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Self::Registry => &config.registry_artifact,
            Self::OffchainResolver => &config.resolver_artifact,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Registry => "registry",
            Self::OffchainResolver => "offchain resolver",
        })
    }
}

/// Why a deployment artifact could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read the deployment file")]
    Read(#[from] io::Error),
    #[error("malformed deployment file")]
    Parse(#[from] serde_json::Error),
    #[error("{0} is deployed at the zero address")]
    ZeroAddress(String),
    #[error("{name} does not expose {}", missing.join(", "))]
    MissingFunctions { name: String, missing: Vec<&'static str> },
}

#[derive(Deserialize)]
struct DeploymentArtifact {
    address: Address,
    abi: JsonAbi,
}

/// A deployed contract: its address and interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractHandle {
    pub name: String,
    pub kind: ContractKind,
    pub address: Address,
    pub abi: JsonAbi,
}

impl ContractHandle {
    /// Loads `<dir>/<name>.json` and checks that it exposes the functions of `kind`.
    pub fn load(dir: &Path, name: &str, kind: ContractKind) -> Result<Self, NamingError> {
        let path = dir.join(format!("{name}.json"));
        Self::read(&path, name, kind)
            .map_err(|source| NamingError::Artifact { kind, path: path.clone(), source })
    }

    fn read(path: &Path, name: &str, kind: ContractKind) -> Result<Self, ArtifactError> {
        let artifact: DeploymentArtifact = serde_json::from_str(&fs::read_to_string(path)?)?;
        let handle =
            Self { name: name.to_string(), kind, address: artifact.address, abi: artifact.abi };
        handle.ensure_interface()?;
        debug!(%kind, %name, address = %handle.address, "loaded contract artifact");
        Ok(handle)
    }

    /// Loads the artifact configured for `kind` on the configured network.
    pub fn from_config(config: &Config, kind: ContractKind) -> Result<Self, NamingError> {
        Self::load(&config.deployments_dir(), kind.artifact_name(config), kind)
    }

    /// Creates a handle for a known address, without an interface.
    pub fn new(name: impl Into<String>, kind: ContractKind, address: Address) -> Self {
        Self { name: name.into(), kind, address, abi: JsonAbi::default() }
    }

    fn ensure_interface(&self) -> Result<(), ArtifactError> {
        if self.address == Address::ZERO {
            return Err(ArtifactError::ZeroAddress(self.name.clone()));
        }
        let missing: Vec<_> = self
            .kind
            .required_functions()
            .iter()
            .filter(|function| self.abi.function(function).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ArtifactError::MissingFunctions { name: self.name.clone(), missing });
        }
        Ok(())
    }
}
