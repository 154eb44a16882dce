//! Signing authorities.

use crate::error::NamingError;
use alloy_primitives::{
    Address, B256,
    hex::{FromHex, FromHexError},
};
use alloy_signer_local::{
    LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English,
};
use ens_admin_common::Config;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// What an [`Authority`] is allowed to do in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The account allowed to assign nodes under the registry root.
    RegistryOwner,
    /// The account that ends up owning the domains.
    DomainOwner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RegistryOwner => "registry owner",
            Self::DomainOwner => "domain owner",
        })
    }
}

/// A signer acting in a given [`Role`].
#[derive(Clone)]
pub struct Authority {
    role: Role,
    signer: PrivateKeySigner,
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("role", &self.role)
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl Authority {
    pub fn new(role: Role, signer: PrivateKeySigner) -> Self {
        Self { role, signer }
    }

    /// Resolves the authority for `role` from the config.
    ///
    /// A per-role private key takes precedence over the mnemonic derivation.
    pub fn from_config(config: &Config, role: Role) -> Result<Self, NamingError> {
        let (key, index) = match role {
            Role::RegistryOwner => (&config.registry_owner_key, config.registry_owner_index),
            Role::DomainOwner => (&config.domain_owner_key, config.domain_owner_index),
        };
        let missing = |source: SignerError| NamingError::MissingAuthority { role, source };

        let signer = if let Some(key) = key {
            private_key_signer(key).map_err(missing)?
        } else if let Some(mnemonic) = config.mnemonic() {
            mnemonic_signer(mnemonic, index).map_err(missing)?
        } else {
            return Err(missing(SignerError::Unconfigured));
        };

        let authority = Self::new(role, signer);
        debug!(%role, address = %authority.address(), "resolved authority");
        Ok(authority)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

/// Why a signer could not be created.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("private key is invalid hex")]
    InvalidHex(#[from] FromHexError),
    #[error("invalid private key, but env var {0} exists. Is the `$` anchor missing?")]
    ExistsAsEnvVar(String),
    #[error("invalid private key")]
    InvalidKey(#[source] LocalSignerError),
    #[error("failed to read mnemonic file {}", .0.display())]
    MnemonicFile(PathBuf, #[source] io::Error),
    #[error("failed to derive signer #{index} from mnemonic")]
    Derivation {
        index: u32,
        #[source]
        source: LocalSignerError,
    },
    #[error("neither a private key nor a mnemonic is configured")]
    Unconfigured,
}

fn ensure_pk_not_env(pk: &str) -> Result<(), SignerError> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(SignerError::ExistsAsEnvVar(pk.to_string()));
    }
    Ok(())
}

/// Decodes a hex private key, with or without `0x`.
pub fn private_key_signer(private_key: &str) -> Result<PrivateKeySigner, SignerError> {
    let private_key = private_key.trim();
    let bytes = match B256::from_hex(private_key) {
        Ok(bytes) => bytes,
        Err(err) => {
            ensure_pk_not_env(private_key)?;
            return Err(err.into());
        }
    };
    match PrivateKeySigner::from_bytes(&bytes) {
        Ok(signer) => Ok(signer),
        Err(err) => {
            ensure_pk_not_env(private_key)?;
            Err(SignerError::InvalidKey(err.into()))
        }
    }
}

/// Derives the signer at `index` of the default derivation path.
///
/// `mnemonic` is either a phrase or the path of a file containing one.
pub fn mnemonic_signer(mnemonic: &str, index: u32) -> Result<PrivateKeySigner, SignerError> {
    let path = Path::new(mnemonic);
    let mnemonic = if path.is_file() {
        fs::read_to_string(path).map_err(|err| SignerError::MnemonicFile(path.to_path_buf(), err))?
    } else {
        mnemonic.to_owned()
    };
    let mnemonic = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");

    MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(index)
        .and_then(|builder| builder.build())
        .map_err(|source| SignerError::Derivation { index, source })
}
