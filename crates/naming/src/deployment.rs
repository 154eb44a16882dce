//! Where procedures get their authorities and contract handles from.

use crate::{
    artifacts::{ContractHandle, ContractKind},
    error::NamingError,
    wallet::{Authority, Role},
};
use ens_admin_common::Config;

/// Resolves the identities and contracts a procedure acts with.
pub trait Deployment {
    fn authority(&self, role: Role) -> Result<Authority, NamingError>;

    fn contract(&self, kind: ContractKind) -> Result<ContractHandle, NamingError>;
}

/// A [`Deployment`] backed by the loaded [`Config`]: signers from its keys or mnemonic,
/// contracts from its deployment artifacts.
#[derive(Clone, Copy, Debug)]
pub struct ConfigDeployment<'a> {
    config: &'a Config,
}

impl<'a> ConfigDeployment<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Deployment for ConfigDeployment<'_> {
    fn authority(&self, role: Role) -> Result<Authority, NamingError> {
        Authority::from_config(self.config, role)
    }

    fn contract(&self, kind: ContractKind) -> Result<ContractHandle, NamingError> {
        ContractHandle::from_config(self.config, kind)
    }
}
