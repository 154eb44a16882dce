//! Assigning a second-level domain to the domain owner and pointing it at the offchain
//! resolver.

use crate::{
    artifacts::ContractKind,
    backend::{AlloyBackend, RegistryBackend, RegistryCall},
    deployment::{ConfigDeployment, Deployment},
    error::{NamingError, Step},
    opts::AdminOpts,
    procedure::{Procedure, ProcedureReport, Settings},
    wallet::Role,
};
use clap::Parser;
use ens_admin_common::{NameNode, errors::display_chain, labelhash};
use eyre::{Result, WrapErr};
use std::io::Write;

/// CLI arguments for `ens-admin sld-owner`.
#[derive(Clone, Debug, Parser)]
pub struct SldOwnerArgs {
    /// Label of the top-level domain, which must already be owned by the domain owner.
    #[arg(long, default_value = "eth", value_name = "LABEL")]
    pub tld: String,

    /// Label of the second-level domain.
    #[arg(long, default_value = "token", value_name = "LABEL")]
    pub sld: String,

    /// Read the registry first and skip the steps that are already applied.
    ///
    /// Use this to resume after a run that assigned the owner but failed to set the resolver.
    #[arg(long)]
    pub skip_satisfied: bool,

    #[command(flatten)]
    pub opts: AdminOpts,
}

impl SldOwnerArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let backend = AlloyBackend::connect(config.rpc_url()?, config.confirmations)?;
        let settings = Settings::from_config(&config);
        let deployment = ConfigDeployment::new(&config);
        let domain = SecondLevelDomain { tld: &self.tld, sld: &self.sld };
        assign_sld_owner_and_resolver(
            &deployment,
            &backend,
            &settings,
            std::io::stdout(),
            domain,
            self.skip_satisfied,
        )
        .await?;
        Ok(())
    }
}

/// A `<sld>.<tld>` domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecondLevelDomain<'a> {
    pub tld: &'a str,
    pub sld: &'a str,
}

impl SecondLevelDomain<'_> {
    pub fn name(&self) -> String {
        format!("{}.{}", self.sld, self.tld)
    }
}

/// Assigns `domain` to the domain owner, then sets its resolver to the offchain resolver.
///
/// Two calls, both signed by the domain owner:
///
/// 1. `setSubnodeOwner(namehash(tld), labelhash(sld), domain_owner)`
/// 2. `setResolver(namehash(sld.tld), offchain_resolver)`
///
/// The second is only sent once the first is confirmed. If it fails, the domain is left owned
/// but without resolver, and the error says so.
pub async fn assign_sld_owner_and_resolver<D, B, W>(
    deployment: &D,
    backend: &B,
    settings: &Settings,
    out: W,
    domain: SecondLevelDomain<'_>,
    skip_satisfied: bool,
) -> Result<ProcedureReport>
where
    D: Deployment + ?Sized,
    B: RegistryBackend + ?Sized,
    W: Write,
{
    let SecondLevelDomain { tld, sld } = domain;
    let name = domain.name();
    let tld_node = NameNode::from_name(tld).map_err(NamingError::from)?;
    let domain_node = tld_node.child(sld).map_err(NamingError::from)?;

    let domain_owner = deployment.authority(Role::DomainOwner)?;
    let registry = deployment.contract(ContractKind::Registry)?;
    let resolver = deployment.contract(ContractKind::OffchainResolver)?;

    let mut procedure = Procedure::new(backend, settings, out);
    procedure.announce(&registry)?;
    procedure.announce(&resolver)?;

    let owner = domain_owner.address();
    let current_owner = if skip_satisfied {
        Some(backend.owner(registry.address, domain_node.hash()).await.map_err(read_err)?)
    } else {
        None
    };
    if current_owner == Some(owner) {
        procedure.skip(Step::AssignSldOwner, &format!("\"{name}\" is already owned by {owner}"))?;
    } else {
        let call =
            RegistryCall::SetSubnodeOwner { node: tld_node.hash(), label: labelhash(sld), owner };
        procedure
            .execute(
                Step::AssignSldOwner,
                &domain_owner,
                &registry,
                call,
                &format!("Set SLD \"{sld}\" owner"),
            )
            .await?;
    }
    let owner_tx = procedure.report().get(Step::AssignSldOwner).map(|report| report.tx_hash);

    let current_resolver = if skip_satisfied {
        Some(backend.resolver(registry.address, domain_node.hash()).await.map_err(read_err)?)
    } else {
        None
    };
    if current_resolver == Some(resolver.address) {
        procedure.skip(
            Step::AssignResolver,
            &format!("\"{name}\" already resolves through {}", resolver.address),
        )?;
    } else {
        let call =
            RegistryCall::SetResolver { node: domain_node.hash(), resolver: resolver.address };
        let result = procedure
            .execute(
                Step::AssignResolver,
                &domain_owner,
                &registry,
                call,
                &format!("Set domain \"{name}\" resolver contract"),
            )
            .await;
        match (result, owner_tx) {
            (Ok(_), _) => {}
            (Err(err), Some(owner_tx)) => {
                error!(
                    domain = %name,
                    %owner_tx,
                    error = %display_chain(&err),
                    "resolver assignment failed after the owner was assigned"
                );
                return Err(err).wrap_err_with(|| {
                    format!(
                        "\"{name}\" is partially configured: its owner was assigned in {owner_tx} \
                         but its resolver is not set, re-run with --skip-satisfied"
                    )
                });
            }
            (Err(err), None) => return Err(err.into()),
        }
    }

    Ok(procedure.finish())
}

fn read_err(err: eyre::Report) -> NamingError {
    NamingError::Read(err.into())
}
