//! Assigning a top-level domain to the domain owner.

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
use ens_admin_common::{NameNode, ens::validate_label, labelhash};
use eyre::Result;
use std::io::Write;

/// CLI arguments for `ens-admin tld-owner`.
#[derive(Clone, Debug, Parser)]
pub struct TldOwnerArgs {
    /// Label of the top-level domain.
    #[arg(long, default_value = "eth", value_name = "LABEL")]
    pub tld: String,

    #[command(flatten)]
    pub opts: AdminOpts,
}

impl TldOwnerArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let backend = AlloyBackend::connect(config.rpc_url()?, config.confirmations)?;
        let settings = Settings::from_config(&config);
        let deployment = ConfigDeployment::new(&config);
        assign_tld_owner(&deployment, &backend, &settings, std::io::stdout(), &self.tld).await?;
        Ok(())
    }
}

/// Transfers `tld` under the registry root from the registry owner to the domain owner.
///
/// A single `setSubnodeOwner(0x0, labelhash(tld), domain_owner)` signed by the registry owner.
pub async fn assign_tld_owner<D, B, W>(
    deployment: &D,
    backend: &B,
    settings: &Settings,
    out: W,
    tld: &str,
) -> Result<ProcedureReport>
where
    D: Deployment + ?Sized,
    B: RegistryBackend + ?Sized,
    W: Write,
{
    validate_label(tld).map_err(NamingError::from)?;

    let domain_owner = deployment.authority(Role::DomainOwner)?;
    let registry_owner = deployment.authority(Role::RegistryOwner)?;
    let registry = deployment.contract(ContractKind::Registry)?;

    let mut procedure = Procedure::new(backend, settings, out);
    procedure.announce(&registry)?;

    let call = RegistryCall::SetSubnodeOwner {
        node: NameNode::ROOT.hash(),
        label: labelhash(tld),
        owner: domain_owner.address(),
    };
    procedure
        .execute(
            Step::AssignTldOwner,
            &registry_owner,
            &registry,
            call,
            &format!("Set TLD \"{tld}\" owner"),
        )
        .await?;

    Ok(procedure.finish())
}
