use crate::{sld::SldOwnerArgs, tld::TldOwnerArgs};
use clap::{Parser, Subcommand};
use eyre::Result;

/// Configure ownership and offchain resolution of ENS-style domains.
#[derive(Debug, Parser)]
#[command(name = "ens-admin", version, next_display_order = None)]
pub struct EnsAdmin {
    #[command(subcommand)]
    pub cmd: EnsAdminSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum EnsAdminSubcommand {
    /// Assign a top-level domain to the domain owner.
    ///
    /// Signed by the registry owner, the account allowed to assign under the registry root.
    #[command(visible_alias = "tld")]
    TldOwner(TldOwnerArgs),

    /// Assign a second-level domain to the domain owner and point it at the offchain resolver.
    ///
    /// Signed by the domain owner, which must already own the top-level domain.
    #[command(visible_alias = "sld")]
    SldOwner(SldOwnerArgs),
}

impl EnsAdmin {
    pub async fn run(self) -> Result<()> {
        match self.cmd {
            EnsAdminSubcommand::TldOwner(cmd) => cmd.run().await,
            EnsAdminSubcommand::SldOwner(cmd) => cmd.run().await,
        }
    }
}
