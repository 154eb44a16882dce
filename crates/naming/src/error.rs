use crate::{
    artifacts::{ArtifactError, ContractKind},
    wallet::{Role, SignerError},
};
use alloy_primitives::TxHash;
use ens_admin_common::{config::ConfigError, ens::LabelError};
use std::{fmt, path::PathBuf, time::Duration};

/// Boxed error returned by network backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A state-changing call issued by a procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Assign a top-level domain under the root node.
    AssignTldOwner,
    /// Assign a second-level domain under its top-level domain.
    AssignSldOwner,
    /// Point a domain at the offchain resolver.
    AssignResolver,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AssignTldOwner => "TLD owner assignment",
            Self::AssignSldOwner => "SLD owner assignment",
            Self::AssignResolver => "resolver assignment",
        })
    }
}

/// Every way a procedure can abort.
///
/// None of these are recovered from: the procedure stops at the first one and the operator
/// re-runs it after diagnosing the cause.
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid domain label: {0}")]
    InvalidLabel(#[from] LabelError),
    #[error("could not resolve the {role} authority")]
    MissingAuthority {
        role: Role,
        #[source]
        source: SignerError,
    },
    #[error("could not load the {kind} artifact {}", path.display())]
    Artifact {
        kind: ContractKind,
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error("failed to retrieve fee data")]
    FeeData(#[source] BoxError),
    #[error(
        "incomplete fee data: max fee per gas {max_fee_per_gas}, max priority fee per gas {max_priority_fee_per_gas}"
    )]
    IncompleteFeeData { max_fee_per_gas: u128, max_priority_fee_per_gas: u128 },

    #[error("failed to read registry state")]
    Read(#[source] BoxError),
    #[error("{step} was rejected")]
    Submission {
        step: Step,
        #[source]
        source: BoxError,
    },
    #[error("{step} ({tx_hash}) could not be confirmed")]
    Confirmation {
        step: Step,
        tx_hash: TxHash,
        #[source]
        source: BoxError,
    },
    #[error("{step} ({tx_hash}) was not confirmed within {}s", timeout.as_secs())]
    ConfirmationTimeout { step: Step, tx_hash: TxHash, timeout: Duration },
    #[error("{step} ({tx_hash}) reverted")]
    Reverted { step: Step, tx_hash: TxHash },

    #[error("failed to write the report")]
    Io(#[from] std::io::Error),
}

impl NamingError {
    /// Returns the step this error aborted, if it happened while submitting or confirming.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Submission { step, .. }
            | Self::Confirmation { step, .. }
            | Self::ConfirmationTimeout { step, .. }
            | Self::Reverted { step, .. } => Some(*step),
            _ => None,
        }
    }
}
