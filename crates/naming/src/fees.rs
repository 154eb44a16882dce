//! Fee overrides attached to every submission.

use crate::{backend::RegistryBackend, error::NamingError};

/// Gas limit large enough for any registry call, so no valid call fails for lack of gas.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// The network's current EIP-1559 fee estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeEstimate {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Explicit fee parameters of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeOverrides {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl FeeOverrides {
    /// Queries the backend for the current fees.
    ///
    /// Called right before every submission; the result must not be reused for a later one.
    pub async fn resolve<B: RegistryBackend + ?Sized>(
        backend: &B,
        gas_limit: u64,
    ) -> Result<Self, NamingError> {
        let estimate =
            backend.fee_estimate().await.map_err(|err| NamingError::FeeData(err.into()))?;
        let overrides = Self::from_estimate(estimate, gas_limit)?;
        debug!(?overrides, "resolved fee overrides");
        Ok(overrides)
    }

    /// Builds the overrides from an estimate, rejecting estimates that cannot price a
    /// transaction.
    pub fn from_estimate(estimate: FeeEstimate, gas_limit: u64) -> Result<Self, NamingError> {
        let FeeEstimate { max_fee_per_gas, max_priority_fee_per_gas } = estimate;
        if max_fee_per_gas == 0 || max_priority_fee_per_gas > max_fee_per_gas {
            return Err(NamingError::IncompleteFeeData {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            });
        }
        Ok(Self { gas_limit, max_fee_per_gas, max_priority_fee_per_gas })
    }
}
