//! The network seam of the procedures.
//!
//! Procedures only talk to the chain through [`RegistryBackend`], so tests can substitute a
//! deterministic backend for a live node.

use crate::{
    abi::EnsRegistry,
    error::Step,
    fees::{FeeEstimate, FeeOverrides},
    wallet::Authority,
};
use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, B256, Bytes, TxHash};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use url::Url;

/// A state-changing registry call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryCall {
    /// `setSubnodeOwner(node, label, owner)`
    SetSubnodeOwner { node: B256, label: B256, owner: Address },
    /// `setResolver(node, resolver)`
    SetResolver { node: B256, resolver: Address },
}

impl RegistryCall {
    /// ABI-encodes the call.
    pub fn calldata(&self) -> Bytes {
        match *self {
            Self::SetSubnodeOwner { node, label, owner } => {
                EnsRegistry::setSubnodeOwnerCall { node, label, owner }.abi_encode().into()
            }
            Self::SetResolver { node, resolver } => {
                EnsRegistry::setResolverCall { node, resolver }.abi_encode().into()
            }
        }
    }
}

/// A call ready to be signed and sent.
#[derive(Clone, Debug)]
pub struct Submission {
    pub step: Step,
    /// Signs the transaction, and is its sender.
    pub authority: Authority,
    /// The registry address.
    pub to: Address,
    pub call: RegistryCall,
    pub overrides: FeeOverrides,
}

impl Submission {
    /// Builds the transaction request, with the fee overrides applied.
    pub fn into_request(self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.authority.address())
            .with_to(self.to)
            .with_input(self.call.calldata())
            .with_gas_limit(self.overrides.gas_limit)
            .with_max_fee_per_gas(self.overrides.max_fee_per_gas)
            .with_max_priority_fee_per_gas(self.overrides.max_priority_fee_per_gas)
    }
}

/// Inclusion of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` if the transaction was included but reverted.
    pub success: bool,
}

/// Everything the procedures need from the network.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Returns the current fee estimate.
    async fn fee_estimate(&self) -> Result<FeeEstimate>;

    /// Returns the owner of `node` in `registry`.
    async fn owner(&self, registry: Address, node: B256) -> Result<Address>;

    /// Returns the resolver of `node` in `registry`.
    async fn resolver(&self, registry: Address, node: B256) -> Result<Address>;

    /// Signs and sends the submission, returning its hash once the network accepted it.
    async fn submit(&self, submission: Submission) -> Result<TxHash>;

    /// Waits until `tx_hash` is included.
    ///
    /// This may wait indefinitely, callers bound it.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation>;
}

/// [`RegistryBackend`] over a JSON-RPC node.
#[derive(Clone)]
pub struct AlloyBackend {
    provider: DynProvider,
    confirmations: u64,
}

impl AlloyBackend {
    /// Creates a backend for the node at `rpc_url`.
    pub fn connect(rpc_url: &str, confirmations: u64) -> Result<Self> {
        let url: Url = rpc_url.parse().wrap_err_with(|| format!("invalid rpc url `{rpc_url}`"))?;
        Ok(Self::new(ProviderBuilder::new().connect_http(url).erased(), confirmations))
    }

    pub fn new(provider: DynProvider, confirmations: u64) -> Self {
        Self { provider, confirmations }
    }
}

#[async_trait]
impl RegistryBackend for AlloyBackend {
    async fn fee_estimate(&self) -> Result<FeeEstimate> {
        let estimate = self.provider.estimate_eip1559_fees().await?;
        Ok(FeeEstimate {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }

    async fn owner(&self, registry: Address, node: B256) -> Result<Address> {
        Ok(EnsRegistry::new(registry, &self.provider).owner(node).call().await?)
    }

    async fn resolver(&self, registry: Address, node: B256) -> Result<Address> {
        Ok(EnsRegistry::new(registry, &self.provider).resolver(node).call().await?)
    }

    async fn submit(&self, submission: Submission) -> Result<TxHash> {
        let wallet = EthereumWallet::from(submission.authority.signer().clone());
        let provider =
            ProviderBuilder::new().wallet(wallet).connect_provider(self.provider.clone());
        let pending = provider.send_transaction(submission.into_request()).await?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;
        Ok(Confirmation {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            success: receipt.status(),
        })
    }
}
