//! A scripted in-memory registry.

use alloy_primitives::{Address, B256, TxHash, address, keccak256};
use async_trait::async_trait;
use ens_admin::{
    Confirmation, NamingError, RegistryBackend, RegistryCall, Settings, Step, Submission,
    artifacts::{ArtifactError, ContractHandle, ContractKind},
    deployment::Deployment,
    fees::{DEFAULT_GAS_LIMIT, FeeEstimate, FeeOverrides},
    wallet::{Authority, Role, private_key_signer},
};
use ens_admin_common::{
    Explorer,
    explorer::{DEFAULT_EXPLORER_HOST, DEFAULT_PRIMARY_NETWORK},
};
use std::{
    collections::{HashMap, HashSet},
    io,
    sync::Mutex,
    time::Duration,
};

pub const REGISTRY: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const RESOLVER: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

const REGISTRY_OWNER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const DOMAIN_OWNER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Everything the procedure asked of the backend, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    FeeQuery,
    ReadOwner(B256),
    ReadResolver(B256),
    Submit { step: Step, from: Address, to: Address, call: RegistryCall, overrides: FeeOverrides },
    Confirm(TxHash),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    fee_queries: u128,
    submissions: usize,
    hashes: Vec<TxHash>,
    unconfirmed: HashSet<TxHash>,
    owners: HashMap<B256, Address>,
    resolvers: HashMap<B256, Address>,
}

/// Scripted failures, by zero-based submission index.
#[derive(Clone, Debug, Default)]
pub struct Script {
    pub fee_error: bool,
    pub incomplete_fees: bool,
    pub reject: Option<usize>,
    pub hang: Option<usize>,
    pub revert: Option<usize>,
}

/// A [`RegistryBackend`] recording every interaction.
///
/// Each fee query returns a higher estimate than the previous one, so stale fees are visible.
/// Submitting while an earlier submission is unconfirmed fails.
#[derive(Default)]
pub struct MockBackend {
    script: Script,
    state: Mutex<State>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(script: Script) -> Self {
        Self { script, state: Default::default() }
    }

    pub fn with_owner(self, node: B256, owner: Address) -> Self {
        self.state.lock().unwrap().owners.insert(node, owner);
        self
    }

    pub fn with_resolver(self, node: B256, resolver: Address) -> Self {
        self.state.lock().unwrap().resolvers.insert(node, resolver);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    /// Hash of the `index`th accepted submission.
    pub fn tx_hash(&self, index: usize) -> TxHash {
        self.state.lock().unwrap().hashes[index]
    }

    pub fn submits(&self) -> Vec<Event> {
        self.events().into_iter().filter(|event| matches!(event, Event::Submit { .. })).collect()
    }

    pub fn confirms(&self) -> usize {
        self.events().iter().filter(|event| matches!(event, Event::Confirm(_))).count()
    }

    pub fn fee_for(query: u128) -> FeeEstimate {
        FeeEstimate {
            max_fee_per_gas: 10_000_000_000 + query,
            max_priority_fee_per_gas: 1_000_000_000 + query,
        }
    }

    pub fn overrides_for(query: u128) -> FeeOverrides {
        FeeOverrides::from_estimate(Self::fee_for(query), DEFAULT_GAS_LIMIT).unwrap()
    }
}

#[async_trait]
impl RegistryBackend for MockBackend {
    async fn fee_estimate(&self) -> eyre::Result<FeeEstimate> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::FeeQuery);
        if self.script.fee_error {
            eyre::bail!("fee history unavailable");
        }
        if self.script.incomplete_fees {
            return Ok(FeeEstimate { max_fee_per_gas: 0, max_priority_fee_per_gas: 0 });
        }
        state.fee_queries += 1;
        Ok(Self::fee_for(state.fee_queries))
    }

    async fn owner(&self, _registry: Address, node: B256) -> eyre::Result<Address> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::ReadOwner(node));
        Ok(state.owners.get(&node).copied().unwrap_or_default())
    }

    async fn resolver(&self, _registry: Address, node: B256) -> eyre::Result<Address> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::ReadResolver(node));
        Ok(state.resolvers.get(&node).copied().unwrap_or_default())
    }

    async fn submit(&self, submission: Submission) -> eyre::Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        if !state.unconfirmed.is_empty() {
            eyre::bail!("submitted while {:?} is unconfirmed", state.unconfirmed);
        }
        let index = state.submissions;
        state.submissions += 1;
        if self.script.reject == Some(index) {
            eyre::bail!("execution reverted: not authorised");
        }

        let Submission { step, authority, to, call, overrides } = submission;
        state.events.push(Event::Submit { step, from: authority.address(), to, call, overrides });
        let tx_hash = keccak256((index as u64).to_be_bytes());
        state.hashes.push(tx_hash);
        state.unconfirmed.insert(tx_hash);
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> eyre::Result<Confirmation> {
        let index = {
            let state = self.state.lock().unwrap();
            state.hashes.iter().position(|hash| *hash == tx_hash).unwrap()
        };
        if self.script.hang == Some(index) {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.lock().unwrap();
        state.unconfirmed.remove(&tx_hash);
        state.events.push(Event::Confirm(tx_hash));
        Ok(Confirmation {
            tx_hash,
            block_number: Some(100 + index as u64),
            success: self.script.revert != Some(index),
        })
    }
}

/// Fixed authorities and contracts.
pub struct MockDeployment {
    pub registry_owner: Authority,
    pub domain_owner: Authority,
    pub missing_resolver: bool,
}

impl MockDeployment {
    pub fn new() -> Self {
        Self {
            registry_owner: Authority::new(
                Role::RegistryOwner,
                private_key_signer(REGISTRY_OWNER_KEY).unwrap(),
            ),
            domain_owner: Authority::new(
                Role::DomainOwner,
                private_key_signer(DOMAIN_OWNER_KEY).unwrap(),
            ),
            missing_resolver: false,
        }
    }

    pub fn registry_owner(&self) -> Address {
        self.registry_owner.address()
    }

    pub fn domain_owner(&self) -> Address {
        self.domain_owner.address()
    }
}

impl Deployment for MockDeployment {
    fn authority(&self, role: Role) -> Result<Authority, NamingError> {
        Ok(match role {
            Role::RegistryOwner => self.registry_owner.clone(),
            Role::DomainOwner => self.domain_owner.clone(),
        })
    }

    fn contract(&self, kind: ContractKind) -> Result<ContractHandle, NamingError> {
        match kind {
            ContractKind::Registry => Ok(ContractHandle::new("ENSRegistry", kind, REGISTRY)),
            ContractKind::OffchainResolver if self.missing_resolver => Err(NamingError::Artifact {
                kind,
                path: "deployments/sepolia/OffchainResolver.json".into(),
                source: ArtifactError::Read(io::ErrorKind::NotFound.into()),
            }),
            ContractKind::OffchainResolver => {
                Ok(ContractHandle::new("OffchainResolver", kind, RESOLVER))
            }
        }
    }
}

pub fn settings() -> Settings {
    Settings {
        explorer: Explorer::new(DEFAULT_EXPLORER_HOST, "sepolia", DEFAULT_PRIMARY_NETWORK),
        gas_limit: DEFAULT_GAS_LIMIT,
        confirmation_timeout: Duration::from_secs(300),
    }
}

/// Finds the [`NamingError`] behind a procedure failure.
pub fn naming_error(err: &eyre::Report) -> &NamingError {
    err.downcast_ref::<NamingError>().unwrap_or_else(|| panic!("not a naming error: {err:?}"))
}
