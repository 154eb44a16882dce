//! Block explorer links for operator-facing output.

use alloy_primitives::{Address, TxHash};

/// The default explorer host.
pub const DEFAULT_EXPLORER_HOST: &str = "etherscan.io";

/// The network whose explorer lives on the bare host.
pub const DEFAULT_PRIMARY_NETWORK: &str = "mainnet";

/// Formats browsable explorer URLs for a network.
///
/// Every network except the primary one is served from a `<network>.` subdomain of the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explorer {
    host: String,
    network: String,
    primary_network: String,
}

impl Explorer {
    /// Creates a new explorer for `network` on `host`.
    pub fn new(
        host: impl Into<String>,
        network: impl Into<String>,
        primary_network: impl Into<String>,
    ) -> Self {
        Self { host: host.into(), network: network.into(), primary_network: primary_network.into() }
    }

    /// Returns `true` if the configured network is the primary one.
    pub fn is_primary(&self) -> bool {
        self.network == self.primary_network
    }

    /// Returns the explorer root, e.g. `https://sepolia.etherscan.io`.
    pub fn base_url(&self) -> String {
        if self.is_primary() {
            format!("https://{}", self.host)
        } else {
            format!("https://{}.{}", self.network, self.host)
        }
    }

    /// Returns the page of a contract or account.
    pub fn address_url(&self, address: Address) -> String {
        format!("{}/address/{address}", self.base_url())
    }

    /// Returns the page of a transaction.
    pub fn tx_url(&self, tx_hash: TxHash) -> String {
        format!("{}/tx/{tx_hash}", self.base_url())
    }
}
