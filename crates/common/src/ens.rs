//! Node hash computation for the registry's naming tree.
//!
//! [Namehash reference](https://docs.ens.domains/contract-api-reference/name-processing#hashing-names)

use alloy_primitives::{B256, keccak256};
use std::fmt;

/// Errors returned when a label cannot be used to address a node.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("label must not be empty")]
    Empty,
    #[error("label `{0}` must be a single label, without `.` separators")]
    Dotted(String),
    #[error("label `{0}` is not normalized, use `{1}`")]
    NotNormalized(String, String),
}

/// Checks that `label` addresses exactly one level of the tree and is already normalized.
pub fn validate_label(label: &str) -> Result<(), LabelError> {
    if label.is_empty() {
        return Err(LabelError::Empty);
    }
    if label.contains('.') {
        return Err(LabelError::Dotted(label.to_string()));
    }
    let lower = label.to_lowercase();
    if lower != label {
        return Err(LabelError::NotNormalized(label.to_string(), lower));
    }
    Ok(())
}

/// Returns the namehash of a full dotted name.
///
/// ```
/// use ens_admin_common::namehash;
///
/// assert_eq!(
///     namehash("eth").to_string(),
///     "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
/// );
/// ```
pub fn namehash(name: &str) -> B256 {
    alloy_ens::namehash(name)
}

/// Returns the hash of a single label, i.e. the node's position under its parent.
pub fn labelhash(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// A node of the naming tree, identified by its namehash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NameNode(B256);

impl NameNode {
    /// The root of the tree, the all-zero node.
    pub const ROOT: Self = Self(B256::ZERO);

    /// Computes the node of a full dotted name, validating every label.
    pub fn from_name(name: &str) -> Result<Self, LabelError> {
        for label in name.split('.') {
            validate_label(label)?;
        }
        Ok(Self(namehash(name)))
    }

    /// Returns the node of `label` under `self`.
    ///
    /// This is the node the registry creates when assigning a subnode owner.
    pub fn child(&self, label: &str) -> Result<Self, LabelError> {
        validate_label(label)?;
        Ok(Self(keccak256([self.0, labelhash(label)].concat())))
    }

    /// Returns the node hash.
    pub fn hash(&self) -> B256 {
        self.0
    }
}

impl From<NameNode> for B256 {
    fn from(node: NameNode) -> Self {
        node.0
    }
}

impl fmt::Display for NameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
