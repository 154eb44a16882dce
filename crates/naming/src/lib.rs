//! # ens-admin
//!
//! Administrative procedures for an ENS-style registry:
//!
//! - [`tld::assign_tld_owner`] transfers a top-level domain to the domain owner.
//! - [`sld::assign_sld_owner_and_resolver`] assigns a second-level domain to the domain owner and
//!   points it at the offchain resolver.
//!
//! Every call is priced right before it is sent, and the next one is only sent once the
//! previous one is confirmed. Any failure aborts the procedure.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod abi;
pub mod args;
pub mod artifacts;
pub mod backend;
pub mod deployment;
pub mod error;
pub mod fees;
pub mod opts;
pub mod procedure;
pub mod sld;
pub mod tld;
pub mod wallet;

pub use backend::{AlloyBackend, Confirmation, RegistryBackend, RegistryCall, Submission};
pub use error::{NamingError, Step};
pub use procedure::{ProcedureReport, Settings, StepReport};
