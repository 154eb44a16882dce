//! # ens-admin-common
//!
//! Helpers shared by the `ens-admin` procedures: node hashing, explorer links, configuration
//! loading and error reporting.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod ens;
pub mod errors;
pub mod explorer;
pub mod handler;
pub mod utils;

pub use config::Config;
pub use ens::{NameNode, labelhash, namehash};
pub use explorer::Explorer;
