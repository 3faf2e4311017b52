//! Shared instance lifecycle domain primitives.
//!
//! This crate owns request parsing, lifecycle state legality rules, the
//! authorizer policy contract, and credential naming. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod authorizer;
pub mod contract;
pub mod key_names;
pub mod state;
pub mod transitions;
