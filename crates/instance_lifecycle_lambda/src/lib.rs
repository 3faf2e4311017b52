//! AWS-oriented adapters and handlers for instance lifecycle management.
//!
//! This crate owns runtime integration details (Lambda handlers, capability
//! traits for compute and credential storage, environment configuration and
//! the bounded wait used while provisioning). Pure request and state rules
//! live in `instance_lifecycle_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;
pub mod wait;
