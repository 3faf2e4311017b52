use instance_lifecycle_core::state::InstanceState;

use crate::error::LifecycleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInstanceSpec {
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub security_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescription {
    pub instance_id: String,
    pub state: InstanceState,
    pub public_ip: Option<String>,
}

/// Instance and key-pair operations of the compute provider. Every call is a
/// single attempt.
pub trait ComputeProvider: Send + Sync {
    /// Creates a key pair and returns its private key material.
    fn create_key_pair(&self, key_name: &str) -> Result<String, LifecycleError>;

    /// Launches exactly one instance and returns its id.
    fn run_instance(&self, spec: &RunInstanceSpec) -> Result<String, LifecycleError>;

    fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription, LifecycleError>;

    /// Current state as reported by the status API, including stopped instances.
    fn instance_state(&self, instance_id: &str) -> Result<InstanceState, LifecycleError>;

    fn start_instance(&self, instance_id: &str) -> Result<(), LifecycleError>;

    fn stop_instance(&self, instance_id: &str) -> Result<(), LifecycleError>;

    fn terminate_instance(&self, instance_id: &str) -> Result<(), LifecycleError>;
}
