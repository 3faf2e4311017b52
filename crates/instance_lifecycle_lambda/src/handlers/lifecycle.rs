use std::time::Duration;

use instance_lifecycle_core::contract::{
    parse_request, started_message, stopped_message, terminated_message, ActionParameter,
    ConnectionDetails, LifecycleRequest, MessageBody, DEFAULT_SECURITY_GROUP, DEFAULT_USERNAME,
    PRESIGNED_URL_TTL_SECONDS,
};
use instance_lifecycle_core::key_names::{key_pair_name, pem_filename, ssh_command};
use instance_lifecycle_core::state::InstanceState;
use instance_lifecycle_core::transitions::{check_start, check_terminate};
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::compute::{ComputeProvider, RunInstanceSpec};
use crate::adapters::credential_store::CredentialStore;
use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::handlers::response::{failure_response, success_response, ApiGatewayResponse};
use crate::wait::{wait_until_running, WaitPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleHandlerConfig {
    pub image_id: String,
    pub instance_type: String,
    pub wait_policy: WaitPolicy,
}

impl From<&LifecycleConfig> for LifecycleHandlerConfig {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            image_id: config.image_id.clone(),
            instance_type: config.instance_type.clone(),
            wait_policy: config.wait_policy,
        }
    }
}

/// Capabilities a single invocation works against.
pub struct LifecycleDeps<'a> {
    pub compute: &'a dyn ComputeProvider,
    pub credentials: &'a dyn CredentialStore,
    pub sleep: &'a (dyn Fn(Duration) + Sync),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Created(ConnectionDetails),
    Completed(String),
}

/// Entry point for API Gateway proxy events.
///
/// `requested_at_unix` seeds the key pair name for `create`. Every failure is
/// rendered as a 400 response; nothing propagates to the runtime.
pub fn handle_lifecycle_event(
    event: Value,
    config: &LifecycleHandlerConfig,
    requested_at_unix: i64,
    deps: &LifecycleDeps<'_>,
) -> ApiGatewayResponse {
    let (action, instance_id) = query_parameters(&event);

    let request = match parse_request(action, instance_id) {
        Ok(value) => value,
        Err(error) => {
            warn!(error = %error, "rejected lifecycle request");
            return failure_response(&error.into());
        }
    };

    match execute_request(&request, config, requested_at_unix, deps) {
        Ok(LifecycleOutcome::Created(details)) => success_response(200, details),
        Ok(LifecycleOutcome::Completed(message)) => {
            success_response(200, MessageBody::new(message))
        }
        Err(error) => {
            warn!(
                action = %request.action(),
                instance_id = request.instance_id(),
                kind = error.kind(),
                error = %error,
                "lifecycle request failed"
            );
            failure_response(&error)
        }
    }
}

pub fn execute_request(
    request: &LifecycleRequest,
    config: &LifecycleHandlerConfig,
    requested_at_unix: i64,
    deps: &LifecycleDeps<'_>,
) -> Result<LifecycleOutcome, LifecycleError> {
    match request {
        LifecycleRequest::Create => {
            create_instance(config, requested_at_unix, deps).map(LifecycleOutcome::Created)
        }
        LifecycleRequest::Start { instance_id } => {
            start_instance(deps.compute, instance_id).map(LifecycleOutcome::Completed)
        }
        LifecycleRequest::Stop { instance_id } => {
            stop_instance(deps.compute, instance_id).map(LifecycleOutcome::Completed)
        }
        LifecycleRequest::Terminate { instance_id } => {
            terminate_instance(deps.compute, instance_id).map(LifecycleOutcome::Completed)
        }
    }
}

/// Issues a key pair, stores its PEM for download, launches one instance and
/// waits until it runs.
pub fn create_instance(
    config: &LifecycleHandlerConfig,
    requested_at_unix: i64,
    deps: &LifecycleDeps<'_>,
) -> Result<ConnectionDetails, LifecycleError> {
    let key_name = key_pair_name(requested_at_unix);
    let pem_filename = pem_filename(&key_name);

    let private_key = deps.compute.create_key_pair(&key_name)?;
    deps.credentials.upload_object(&pem_filename, private_key.as_bytes())?;
    let pem_download_url = deps.credentials.presign_download(
        &pem_filename,
        Duration::from_secs(PRESIGNED_URL_TTL_SECONDS),
    )?;
    info!(key_name = %key_name, "key pair issued and stored");

    let instance_id = deps.compute.run_instance(&RunInstanceSpec {
        image_id: config.image_id.clone(),
        instance_type: config.instance_type.clone(),
        key_name: key_name.clone(),
        security_group: DEFAULT_SECURITY_GROUP.to_string(),
    })?;
    info!(instance_id = %instance_id, "instance launch requested");

    let description =
        wait_until_running(deps.compute, &instance_id, &config.wait_policy, deps.sleep)?;
    let public_ip = description.public_ip.ok_or_else(|| {
        LifecycleError::Internal(format!(
            "Instance {instance_id} is running without a public IP address"
        ))
    })?;
    info!(instance_id = %instance_id, public_ip = %public_ip, "instance running");

    Ok(ConnectionDetails {
        ssh_command: ssh_command(&key_name, &public_ip),
        instance_id,
        public_ip,
        username: DEFAULT_USERNAME.to_string(),
        pem_filename,
        pem_download_url,
    })
}

pub fn start_instance(
    compute: &dyn ComputeProvider,
    instance_id: &str,
) -> Result<String, LifecycleError> {
    let state = compute.instance_state(instance_id)?;
    check_start(&state)
        .map_err(|rejection| rejected(instance_id, &state, rejection.message(instance_id)))?;

    compute.start_instance(instance_id)?;
    info!(instance_id, previous_state = %state, "instance start issued");
    Ok(started_message(instance_id))
}

/// Stop has no state precondition; the provider decides whether it applies.
pub fn stop_instance(
    compute: &dyn ComputeProvider,
    instance_id: &str,
) -> Result<String, LifecycleError> {
    compute.stop_instance(instance_id)?;
    info!(instance_id, "instance stop issued");
    Ok(stopped_message(instance_id))
}

pub fn terminate_instance(
    compute: &dyn ComputeProvider,
    instance_id: &str,
) -> Result<String, LifecycleError> {
    let state = compute.instance_state(instance_id)?;
    check_terminate(&state)
        .map_err(|rejection| rejected(instance_id, &state, rejection.message(instance_id)))?;

    compute.terminate_instance(instance_id)?;
    info!(instance_id, previous_state = %state, "instance termination issued");
    Ok(terminated_message(instance_id))
}

fn rejected(instance_id: &str, state: &InstanceState, message: String) -> LifecycleError {
    info!(instance_id, state = %state, "transition rejected");
    LifecycleError::Validation(message)
}

/// Reads `action` and `instance_id` from `queryStringParameters`. An event
/// without that key behaves like an empty map; a null or non-object map, or a
/// null or non-string `action`, leaves the action unreadable.
fn query_parameters(event: &Value) -> (ActionParameter<'_>, Option<&str>) {
    let params = match event.get("queryStringParameters") {
        None => return (ActionParameter::Absent, None),
        Some(value) => match value.as_object() {
            Some(map) => map,
            None => return (ActionParameter::Unreadable, None),
        },
    };

    let action = match params.get("action") {
        None => ActionParameter::Absent,
        Some(value) => value
            .as_str()
            .map_or(ActionParameter::Unreadable, ActionParameter::Given),
    };
    (action, params.get("instance_id").and_then(Value::as_str))
}
