use std::future::Future;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::InstanceType;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use instance_lifecycle_core::state::InstanceState;
use instance_lifecycle_lambda::adapters::compute::{
    ComputeProvider, InstanceDescription, RunInstanceSpec,
};
use instance_lifecycle_lambda::adapters::credential_store::CredentialStore;
use instance_lifecycle_lambda::config::LifecycleConfig;
use instance_lifecycle_lambda::error::LifecycleError;
use instance_lifecycle_lambda::handlers::lifecycle::{
    handle_lifecycle_event, LifecycleDeps, LifecycleHandlerConfig,
};
use instance_lifecycle_lambda::handlers::response::ApiGatewayResponse;
use instance_lifecycle_lambda::telemetry::init_logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

struct Ec2ComputeProvider {
    client: aws_sdk_ec2::Client,
}

impl ComputeProvider for Ec2ComputeProvider {
    fn create_key_pair(&self, key_name: &str) -> Result<String, LifecycleError> {
        let output = block_on(self.client.create_key_pair().key_name(key_name).send())
            .map_err(sdk_error)?;
        output
            .key_material()
            .map(str::to_string)
            .ok_or_else(|| {
                LifecycleError::Internal(format!("key pair {key_name} returned no key material"))
            })
    }

    fn run_instance(&self, spec: &RunInstanceSpec) -> Result<String, LifecycleError> {
        let output = block_on(
            self.client
                .run_instances()
                .image_id(&spec.image_id)
                .instance_type(InstanceType::from(spec.instance_type.as_str()))
                .key_name(&spec.key_name)
                .security_groups(&spec.security_group)
                .min_count(1)
                .max_count(1)
                .send(),
        )
        .map_err(sdk_error)?;

        output
            .instances()
            .first()
            .and_then(|instance| instance.instance_id())
            .map(str::to_string)
            .ok_or_else(|| LifecycleError::Internal("run instances returned no instance".into()))
    }

    fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription, LifecycleError> {
        let output = block_on(
            self.client
                .describe_instances()
                .instance_ids(instance_id)
                .send(),
        )
        .map_err(sdk_error)?;

        let instance = output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .find(|instance| instance.instance_id() == Some(instance_id))
            .ok_or_else(|| {
                LifecycleError::Internal(format!("Instance {instance_id} was not described"))
            })?;

        let state = instance
            .state()
            .and_then(|state| state.name())
            .map(|name| InstanceState::parse(name.as_str()))
            .ok_or_else(|| {
                LifecycleError::Internal(format!("Instance {instance_id} reported no state"))
            })?;

        Ok(InstanceDescription {
            instance_id: instance_id.to_string(),
            state,
            public_ip: instance.public_ip_address().map(str::to_string),
        })
    }

    fn instance_state(&self, instance_id: &str) -> Result<InstanceState, LifecycleError> {
        let output = block_on(
            self.client
                .describe_instance_status()
                .instance_ids(instance_id)
                .include_all_instances(true)
                .send(),
        )
        .map_err(sdk_error)?;

        output
            .instance_statuses()
            .first()
            .and_then(|status| status.instance_state())
            .and_then(|state| state.name())
            .map(|name| InstanceState::parse(name.as_str()))
            .ok_or_else(|| {
                LifecycleError::Internal(format!("No status reported for instance {instance_id}"))
            })
    }

    fn start_instance(&self, instance_id: &str) -> Result<(), LifecycleError> {
        block_on(
            self.client
                .start_instances()
                .instance_ids(instance_id)
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_error)
    }

    fn stop_instance(&self, instance_id: &str) -> Result<(), LifecycleError> {
        block_on(self.client.stop_instances().instance_ids(instance_id).send())
            .map(|_| ())
            .map_err(sdk_error)
    }

    fn terminate_instance(&self, instance_id: &str) -> Result<(), LifecycleError> {
        block_on(
            self.client
                .terminate_instances()
                .instance_ids(instance_id)
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_error)
    }
}

struct S3CredentialStore {
    bucket: String,
    client: aws_sdk_s3::Client,
}

impl CredentialStore for S3CredentialStore {
    fn upload_object(&self, key: &str, body: &[u8]) -> Result<(), LifecycleError> {
        block_on(
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(body.to_vec()))
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_error)
    }

    fn presign_download(&self, key: &str, expires_in: Duration) -> Result<String, LifecycleError> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|error| {
            LifecycleError::Internal(format!("invalid presign expiry: {error}"))
        })?;
        let request = block_on(
            self.client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(presigning),
        )
        .map_err(sdk_error)?;
        Ok(request.uri().to_string())
    }
}

/// Runs an SDK future to completion from the synchronous adapter traits.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Service-reported failures keep the provider's own message; transport and
/// construction failures become internal errors.
fn sdk_error<E, R>(error: SdkError<E, R>) -> LifecycleError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = error.as_service_error() {
        if let Some(message) = service_error.message() {
            return LifecycleError::provider(service_error.code(), message);
        }
    }
    LifecycleError::Internal(DisplayErrorContext(&error).to_string())
}

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &LifecycleHandlerConfig,
    deps: &LifecycleDeps<'_>,
) -> Result<ApiGatewayResponse, Error> {
    let requested_at = Utc::now().timestamp();
    info!(request_id = %event.context.request_id, "lifecycle invocation");
    Ok(handle_lifecycle_event(
        event.payload,
        config,
        requested_at,
        deps,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = LifecycleConfig::from_env().map_err(|error| Error::from(error.to_string()))?;
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let compute = Ec2ComputeProvider {
        client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let credentials = S3CredentialStore {
        bucket: config.bucket.clone(),
        client: aws_sdk_s3::Client::new(&aws_config),
    };
    let handler_config = LifecycleHandlerConfig::from(&config);
    let deps = LifecycleDeps {
        compute: &compute,
        credentials: &credentials,
        sleep: &std::thread::sleep,
    };

    let handler_config = &handler_config;
    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, handler_config, deps).await
    }))
    .await
}
