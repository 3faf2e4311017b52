use instance_lifecycle_core::authorizer::AuthorizerResponse;
use instance_lifecycle_lambda::handlers::authorizer::handle_authorizer_event;
use instance_lifecycle_lambda::telemetry::init_logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<AuthorizerResponse, Error> {
    handle_authorizer_event(event.payload).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    lambda_runtime::run(service_fn(handle_request)).await
}
