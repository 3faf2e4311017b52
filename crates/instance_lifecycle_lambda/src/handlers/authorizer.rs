use instance_lifecycle_core::authorizer::{
    authorize, AuthorizerResponse, TokenAuthorizerEvent, Unauthorized,
};
use serde_json::Value;
use tracing::{info, warn};

/// Evaluates a TOKEN authorizer event.
///
/// Payloads that do not decode as authorizer events, including a non-string
/// `methodArn`, are treated like a missing token.
pub fn handle_authorizer_event(event: Value) -> Result<AuthorizerResponse, Unauthorized> {
    let event: TokenAuthorizerEvent = serde_json::from_value(event).map_err(|error| {
        warn!(error = %error, "malformed authorizer event");
        Unauthorized
    })?;

    match authorize(&event) {
        Ok(response) => {
            let effect = response
                .policy_document
                .statement
                .first()
                .map(|statement| statement.effect);
            info!(
                effect = ?effect,
                resource = event.method_arn.as_deref(),
                "authorizer decision"
            );
            Ok(response)
        }
        Err(error) => {
            warn!(
                has_token = event.authorization_token.is_some(),
                has_method_arn = event.method_arn.is_some(),
                "request unauthorized"
            );
            Err(error)
        }
    }
}
