use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::LifecycleError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(error) => failure_response(&LifecycleError::Internal(format!(
            "failed to serialize response: {error}"
        ))),
    }
}

pub fn failure_response(error: &LifecycleError) -> ApiGatewayResponse {
    error_response(
        error.status_code(),
        json!({
            "error": error.kind(),
            "message": error.to_string(),
        }),
    )
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        body: payload.to_string(),
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
