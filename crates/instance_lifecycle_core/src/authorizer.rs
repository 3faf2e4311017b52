//! Token authorizer policy contract.
//!
//! The authorizer compares the inbound token with a single accepted value and
//! answers with an IAM policy scoped to the requested method ARN.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub const ACCEPTED_TOKEN: &str = "abc1234";
pub const PRINCIPAL_ID: &str = "user";
pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenAuthorizerEvent {
    /// `None` only when the key is absent. A null or non-string value still
    /// counts as supplied.
    #[serde(
        rename = "authorizationToken",
        default,
        deserialize_with = "supplied_token"
    )]
    pub authorization_token: Option<AuthorizationToken>,
    #[serde(rename = "methodArn", default)]
    pub method_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationToken {
    Text(String),
    /// Null or any non-string JSON value; never accepted.
    NotText,
}

impl AuthorizationToken {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn is_accepted(&self) -> bool {
        matches!(self, Self::Text(value) if value == ACCEPTED_TOKEN)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Text(String),
    Other(IgnoredAny),
}

fn supplied_token<'de, D>(deserializer: D) -> Result<Option<AuthorizationToken>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match RawToken::deserialize(deserializer)? {
        RawToken::Text(value) => AuthorizationToken::Text(value),
        RawToken::Other(_) => AuthorizationToken::NotText,
    }))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
}

/// Raised when a request cannot be evaluated at all. API Gateway maps the
/// literal `Unauthorized` failure to a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized;

impl std::fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Unauthorized")
    }
}

impl std::error::Error for Unauthorized {}

pub fn generate_policy(principal_id: &str, effect: Effect, resource: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal_id.to_string(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect,
                resource: resource.to_string(),
            }],
        },
    }
}

pub fn authorize(event: &TokenAuthorizerEvent) -> Result<AuthorizerResponse, Unauthorized> {
    let token = event.authorization_token.as_ref().ok_or(Unauthorized)?;
    let resource = event.method_arn.as_deref().ok_or(Unauthorized)?;

    let effect = if token.is_accepted() {
        Effect::Allow
    } else {
        Effect::Deny
    };
    Ok(generate_policy(PRINCIPAL_ID, effect, resource))
}
