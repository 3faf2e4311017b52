use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "ec2-user";
pub const DEFAULT_SECURITY_GROUP: &str = "default";
pub const PRESIGNED_URL_TTL_SECONDS: u64 = 3_600;

/// Value used when the request carries no `action` parameter at all.
pub const MISSING_ACTION: &str = "None";
pub const UNREADABLE_ACTION_MESSAGE: &str = "Missing action parameter";

/// The `action` query parameter as it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionParameter<'a> {
    /// The parameter map has no `action` key.
    Absent,
    /// The parameter map or the `action` value is null or of the wrong type.
    Unreadable,
    Given(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Start,
    Stop,
    Terminate,
}

impl Action {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "create" => Some(Self::Create),
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "terminate" => Some(Self::Terminate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Terminate => "terminate",
        }
    }

    pub fn requires_instance_id(self) -> bool {
        !matches!(self, Self::Create)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleRequest {
    Create,
    Start { instance_id: String },
    Stop { instance_id: String },
    Terminate { instance_id: String },
}

impl LifecycleRequest {
    pub fn action(&self) -> Action {
        match self {
            Self::Create => Action::Create,
            Self::Start { .. } => Action::Start,
            Self::Stop { .. } => Action::Stop,
            Self::Terminate { .. } => Action::Terminate,
        }
    }

    pub fn instance_id(&self) -> Option<&str> {
        match self {
            Self::Create => None,
            Self::Start { instance_id }
            | Self::Stop { instance_id }
            | Self::Terminate { instance_id } => Some(instance_id),
        }
    }
}

/// Connection payload returned by a successful create. Field names are part
/// of the public API contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub instance_id: String,
    pub public_ip: String,
    pub username: String,
    pub ssh_command: String,
    pub pem_filename: String,
    pub pem_download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Builds a typed request from the raw `action` and `instance_id` query
/// parameters. Blank instance ids count as missing; others are kept as sent.
pub fn parse_request(
    action: ActionParameter<'_>,
    instance_id: Option<&str>,
) -> Result<LifecycleRequest, ValidationError> {
    let raw_action = match action {
        ActionParameter::Absent => MISSING_ACTION.to_lowercase(),
        ActionParameter::Unreadable => {
            return Err(ValidationError::new(UNREADABLE_ACTION_MESSAGE));
        }
        ActionParameter::Given(value) => value.to_lowercase(),
    };
    let Some(action) = Action::parse(&raw_action) else {
        return Err(ValidationError::new(format!(
            "Invalid action: {raw_action}"
        )));
    };

    if !action.requires_instance_id() {
        return Ok(LifecycleRequest::Create);
    }

    let instance_id = match instance_id {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => {
            return Err(ValidationError::new(format!(
                "Missing instance_id for {action} action"
            )));
        }
    };

    Ok(match action {
        Action::Start => LifecycleRequest::Start { instance_id },
        Action::Stop => LifecycleRequest::Stop { instance_id },
        Action::Terminate => LifecycleRequest::Terminate { instance_id },
        Action::Create => LifecycleRequest::Create,
    })
}

pub fn started_message(instance_id: &str) -> String {
    format!("Instance {instance_id} started successfully")
}

pub fn stopped_message(instance_id: &str) -> String {
    format!("Instance {instance_id} stopped successfully")
}

pub fn terminated_message(instance_id: &str) -> String {
    format!("Instance {instance_id} terminated successfully")
}
