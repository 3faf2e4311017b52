//! Cold-start configuration read from the Lambda environment.

use std::time::Duration;

use thiserror::Error;

use crate::wait::WaitPolicy;

pub const AMI_VAR: &str = "AMI";
pub const INSTANCE_TYPE_VAR: &str = "INSTANCE_TYPE";
pub const BUCKET_VAR: &str = "S3_BUCKET";
pub const REGION_VAR: &str = "REGION";
pub const WAIT_INITIAL_MS_VAR: &str = "INSTANCE_WAIT_INITIAL_MS";
pub const WAIT_MAX_DELAY_MS_VAR: &str = "INSTANCE_WAIT_MAX_DELAY_MS";
pub const WAIT_TIMEOUT_SECONDS_VAR: &str = "INSTANCE_WAIT_TIMEOUT_SECONDS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub image_id: String,
    pub instance_type: String,
    pub bucket: String,
    pub region: String,
    pub wait_policy: WaitPolicy,
}

impl LifecycleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        let image_id = required(AMI_VAR)?;
        let instance_type = required(INSTANCE_TYPE_VAR)?;
        let bucket = required(BUCKET_VAR)?;
        let region = required(REGION_VAR)?;

        let defaults = WaitPolicy::default();
        let initial_delay = optional_number(&lookup, WAIT_INITIAL_MS_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_delay());
        let max_delay = optional_number(&lookup, WAIT_MAX_DELAY_MS_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_delay());
        let max_wait = optional_number(&lookup, WAIT_TIMEOUT_SECONDS_VAR)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.max_wait());

        Ok(Self {
            image_id,
            instance_type,
            bucket,
            region,
            wait_policy: WaitPolicy::new(initial_delay, max_delay, max_wait),
        })
    }
}

fn optional_number(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw.clone(),
        })
}
