//! Bounded wait for a freshly launched instance to reach `running`.

use std::time::Duration;

use instance_lifecycle_core::state::InstanceState;
use tracing::debug;

use crate::adapters::compute::{ComputeProvider, InstanceDescription};
use crate::error::LifecycleError;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

const MIN_DELAY: Duration = Duration::from_millis(1);

/// Exponential backoff between polls, capped per step and in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    max_wait: Duration,
}

impl WaitPolicy {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_wait: Duration) -> Self {
        let initial_delay = initial_delay.max(MIN_DELAY);
        Self {
            initial_delay,
            max_delay: max_delay.max(initial_delay),
            max_wait,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_WAIT)
    }
}

/// Polls `describe_instance` until the instance runs.
///
/// Fails fast when the instance heads to termination and gives up once the
/// accumulated sleep reaches `max_wait`. A not-found answer is treated as
/// "not visible yet" because read APIs lag behind a successful launch.
pub fn wait_until_running(
    compute: &dyn ComputeProvider,
    instance_id: &str,
    policy: &WaitPolicy,
    sleep: &dyn Fn(Duration),
) -> Result<InstanceDescription, LifecycleError> {
    let mut waited = Duration::ZERO;
    let mut delay = policy.initial_delay;
    let mut last_state: Option<InstanceState> = None;

    loop {
        match compute.describe_instance(instance_id) {
            Ok(description) => {
                if description.state == InstanceState::Running {
                    return Ok(description);
                }
                if description.state.is_terminal() {
                    return Err(LifecycleError::Internal(format!(
                        "Instance {instance_id} entered state {} while waiting for it to run",
                        description.state
                    )));
                }
                last_state = Some(description.state);
            }
            Err(error) if error.is_instance_not_found() => {}
            Err(error) => return Err(error),
        }

        if waited >= policy.max_wait {
            let last_state = last_state
                .as_ref()
                .map(InstanceState::as_str)
                .unwrap_or("unknown");
            return Err(LifecycleError::Internal(format!(
                "Instance {instance_id} did not reach running within {}s (last state: {last_state})",
                policy.max_wait.as_secs()
            )));
        }

        let pause = delay.min(policy.max_wait - waited);
        debug!(
            instance_id,
            state = last_state.as_ref().map(InstanceState::as_str),
            pause_ms = pause.as_millis() as u64,
            "instance not running yet"
        );
        sleep(pause);
        waited += pause;
        delay = policy.next_delay(delay);
    }
}
