//! Legality rules applied before issuing a provider state change.
//!
//! `start` and `terminate` consult the current state. `stop` has no
//! precondition and is sent to the provider as-is.

use crate::state::InstanceState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRejected {
    AlreadyRunning,
    StartNotAllowed(InstanceState),
    AlreadyTerminated,
}

impl TransitionRejected {
    pub fn message(&self, instance_id: &str) -> String {
        match self {
            Self::AlreadyRunning => format!("Instance {instance_id} is already running"),
            Self::StartNotAllowed(state) => format!(
                "Instance {instance_id} is in state: {state} and start operation is not allowed."
            ),
            Self::AlreadyTerminated => format!("Instance {instance_id} is already terminated"),
        }
    }
}

pub fn check_start(state: &InstanceState) -> Result<(), TransitionRejected> {
    match state {
        InstanceState::Stopped => Ok(()),
        InstanceState::Running => Err(TransitionRejected::AlreadyRunning),
        other => Err(TransitionRejected::StartNotAllowed(other.clone())),
    }
}

pub fn check_terminate(state: &InstanceState) -> Result<(), TransitionRejected> {
    if state.is_terminal() {
        return Err(TransitionRejected::AlreadyTerminated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_only_legal_from_stopped() {
        assert_eq!(check_start(&InstanceState::Stopped), Ok(()));
        assert_eq!(
            check_start(&InstanceState::Running),
            Err(TransitionRejected::AlreadyRunning)
        );
        assert_eq!(
            check_start(&InstanceState::Stopping),
            Err(TransitionRejected::StartNotAllowed(InstanceState::Stopping))
        );
    }

    #[test]
    fn terminate_rejects_shutdown_states() {
        assert_eq!(
            check_terminate(&InstanceState::Terminated),
            Err(TransitionRejected::AlreadyTerminated)
        );
        assert_eq!(
            check_terminate(&InstanceState::ShuttingDown),
            Err(TransitionRejected::AlreadyTerminated)
        );
        for state in [
            InstanceState::Pending,
            InstanceState::Running,
            InstanceState::Stopping,
            InstanceState::Stopped,
        ] {
            assert_eq!(check_terminate(&state), Ok(()));
        }
    }

    #[test]
    fn start_rejection_names_current_state() {
        let rejection = check_start(&InstanceState::Pending).expect_err("pending cannot start");
        assert_eq!(
            rejection.message("i-42"),
            "Instance i-42 is in state: pending and start operation is not allowed."
        );
    }
}
