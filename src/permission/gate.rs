use crate::notice::Notice;

use super::{ConsentPrompt, PermissionBackend, PermissionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub state: PermissionState,
    pub notice: Option<Notice>,
}

/// Front door to a [`PermissionBackend`]: failures become
/// [`PermissionState::Error`] plus a notice, never a retry.
#[derive(Debug, Clone)]
pub struct PermissionGate<B> {
    backend: B,
}

impl<B: PermissionBackend> PermissionGate<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn check(&self) -> RequestOutcome {
        match self.backend.check() {
            Ok(state) => {
                tracing::info!(%state, "checked photo library permission");
                RequestOutcome {
                    state,
                    notice: None,
                }
            }
            Err(err) => {
                tracing::error!(?err, "error checking photo library permission");
                RequestOutcome {
                    state: PermissionState::Error,
                    notice: Some(Notice::permission_check_failed()),
                }
            }
        }
    }

    pub fn request(&self, prompt: &dyn ConsentPrompt) -> RequestOutcome {
        match self.backend.request(prompt) {
            Ok(state) => {
                tracing::info!(%state, "requested photo library permission");
                RequestOutcome {
                    state,
                    notice: request_notice(state),
                }
            }
            Err(err) => {
                tracing::error!(?err, "error requesting photo library permission");
                RequestOutcome {
                    state: PermissionState::Error,
                    notice: Some(Notice::permission_request_failed()),
                }
            }
        }
    }

    /// A request that never prompts: checks again and reports the result the
    /// way [`Self::request`] would. A `Denied` result carries no notice, the
    /// caller is expected to ask and then call [`Self::request`].
    pub fn recheck(&self) -> RequestOutcome {
        match self.backend.check() {
            Ok(PermissionState::Denied) => RequestOutcome {
                state: PermissionState::Denied,
                notice: None,
            },
            Ok(state) => {
                tracing::info!(%state, "rechecked photo library permission");
                RequestOutcome {
                    state,
                    notice: request_notice(state),
                }
            }
            Err(err) => {
                tracing::error!(?err, "error rechecking photo library permission");
                RequestOutcome {
                    state: PermissionState::Error,
                    notice: Some(Notice::permission_request_failed()),
                }
            }
        }
    }
}

fn request_notice(state: PermissionState) -> Option<Notice> {
    match state {
        PermissionState::Denied => Some(Notice::permission_denied()),
        PermissionState::Blocked => Some(Notice::permission_blocked()),
        PermissionState::Limited => Some(Notice::permission_limited()),
        PermissionState::Unavailable => Some(Notice::permission_unavailable()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;
    use crate::permission::{ConsentAnswer, PermissionError, PermissionResult};

    struct ScriptedBackend {
        check: fn() -> PermissionResult<PermissionState>,
        request: fn(ConsentAnswer) -> PermissionResult<PermissionState>,
        requests: Cell<u32>,
    }

    impl PermissionBackend for ScriptedBackend {
        fn check(&self) -> PermissionResult<PermissionState> {
            (self.check)()
        }

        fn request(&self, prompt: &dyn ConsentPrompt) -> PermissionResult<PermissionState> {
            self.requests.set(self.requests.get() + 1);
            (self.request)(prompt.ask())
        }
    }

    fn check_failure() -> PermissionResult<PermissionState> {
        Err(PermissionError::Inspect {
            path: PathBuf::from("/library"),
            source: std::io::Error::other("disk on fire"),
        })
    }

    #[test]
    fn check_failure_maps_to_error_state_with_notice() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: check_failure,
            request: |_| Ok(PermissionState::Granted),
            requests: Cell::new(0),
        });
        let outcome = gate.check();
        assert_eq!(outcome.state, PermissionState::Error);
        assert_eq!(outcome.notice, Some(Notice::permission_check_failed()));
    }

    #[test]
    fn request_failure_is_not_retried() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: || Ok(PermissionState::Denied),
            request: |_| check_failure(),
            requests: Cell::new(0),
        });
        let outcome = gate.request(&ConsentAnswer::Allow);
        assert_eq!(outcome.state, PermissionState::Error);
        assert_eq!(outcome.notice, Some(Notice::permission_request_failed()));
        assert_eq!(gate.backend().requests.get(), 1);
    }

    #[test]
    fn request_outcomes_carry_matching_notices() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: || Ok(PermissionState::Denied),
            request: |answer| match answer {
                ConsentAnswer::Allow => Ok(PermissionState::Granted),
                ConsentAnswer::Deny => Ok(PermissionState::Blocked),
            },
            requests: Cell::new(0),
        });

        let granted = gate.request(&ConsentAnswer::Allow);
        assert_eq!(granted.state, PermissionState::Granted);
        assert_eq!(granted.notice, None);

        let blocked = gate.request(&ConsentAnswer::Deny);
        assert_eq!(blocked.state, PermissionState::Blocked);
        assert_eq!(blocked.notice, Some(Notice::permission_blocked()));
    }

    #[test]
    fn recheck_reports_like_request_without_prompting() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: || Ok(PermissionState::Blocked),
            request: |_| Ok(PermissionState::Granted),
            requests: Cell::new(0),
        });
        let outcome = gate.recheck();
        assert_eq!(outcome.state, PermissionState::Blocked);
        assert_eq!(outcome.notice, Some(Notice::permission_blocked()));
        assert_eq!(gate.backend().requests.get(), 0);
    }

    #[test]
    fn recheck_leaves_undecided_library_to_the_caller() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: || Ok(PermissionState::Denied),
            request: |_| Ok(PermissionState::Blocked),
            requests: Cell::new(0),
        });
        assert_eq!(
            gate.recheck(),
            RequestOutcome {
                state: PermissionState::Denied,
                notice: None
            }
        );
        assert_eq!(gate.backend().requests.get(), 0);
    }

    #[test]
    fn recheck_failure_maps_to_request_failure() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: check_failure,
            request: |_| Ok(PermissionState::Granted),
            requests: Cell::new(0),
        });
        let outcome = gate.recheck();
        assert_eq!(outcome.state, PermissionState::Error);
        assert_eq!(outcome.notice, Some(Notice::permission_request_failed()));
        assert_eq!(gate.backend().requests.get(), 0);
    }

    #[test]
    fn successful_check_has_no_notice() {
        let gate = PermissionGate::new(ScriptedBackend {
            check: || Ok(PermissionState::Limited),
            request: |_| Ok(PermissionState::Limited),
            requests: Cell::new(0),
        });
        assert_eq!(
            gate.check(),
            RequestOutcome {
                state: PermissionState::Limited,
                notice: None
            }
        );
    }
}
