use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::{event::StateTransition, SwipeEvent, SwipePhase};

const TRANSITION_HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct StateMachine {
    state: SwipePhase,
    transition_history: VecDeque<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: SwipePhase::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SwipePhase {
        self.state
    }

    pub fn can_transition(&self, event: SwipeEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SwipeEvent) -> Option<SwipePhase> {
        use SwipeEvent::*;
        match (self.state, event) {
            (SwipePhase::Idle, Grant) => Some(SwipePhase::Dragging),
            (SwipePhase::Cancelling, Grant) => Some(SwipePhase::Dragging),
            (SwipePhase::Dragging, ReleaseCommit) => Some(SwipePhase::Committing),
            (SwipePhase::Dragging, ReleaseCancel) => Some(SwipePhase::Cancelling),
            (SwipePhase::Committing, SettleComplete) => Some(SwipePhase::Idle),
            (SwipePhase::Cancelling, SettleComplete) => Some(SwipePhase::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SwipeEvent) -> StateResult<SwipePhase> {
        tracing::trace!(from = ?self.state, event = ?event, "request swipe transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::debug!(from = ?from, event = ?event, "invalid swipe transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(record);

        Ok(self.state)
    }
}

#[cfg(test)]
impl StateMachine {
    fn history(&self) -> Vec<StateTransition> {
        self.transition_history.iter().copied().collect()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SwipePhase::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(SwipeEvent::Grant));
        assert!(!machine.can_transition(SwipeEvent::ReleaseCommit));
        assert!(!machine.can_transition(SwipeEvent::SettleComplete));

        let _ = machine
            .transition(SwipeEvent::Grant)
            .expect("idle -> dragging should transition");

        assert!(machine.can_transition(SwipeEvent::ReleaseCommit));
        assert!(machine.can_transition(SwipeEvent::ReleaseCancel));
        assert!(!machine.can_transition(SwipeEvent::Grant));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(SwipeEvent::Grant).expect("grant");
        let _ = machine
            .transition(SwipeEvent::ReleaseCancel)
            .expect("release cancel");
        let _ = machine.transition(SwipeEvent::Grant).expect("regrab");
        let _ = machine
            .transition(SwipeEvent::ReleaseCommit)
            .expect("release commit");
        let _ = machine
            .transition(SwipeEvent::SettleComplete)
            .expect("settle");

        assert_eq!(machine.state(), SwipePhase::Idle);
        let history = machine.history();
        assert_eq!(history.len(), 5);
        assert_eq!(
            history[2],
            StateTransition::new(
                Some(SwipePhase::Cancelling),
                SwipeEvent::Grant,
                SwipePhase::Dragging
            )
        );
        assert_eq!(
            history[4],
            StateTransition::new(
                Some(SwipePhase::Committing),
                SwipeEvent::SettleComplete,
                SwipePhase::Idle
            )
        );
    }

    #[test]
    fn grant_during_commit_is_rejected_without_mutating_history() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(SwipeEvent::Grant).expect("grant");
        let _ = machine
            .transition(SwipeEvent::ReleaseCommit)
            .expect("release commit");

        let err = machine
            .transition(SwipeEvent::Grant)
            .expect_err("committing -> grant should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: SwipePhase::Committing,
                event: SwipeEvent::Grant
            }
        ));
        assert_eq!(machine.state(), SwipePhase::Committing);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn history_is_bounded() {
        let mut machine = StateMachine::new();
        for _ in 0..TRANSITION_HISTORY_LIMIT {
            let _ = machine.transition(SwipeEvent::Grant).expect("grant");
            let _ = machine
                .transition(SwipeEvent::ReleaseCancel)
                .expect("cancel");
        }
        assert_eq!(machine.history().len(), TRANSITION_HISTORY_LIMIT);
        assert_eq!(machine.state(), SwipePhase::Cancelling);
    }
}
