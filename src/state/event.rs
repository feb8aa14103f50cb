use super::model::SwipePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeEvent {
    Grant,
    ReleaseCommit,
    ReleaseCancel,
    SettleComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<SwipePhase>,
    pub event: SwipeEvent,
    pub to: SwipePhase,
}

impl StateTransition {
    pub const fn new(from: Option<SwipePhase>, event: SwipeEvent, to: SwipePhase) -> Self {
        Self { from, event, to }
    }
}
