/// Lifecycle of the swipe card between two gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipePhase {
    #[default]
    Idle,
    Dragging,
    Committing,
    Cancelling,
}

impl SwipePhase {
    /// Whether a new drag may be granted in this phase.
    ///
    /// The exit animation of a commit is never interrupted, while the
    /// spring-back of a cancel may be re-grabbed mid-flight.
    pub const fn accepts_gesture(self) -> bool {
        matches!(self, Self::Idle | Self::Cancelling)
    }
}
