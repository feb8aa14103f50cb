use std::time::Instant;

use crate::geometry::Vector2;
use crate::library::ViewIndex;
use crate::state::{StateMachine, StateResult, SwipeEvent, SwipePhase};

use super::animation::{SpringAnimation, TimingAnimation};
use super::visual::{
    decide, display_rotation_degrees, DerivedVisualState, SwipeDecision, SwipeDirection,
    MAX_OVERLAY_ALPHA,
};
use super::SwipeTuning;

/// The five animated channels of the swipe card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardChannels {
    pub position: Vector2,
    pub rotation: f64,
    pub opacity: f64,
    pub green_alpha: f64,
    pub red_alpha: f64,
}

impl CardChannels {
    pub const REST: Self = Self {
        position: Vector2::ZERO,
        rotation: 0.0,
        opacity: 1.0,
        green_alpha: 0.0,
        red_alpha: 0.0,
    };

    fn apply_visual(&mut self, visual: DerivedVisualState) {
        self.rotation = visual.rotation;
        self.opacity = visual.opacity;
        self.green_alpha = visual.green_alpha;
        self.red_alpha = visual.red_alpha;
    }
}

impl Default for CardChannels {
    fn default() -> Self {
        Self::REST
    }
}

/// What the renderer draws for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    pub translate: Vector2,
    pub rotation_degrees: f64,
    pub opacity: f64,
    pub green_alpha: f64,
    pub red_alpha: f64,
}

impl From<&CardChannels> for CardFrame {
    fn from(channels: &CardChannels) -> Self {
        Self {
            translate: channels.position,
            rotation_degrees: display_rotation_degrees(channels.rotation),
            opacity: channels.opacity.clamp(0.0, 1.0),
            green_alpha: channels.green_alpha.clamp(0.0, MAX_OVERLAY_ALPHA),
            red_alpha: channels.red_alpha.clamp(0.0, MAX_OVERLAY_ALPHA),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Committed {
        direction: SwipeDirection,
        index: usize,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleCompletion {
    Exited,
    Returned,
}

#[derive(Debug, Clone, Copy)]
struct ChannelSet<A> {
    x: A,
    y: A,
    rotation: A,
    opacity: A,
    green_alpha: A,
    red_alpha: A,
}

impl<A> ChannelSet<A> {
    fn build(from: &CardChannels, to: &CardChannels, make: impl Fn(f64, f64) -> A) -> Self {
        Self {
            x: make(from.position.x, to.position.x),
            y: make(from.position.y, to.position.y),
            rotation: make(from.rotation, to.rotation),
            opacity: make(from.opacity, to.opacity),
            green_alpha: make(from.green_alpha, to.green_alpha),
            red_alpha: make(from.red_alpha, to.red_alpha),
        }
    }

    fn all(&self) -> [&A; 6] {
        [
            &self.x,
            &self.y,
            &self.rotation,
            &self.opacity,
            &self.green_alpha,
            &self.red_alpha,
        ]
    }
}

#[derive(Debug, Clone, Copy)]
enum Settle {
    Exit(ChannelSet<TimingAnimation>),
    SpringBack(ChannelSet<SpringAnimation>),
}

/// Turns a drag into card feedback and a commit/cancel outcome, then plays
/// the matching settle animation.
///
/// Time is always passed in, the engine never reads a clock. The caller owns
/// the photo index and hands it to [`SwipeEngine::release`], which advances
/// it before the exit animation starts.
#[derive(Debug)]
pub struct SwipeEngine {
    machine: StateMachine,
    tuning: SwipeTuning,
    screen_width: f64,
    channels: CardChannels,
    baseline: Vector2,
    gesture: Vector2,
    settle: Option<Settle>,
}

impl SwipeEngine {
    pub fn new(tuning: SwipeTuning, screen_width: f64) -> Self {
        let mut engine = Self {
            machine: StateMachine::new(),
            tuning,
            screen_width: 1.0,
            channels: CardChannels::REST,
            baseline: Vector2::ZERO,
            gesture: Vector2::ZERO,
            settle: None,
        };
        engine.set_screen_width(screen_width);
        engine
    }

    pub fn set_screen_width(&mut self, screen_width: f64) {
        if screen_width.is_finite() && screen_width >= 1.0 {
            self.screen_width = screen_width;
        } else {
            tracing::debug!(screen_width, "ignoring unusable screen width");
        }
    }

    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    pub fn tuning(&self) -> &SwipeTuning {
        &self.tuning
    }

    pub fn phase(&self) -> SwipePhase {
        self.machine.state()
    }

    pub fn accepts_gesture(&self) -> bool {
        self.phase().accepts_gesture()
    }

    pub fn is_animating(&self) -> bool {
        self.settle.is_some()
    }

    pub fn channels(&self) -> &CardChannels {
        &self.channels
    }

    pub fn gesture_vector(&self) -> Vector2 {
        self.gesture
    }

    pub fn frame(&self) -> CardFrame {
        CardFrame::from(&self.channels)
    }

    /// Grants a new drag. Interrupts a spring-back from its live values;
    /// refused while a commit is still exiting.
    pub fn begin_drag(&mut self) -> StateResult<()> {
        self.machine.transition(SwipeEvent::Grant)?;
        if self.settle.take().is_some() {
            tracing::debug!("spring-back interrupted by new drag");
        }
        self.baseline = self.channels.position;
        self.gesture = Vector2::ZERO;
        Ok(())
    }

    /// Applies one movement sample. Returns `None` when no drag is active.
    pub fn drag_to(&mut self, dx: f64, dy: f64) -> Option<DerivedVisualState> {
        if self.phase() != SwipePhase::Dragging {
            return None;
        }
        self.gesture = Vector2::new(dx, dy);
        self.channels.position = self.baseline.offset_by(self.gesture);
        let visual = DerivedVisualState::from_vector(self.gesture, self.screen_width, &self.tuning);
        self.channels.apply_visual(visual);
        Some(visual)
    }

    pub fn release(
        &mut self,
        dx: f64,
        dy: f64,
        now: Instant,
        index: &mut ViewIndex,
        photo_count: usize,
    ) -> StateResult<ReleaseOutcome> {
        let _ = self.drag_to(dx, dy);
        let decision = decide(
            self.gesture,
            self.screen_width,
            self.tuning.threshold_fraction,
        );

        match decision {
            SwipeDecision::Commit(direction) => {
                self.machine.transition(SwipeEvent::ReleaseCommit)?;
                self.baseline = Vector2::ZERO;
                index.advance(photo_count);
                self.start_exit(direction, now);
                tracing::debug!(
                    ?direction,
                    dx,
                    dy,
                    index = index.get(),
                    photo_count,
                    "swipe committed"
                );
                Ok(ReleaseOutcome::Committed {
                    direction,
                    index: index.get(),
                })
            }
            SwipeDecision::Cancel => {
                self.machine.transition(SwipeEvent::ReleaseCancel)?;
                self.baseline = Vector2::ZERO;
                self.start_spring_back(now);
                tracing::trace!(dx, dy, "swipe cancelled");
                Ok(ReleaseOutcome::Cancelled)
            }
        }
    }

    fn start_exit(&mut self, direction: SwipeDirection, now: Instant) {
        let sign = direction.sign();
        let target = CardChannels {
            position: Vector2::new(
                sign * self.screen_width * self.tuning.exit_distance_factor,
                self.channels.position.y,
            ),
            rotation: sign * self.tuning.exit_rotation,
            opacity: 0.0,
            green_alpha: 0.0,
            red_alpha: 0.0,
        };
        let duration = self.tuning.exit_duration;
        self.settle = Some(Settle::Exit(ChannelSet::build(
            &self.channels,
            &target,
            |from, to| TimingAnimation::new(from, to, now, duration),
        )));
    }

    fn start_spring_back(&mut self, now: Instant) {
        let config = self.tuning.spring;
        self.settle = Some(Settle::SpringBack(ChannelSet::build(
            &self.channels,
            &CardChannels::REST,
            |from, to| SpringAnimation::new(from, to, now, config),
        )));
    }

    /// Advances the running settle animation to `now`.
    pub fn tick(&mut self, now: Instant) -> Option<SettleCompletion> {
        let settle = self.settle?;
        let completion = match settle {
            Settle::Exit(set) => {
                self.channels = CardChannels {
                    position: Vector2::new(set.x.value_at(now), set.y.value_at(now)),
                    rotation: set.rotation.value_at(now),
                    opacity: set.opacity.value_at(now),
                    green_alpha: set.green_alpha.value_at(now),
                    red_alpha: set.red_alpha.value_at(now),
                };
                set.all()
                    .iter()
                    .all(|animation| animation.is_finished(now))
                    .then_some(SettleCompletion::Exited)
            }
            Settle::SpringBack(set) => {
                let x = set.x.sample(now);
                let y = set.y.sample(now);
                let rotation = set.rotation.sample(now);
                let opacity = set.opacity.sample(now);
                let green_alpha = set.green_alpha.sample(now);
                let red_alpha = set.red_alpha.sample(now);
                self.channels = CardChannels {
                    position: Vector2::new(x.position, y.position),
                    rotation: rotation.position,
                    opacity: opacity.position,
                    green_alpha: green_alpha.position,
                    red_alpha: red_alpha.position,
                };
                [x, y, rotation, opacity, green_alpha, red_alpha]
                    .iter()
                    .all(|sample| sample.at_rest)
                    .then_some(SettleCompletion::Returned)
            }
        }?;

        self.finish_settle();
        Some(completion)
    }

    fn finish_settle(&mut self) {
        self.settle = None;
        self.channels = CardChannels::REST;
        self.baseline = Vector2::ZERO;
        self.gesture = Vector2::ZERO;
        if let Err(err) = self.machine.transition(SwipeEvent::SettleComplete) {
            tracing::warn!(?err, "settle finished outside a settle phase");
        }
    }
}
