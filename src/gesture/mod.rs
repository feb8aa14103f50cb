//! Swipe gesture interaction: derived visuals, animation primitives and the
//! engine that ties them to a drag lifecycle.

use std::time::Duration;

mod animation;
mod engine;
mod visual;

pub use animation::{ease_in_out, SpringAnimation, SpringConfig, SpringSample, TimingAnimation};
pub use engine::{CardChannels, CardFrame, ReleaseOutcome, SettleCompletion, SwipeEngine};
pub use visual::{
    decide, display_rotation_degrees, opacity_for, overlay_alphas, rotation_for,
    DerivedVisualState, SwipeDecision, SwipeDirection, MAX_OVERLAY_ALPHA,
};

pub const SWIPE_THRESHOLD_FRACTION: f64 = 0.25;
pub const ROTATION_MULTIPLIER: f64 = 0.1;
pub const EXIT_DURATION: Duration = Duration::from_millis(150);
pub const EXIT_DISTANCE_FACTOR: f64 = 1.5;
pub const EXIT_ROTATION: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTuning {
    /// Fraction of the screen width the drag must exceed to commit.
    pub threshold_fraction: f64,
    pub rotation_multiplier: f64,
    pub exit_duration: Duration,
    /// Exit translation as a multiple of the screen width.
    pub exit_distance_factor: f64,
    /// Raw rotation channel value reached at the end of the exit.
    pub exit_rotation: f64,
    pub spring: SpringConfig,
}

impl Default for SwipeTuning {
    fn default() -> Self {
        Self {
            threshold_fraction: SWIPE_THRESHOLD_FRACTION,
            rotation_multiplier: ROTATION_MULTIPLIER,
            exit_duration: EXIT_DURATION,
            exit_distance_factor: EXIT_DISTANCE_FACTOR,
            exit_rotation: EXIT_ROTATION,
            spring: SpringConfig::default(),
        }
    }
}
