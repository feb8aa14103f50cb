//! Pure visual feedback derived from a drag vector.
//!
//! Nothing here touches a timer or a widget: every value is a function of the
//! gesture vector, the screen width and the tuning constants.

use crate::geometry::Vector2;

use super::SwipeTuning;

/// Input domain of the rotation interpolation.
pub const ROTATION_INPUT_RANGE: (f64, f64) = (-100.0, 100.0);
/// Output range in degrees of the rotation interpolation.
pub const ROTATION_OUTPUT_DEGREES: (f64, f64) = (-10.0, 10.0);
/// Upper bound of either color overlay while dragging.
pub const MAX_OVERLAY_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn from_dx(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedVisualState {
    /// Raw rotation channel value, before display interpolation.
    pub rotation: f64,
    pub opacity: f64,
    pub green_alpha: f64,
    pub red_alpha: f64,
}

impl DerivedVisualState {
    pub const REST: Self = Self {
        rotation: 0.0,
        opacity: 1.0,
        green_alpha: 0.0,
        red_alpha: 0.0,
    };

    pub fn from_vector(vector: Vector2, screen_width: f64, tuning: &SwipeTuning) -> Self {
        let (green_alpha, red_alpha) = overlay_alphas(vector.x, screen_width);
        Self {
            rotation: rotation_for(vector.x, tuning.rotation_multiplier),
            opacity: opacity_for(vector.x, screen_width),
            green_alpha,
            red_alpha,
        }
    }
}

pub fn rotation_for(dx: f64, multiplier: f64) -> f64 {
    dx * multiplier
}

/// Maps a raw rotation value onto display degrees, clamping outside the
/// input domain instead of extrapolating.
pub fn display_rotation_degrees(rotation: f64) -> f64 {
    let (in_min, in_max) = ROTATION_INPUT_RANGE;
    let (out_min, out_max) = ROTATION_OUTPUT_DEGREES;
    let clamped = rotation.clamp(in_min, in_max);
    out_min + (clamped - in_min) * (out_max - out_min) / (in_max - in_min)
}

pub fn opacity_for(dx: f64, screen_width: f64) -> f64 {
    (1.0 - dx.abs() / screen_width).max(0.0)
}

/// Returns `(green, red)`; at most one of them is non-zero.
pub fn overlay_alphas(dx: f64, screen_width: f64) -> (f64, f64) {
    let alpha = (dx.abs() / screen_width).min(MAX_OVERLAY_ALPHA);
    match SwipeDirection::from_dx(dx) {
        Some(SwipeDirection::Right) => (alpha, 0.0),
        Some(SwipeDirection::Left) => (0.0, alpha),
        None => (0.0, 0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Commit(SwipeDirection),
    Cancel,
}

/// Commits only when the horizontal travel passes the threshold and
/// dominates the vertical travel.
pub fn decide(vector: Vector2, screen_width: f64, threshold_fraction: f64) -> SwipeDecision {
    let abs_dx = vector.x.abs();
    let abs_dy = vector.y.abs();
    let threshold = screen_width * threshold_fraction;
    if abs_dx > threshold && abs_dx > abs_dy {
        match SwipeDirection::from_dx(vector.x) {
            Some(direction) => SwipeDecision::Commit(direction),
            None => SwipeDecision::Cancel,
        }
    } else {
        SwipeDecision::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 1000.0;

    #[test]
    fn decide_requires_threshold_and_horizontal_dominance() {
        assert_eq!(
            decide(Vector2::new(260.0, 0.0), WIDTH, 0.25),
            SwipeDecision::Commit(SwipeDirection::Right)
        );
        assert_eq!(
            decide(Vector2::new(-260.0, 10.0), WIDTH, 0.25),
            SwipeDecision::Commit(SwipeDirection::Left)
        );
        assert_eq!(
            decide(Vector2::new(260.0, 300.0), WIDTH, 0.25),
            SwipeDecision::Cancel
        );
        assert_eq!(
            decide(Vector2::new(240.0, 0.0), WIDTH, 0.25),
            SwipeDecision::Cancel
        );
        assert_eq!(
            decide(Vector2::new(250.0, 0.0), WIDTH, 0.25),
            SwipeDecision::Cancel
        );
        assert_eq!(
            decide(Vector2::new(20.0, 900.0), WIDTH, 0.25),
            SwipeDecision::Cancel
        );
    }

    #[test]
    fn opacity_and_overlays_stay_in_range_across_drag_samples() {
        let mut dx = -3000.0;
        while dx <= 3000.0 {
            let opacity = opacity_for(dx, WIDTH);
            let (green, red) = overlay_alphas(dx, WIDTH);
            assert!((0.0..=1.0).contains(&opacity), "opacity {opacity} at {dx}");
            assert!((0.0..=MAX_OVERLAY_ALPHA).contains(&green));
            assert!((0.0..=MAX_OVERLAY_ALPHA).contains(&red));
            assert!(green == 0.0 || red == 0.0, "both overlays lit at {dx}");
            dx += 37.5;
        }
    }

    #[test]
    fn overlays_follow_direction_and_are_zero_at_rest() {
        assert_eq!(overlay_alphas(0.0, WIDTH), (0.0, 0.0));
        assert_eq!(overlay_alphas(200.0, WIDTH), (0.2, 0.0));
        assert_eq!(overlay_alphas(-200.0, WIDTH), (0.0, 0.2));
        assert_eq!(overlay_alphas(900.0, WIDTH), (0.5, 0.0));
    }

    #[test]
    fn opacity_fades_linearly_and_floors_at_zero() {
        assert_eq!(opacity_for(0.0, WIDTH), 1.0);
        assert_eq!(opacity_for(-250.0, WIDTH), 0.75);
        assert_eq!(opacity_for(1500.0, WIDTH), 0.0);
    }

    #[test]
    fn display_rotation_interpolates_and_clamps() {
        assert_eq!(display_rotation_degrees(0.0), 0.0);
        assert_eq!(display_rotation_degrees(50.0), 5.0);
        assert_eq!(display_rotation_degrees(-100.0), -10.0);
        assert_eq!(display_rotation_degrees(400.0), 10.0);
        assert_eq!(display_rotation_degrees(-400.0), -10.0);
    }

    #[test]
    fn derived_state_uses_tuning_multiplier() {
        let tuning = SwipeTuning::default();
        let state = DerivedVisualState::from_vector(Vector2::new(-300.0, 40.0), WIDTH, &tuning);
        assert!((state.rotation + 30.0).abs() < 1e-9);
        assert!((state.opacity - 0.7).abs() < 1e-9);
        assert_eq!(state.green_alpha, 0.0);
        assert!((state.red_alpha - 0.3).abs() < 1e-9);
    }
}
