use std::time::{Duration, Instant};

const REST_DISPLACEMENT_THRESHOLD: f64 = 0.001;
const REST_SPEED_THRESHOLD: f64 = 0.001;

/// Standard ease-in-out curve, `cubic-bezier(0.42, 0, 0.58, 1)`.
pub fn ease_in_out(progress: f64) -> f64 {
    cubic_bezier(0.42, 0.0, 0.58, 1.0, progress.clamp(0.0, 1.0))
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }
    let sample = |a1: f64, a2: f64, t: f64| {
        let inv = 1.0 - t;
        3.0 * inv * inv * t * a1 + 3.0 * inv * t * t * a2 + t * t * t
    };
    let slope = |a1: f64, a2: f64, t: f64| {
        let inv = 1.0 - t;
        3.0 * inv * inv * a1 + 6.0 * inv * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    };

    let mut t = x;
    for _ in 0..8 {
        let error = sample(x1, x2, t) - x;
        if error.abs() < 1e-7 {
            return sample(y1, y2, t);
        }
        let d = slope(x1, x2, t);
        if d.abs() < 1e-6 {
            break;
        }
        t -= error / d;
    }

    // Newton stalled; bisect on the monotonic x curve.
    let (mut low, mut high) = (0.0, 1.0);
    t = x;
    for _ in 0..32 {
        let value = sample(x1, x2, t);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    sample(y1, y2, t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingAnimation {
    from: f64,
    to: f64,
    started_at: Instant,
    duration: Duration,
}

impl TimingAnimation {
    pub fn new(from: f64, to: f64, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        let eased = ease_in_out(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Spring parameters in origami tension/friction units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 100.0,
            friction: 8.0,
        }
    }
}

impl SpringConfig {
    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    pub fn damping(&self) -> f64 {
        (self.friction - 8.0) * 3.0 + 25.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSample {
    pub position: f64,
    pub velocity: f64,
    pub at_rest: bool,
}

/// Damped harmonic oscillator evaluated in closed form, unit mass, starting
/// at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringAnimation {
    from: f64,
    to: f64,
    started_at: Instant,
    stiffness: f64,
    damping: f64,
}

impl SpringAnimation {
    pub fn new(from: f64, to: f64, started_at: Instant, config: SpringConfig) -> Self {
        Self {
            from,
            to,
            started_at,
            stiffness: config.stiffness().max(f64::EPSILON),
            damping: config.damping().max(0.0),
        }
    }

    pub fn sample(&self, now: Instant) -> SpringSample {
        let t = now.saturating_duration_since(self.started_at).as_secs_f64();
        let x0 = self.to - self.from;
        let v0 = 0.0;
        let omega0 = self.stiffness.sqrt();
        let zeta = self.damping / (2.0 * omega0);

        let (position, velocity) = if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * t).exp();
            let a = (v0 + zeta * omega0 * x0) / omega1;
            let (sin, cos) = (omega1 * t).sin_cos();
            let position = self.to - envelope * (a * sin + x0 * cos);
            let velocity = zeta * omega0 * envelope * (a * sin + x0 * cos)
                - envelope * ((v0 + zeta * omega0 * x0) * cos - omega1 * x0 * sin);
            (position, velocity)
        } else {
            let envelope = (-omega0 * t).exp();
            let position = self.to - envelope * (x0 + (v0 + omega0 * x0) * t);
            let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
            (position, velocity)
        };

        let at_rest = velocity.abs() <= REST_SPEED_THRESHOLD
            && (self.to - position).abs() <= REST_DISPLACEMENT_THRESHOLD;
        if at_rest {
            SpringSample {
                position: self.to,
                velocity: 0.0,
                at_rest,
            }
        } else {
            SpringSample {
                position,
                velocity,
                at_rest,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_in_out_is_monotonic_and_pinned_at_ends() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-4);
        let mut previous = 0.0;
        for step in 1..=20 {
            let value = ease_in_out(f64::from(step) / 20.0);
            assert!(value >= previous);
            previous = value;
        }
        assert!(ease_in_out(0.1) < 0.1);
    }

    #[test]
    fn timing_animation_reaches_target_after_duration() {
        let start = Instant::now();
        let animation = TimingAnimation::new(10.0, 0.0, start, Duration::from_millis(150));
        assert_eq!(animation.value_at(start), 10.0);
        assert!(!animation.is_finished(start + Duration::from_millis(75)));
        assert_eq!(animation.value_at(start + Duration::from_millis(150)), 0.0);
        assert_eq!(animation.value_at(start + Duration::from_secs(2)), 0.0);
        assert!(animation.is_finished(start + Duration::from_millis(150)));
    }

    #[test]
    fn spring_config_converts_origami_units() {
        let config = SpringConfig::default();
        assert!((config.stiffness() - 447.4).abs() < 1e-9);
        assert_eq!(config.damping(), 25.0);
    }

    #[test]
    fn spring_starts_at_origin_overshoots_and_settles() {
        let start = Instant::now();
        let spring = SpringAnimation::new(300.0, 0.0, start, SpringConfig::default());
        let first = spring.sample(start);
        assert_eq!(first.position, 300.0);
        assert!(!first.at_rest);

        let overshoot = (1..100)
            .map(|ms| spring.sample(start + Duration::from_millis(ms * 5)).position)
            .fold(f64::INFINITY, f64::min);
        assert!(overshoot < 0.0, "underdamped spring should overshoot");

        let settled = spring.sample(start + Duration::from_secs(3));
        assert!(settled.at_rest);
        assert_eq!(settled.position, 0.0);
    }
}
