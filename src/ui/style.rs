use crate::geometry::Rgba;

/// Compile-time layout tokens, not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub spacing_24: i32,
    pub control_radius: u16,
    pub control_size: u16,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    pub motion_frame_ms: u32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    spacing_24: 24,
    control_radius: 8,
    control_size: 40,
    window_default_width: 480,
    window_default_height: 800,
    window_min_width: 320,
    window_min_height: 480,
    motion_frame_ms: 16,
    toast_duration_ms: 2_500,
};

/// Card palette. Overlay alphas come from the swipe engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardColors {
    pub backdrop: Rgba,
    pub card: Rgba,
    pub right_overlay: Rgba,
    pub left_overlay: Rgba,
}

pub const CARD_COLORS: CardColors = CardColors {
    backdrop: Rgba::new(0.0, 0.0, 0.0, 1.0),
    card: Rgba::new(1.0, 1.0, 1.0, 1.0),
    right_overlay: Rgba::new(0.0, 1.0, 0.0, 1.0),
    left_overlay: Rgba::new(1.0, 0.0, 0.0, 1.0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_interval_targets_sixty_hertz() {
        assert_eq!(LAYOUT_TOKENS.motion_frame_ms, 16);
    }

    #[test]
    fn default_window_fits_minimum() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.window_default_width >= tokens.window_min_width);
        assert!(tokens.window_default_height >= tokens.window_min_height);
    }

    #[test]
    fn overlays_are_opaque_base_colors() {
        assert_eq!(CARD_COLORS.right_overlay.a, 1.0);
        assert_eq!(CARD_COLORS.left_overlay.a, 1.0);
        assert_eq!(CARD_COLORS.right_overlay.with_alpha(0.25).g, 1.0);
    }
}
