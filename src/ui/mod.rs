pub mod style;

pub use style::{CardColors, StyleTokens, CARD_COLORS, LAYOUT_TOKENS};
