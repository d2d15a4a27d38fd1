//! Fixed scorecard constants for Tally scoring logic.
//!
//! Bonus tuning lives in [`crate::config::RulesConfig`]; the values here are
//! the defaults it falls back to and the shape of the card itself.

// Scorecard shape ----------------------------------------------------------
pub const CATEGORY_COUNT: usize = 13;
pub const UPPER_CATEGORY_COUNT: usize = 6;
pub const LOWER_CATEGORY_COUNT: usize = 7;

// Upper bonus --------------------------------------------------------------
pub const DEFAULT_UPPER_BONUS_THRESHOLD: u32 = 63;
pub const DEFAULT_UPPER_BONUS: u32 = 35;

// Score styling ------------------------------------------------------------
pub(crate) const STYLE_NEAR_MAX_PCT: u32 = 75;
pub(crate) const STYLE_MID_PCT: u32 = 40;

// Display glyphs -----------------------------------------------------------
pub const GLYPH_UNSET: &str = "-";
pub const GLYPH_CROSSED: &str = "✕";
