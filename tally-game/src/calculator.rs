//! Derived figures for a single player's scorecard.
//!
//! Everything here is recomputed from the player's marks on each call; no
//! total or bonus is ever stored alongside the scorecard.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::category::Section;
use crate::config::RulesConfig;
use crate::player::Player;

pub(crate) fn default_rules() -> &'static RulesConfig {
    static RULES: OnceLock<RulesConfig> = OnceLock::new();
    RULES.get_or_init(RulesConfig::load_from_static)
}

/// Sum of the recorded points in one section. Crossed and unset cells add 0.
#[must_use]
pub fn section_total(player: &Player, section: Section) -> u32 {
    player
        .scores
        .section_marks(section)
        .fold(0u32, |total, mark| total.saturating_add(mark.points()))
}

#[must_use]
pub fn upper_bonus(player: &Player) -> u32 {
    upper_bonus_with_rules(player, default_rules())
}

/// Bonus awarded once the upper total reaches the configured threshold.
#[must_use]
pub fn upper_bonus_with_rules(player: &Player, rules: &RulesConfig) -> u32 {
    if section_total(player, Section::Upper) >= rules.upper_bonus_threshold {
        rules.upper_bonus
    } else {
        0
    }
}

#[must_use]
pub fn grand_total(player: &Player) -> u32 {
    grand_total_with_rules(player, default_rules())
}

/// Upper total + upper bonus + lower total.
#[must_use]
pub fn grand_total_with_rules(player: &Player, rules: &RulesConfig) -> u32 {
    section_total(player, Section::Upper)
        .saturating_add(upper_bonus_with_rules(player, rules))
        .saturating_add(section_total(player, Section::Lower))
}

/// Every derived figure for one player, computed in a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub upper_total: u32,
    pub upper_bonus: u32,
    pub lower_total: u32,
    pub grand_total: u32,
    /// Upper points still needed before the bonus is awarded.
    pub bonus_shortfall: u32,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn for_player(player: &Player) -> Self {
        Self::with_rules(player, default_rules())
    }

    #[must_use]
    pub fn with_rules(player: &Player, rules: &RulesConfig) -> Self {
        let upper_total = section_total(player, Section::Upper);
        let lower_total = section_total(player, Section::Lower);
        let upper_bonus = upper_bonus_with_rules(player, rules);
        Self {
            upper_total,
            upper_bonus,
            lower_total,
            grand_total: upper_total
                .saturating_add(upper_bonus)
                .saturating_add(lower_total),
            bonus_shortfall: rules.upper_bonus_threshold.saturating_sub(upper_total),
        }
    }
}
