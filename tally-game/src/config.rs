//! Bonus tuning for the upper section.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_UPPER_BONUS, DEFAULT_UPPER_BONUS_THRESHOLD};

const DEFAULT_RULES_DATA: &str = include_str!("../assets/rules.json");

/// Configuration for the upper-section bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Upper total at which the bonus is awarded.
    #[serde(default = "RulesConfig::default_upper_bonus_threshold")]
    pub upper_bonus_threshold: u32,
    #[serde(default = "RulesConfig::default_upper_bonus")]
    pub upper_bonus: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            upper_bonus_threshold: Self::default_upper_bonus_threshold(),
            upper_bonus: Self::default_upper_bonus(),
        }
    }
}

impl RulesConfig {
    const fn default_upper_bonus_threshold() -> u32 {
        DEFAULT_UPPER_BONUS_THRESHOLD
    }

    const fn default_upper_bonus() -> u32 {
        DEFAULT_UPPER_BONUS
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_RULES_DATA).unwrap_or_default()
    }

    /// Parse rules from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
