//! Scorecard categories, sections and score styling rules.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{CATEGORY_COUNT, STYLE_MID_PCT, STYLE_NEAR_MAX_PCT};
use crate::error::ScoreError;
use crate::score::ScoreEntry;

/// Half of the scorecard a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Number-matching categories; their total feeds the bonus.
    Upper,
    /// Combination categories.
    Lower,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Upper => write!(f, "upper"),
            Section::Lower => write!(f, "lower"),
        }
    }
}

/// One of the thirteen fixed scoring slots on a scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// Every category in scorecard order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Stable snake_case identifier, matching the serde representation.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Category::Ones => "ones",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::ThreeOfAKind => "three_of_a_kind",
            Category::FourOfAKind => "four_of_a_kind",
            Category::FullHouse => "full_house",
            Category::SmallStraight => "small_straight",
            Category::LargeStraight => "large_straight",
            Category::Yahtzee => "yahtzee",
            Category::Chance => "chance",
        }
    }

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Category::Ones
            | Category::Twos
            | Category::Threes
            | Category::Fours
            | Category::Fives
            | Category::Sixes => Section::Upper,
            _ => Section::Lower,
        }
    }

    /// Ceiling used to scale score styling. Recording more is still allowed.
    #[must_use]
    pub const fn max_score(self) -> u32 {
        match self {
            Category::Ones => 5,
            Category::Twos => 10,
            Category::Threes => 15,
            Category::Fours => 20,
            Category::Fives => 25,
            Category::Sixes => 30,
            Category::ThreeOfAKind
            | Category::FourOfAKind
            | Category::SmallStraight
            | Category::Chance => 30,
            Category::FullHouse => 25,
            Category::LargeStraight => 40,
            Category::Yahtzee => 50,
        }
    }

    /// Face value matched by an upper category.
    #[must_use]
    pub const fn face(self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    /// Categories of one section in scorecard order.
    pub fn in_section(section: Section) -> impl Iterator<Item = Category> {
        Self::ALL
            .into_iter()
            .filter(move |category| category.section() == section)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(key))
            .ok_or_else(|| ScoreError::UnknownCategory(s.to_string()))
    }
}

#[must_use]
pub const fn max_score(category: Category) -> u32 {
    category.max_score()
}

#[must_use]
pub const fn section(category: Category) -> Section {
    category.section()
}

/// Visual intent for a score cell, consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStyle {
    Empty,
    Crossed,
    Low,
    Mid,
    NearMax,
    Max,
}

impl ScoreStyle {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            ScoreStyle::Empty => "score-empty",
            ScoreStyle::Crossed => "score-crossed",
            ScoreStyle::Low => "score-low",
            ScoreStyle::Mid => "score-mid",
            ScoreStyle::NearMax => "score-near-max",
            ScoreStyle::Max => "score-max",
        }
    }
}

/// Classify a cell value against its category ceiling.
#[must_use]
pub fn score_style(entry: ScoreEntry, max_score: u32) -> ScoreStyle {
    let points = match entry {
        ScoreEntry::Unset => return ScoreStyle::Empty,
        ScoreEntry::Crossed => return ScoreStyle::Crossed,
        ScoreEntry::Points(points) => u64::from(points),
    };
    let max = u64::from(max_score);
    if points >= max {
        ScoreStyle::Max
    } else if points * 100 >= max * u64::from(STYLE_NEAR_MAX_PCT) {
        ScoreStyle::NearMax
    } else if points * 100 >= max * u64::from(STYLE_MID_PCT) {
        ScoreStyle::Mid
    } else {
        ScoreStyle::Low
    }
}
