//! Scorecard cells and the write-once category map.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::{Category, Section};
use crate::constants::{CATEGORY_COUNT, GLYPH_CROSSED, GLYPH_UNSET};
use crate::error::RewriteReason;

/// A value that may be written into a scorecard cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// Deliberate zero; the player forfeits the category.
    Crossed,
    Points(u32),
}

impl Mark {
    /// Contribution to section totals. Crossed counts as zero.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Mark::Crossed => 0,
            Mark::Points(points) => points,
        }
    }
}

/// Three-way view of a cell: not yet played, forfeited, or scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEntry {
    #[default]
    Unset,
    Crossed,
    Points(u32),
}

impl ScoreEntry {
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, ScoreEntry::Unset)
    }

    /// Contribution to section totals. Unset and crossed both count as zero.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            ScoreEntry::Unset | ScoreEntry::Crossed => 0,
            ScoreEntry::Points(points) => points,
        }
    }

    /// Text a score cell renders for this value.
    #[must_use]
    pub fn glyph(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreEntry::Unset => f.write_str(GLYPH_UNSET),
            ScoreEntry::Crossed => f.write_str(GLYPH_CROSSED),
            ScoreEntry::Points(points) => write!(f, "{points}"),
        }
    }
}

impl From<Mark> for ScoreEntry {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Crossed => ScoreEntry::Crossed,
            Mark::Points(points) => ScoreEntry::Points(points),
        }
    }
}

impl From<Option<Mark>> for ScoreEntry {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(ScoreEntry::Unset, ScoreEntry::from)
    }
}

/// Per-player mapping from category to recorded mark.
///
/// Each category holds at most one mark and a mark is never replaced; the
/// card only grows until [`Scorecard::clear`] is called on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scorecard {
    marks: BTreeMap<Category, Mark>,
}

impl Scorecard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entry(&self, category: Category) -> ScoreEntry {
        self.marks.get(&category).copied().into()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> Option<Mark> {
        self.marks.get(&category).copied()
    }

    #[must_use]
    pub fn is_recorded(&self, category: Category) -> bool {
        self.marks.contains_key(&category)
    }

    /// Write a mark into an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteReason::AlreadyRecorded`] if the cell already holds a
    /// mark; the existing mark is left untouched.
    pub fn record(&mut self, category: Category, mark: Mark) -> Result<(), RewriteReason> {
        if self.marks.contains_key(&category) {
            return Err(RewriteReason::AlreadyRecorded);
        }
        self.marks.insert(category, mark);
        Ok(())
    }

    /// Number of categories holding a mark.
    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.marks.len() == CATEGORY_COUNT
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Mark)> + '_ {
        self.marks.iter().map(|(category, mark)| (*category, *mark))
    }

    pub fn section_marks(&self, section: Section) -> impl Iterator<Item = Mark> + '_ {
        self.iter()
            .filter(move |(category, _)| category.section() == section)
            .map(|(_, mark)| mark)
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}
