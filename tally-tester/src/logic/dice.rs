use rand::Rng;
use tally_game::Category;

pub const DICE_COUNT: usize = 5;
pub const MAX_ROLLS: u8 = 3;

/// Five six-sided dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    pub dice: [u8; DICE_COUNT],
}

impl Hand {
    #[must_use]
    pub const fn new(dice: [u8; DICE_COUNT]) -> Self {
        Self { dice }
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut dice = [0u8; DICE_COUNT];
        for die in &mut dice {
            *die = rng.gen_range(1..=6);
        }
        Self::new(dice)
    }

    /// Reroll every die whose face is not `keep`.
    pub fn reroll_except<R: Rng + ?Sized>(&mut self, keep: u8, rng: &mut R) {
        for die in &mut self.dice {
            if *die != keep {
                *die = rng.gen_range(1..=6);
            }
        }
    }

    /// Occurrences of each face, indexed 1..=6 (slot 0 unused).
    #[must_use]
    pub fn counts(&self) -> [u8; 7] {
        let mut counts = [0u8; 7];
        for &die in &self.dice {
            counts[usize::from(die)] += 1;
        }
        counts
    }

    /// Most frequent face; higher faces win ties.
    #[must_use]
    pub fn most_common_face(&self) -> u8 {
        let counts = self.counts();
        (1..=6u8)
            .max_by_key(|face| (counts[usize::from(*face)], *face))
            .unwrap_or(6)
    }

    #[must_use]
    pub fn sum(&self) -> u32 {
        self.dice.iter().map(|&d| u32::from(d)).sum()
    }

    /// Points this hand is worth in `category`.
    #[must_use]
    pub fn score(&self, category: Category) -> u32 {
        let counts = self.counts();
        let has_run = |len: usize| {
            (1..=7 - len).any(|start| (start..start + len).all(|face| counts[face] > 0))
        };
        match category {
            Category::Ones
            | Category::Twos
            | Category::Threes
            | Category::Fours
            | Category::Fives
            | Category::Sixes => {
                let face = category.face().unwrap_or(0);
                u32::from(counts[usize::from(face)]) * u32::from(face)
            }
            Category::ThreeOfAKind if counts.iter().any(|&c| c >= 3) => self.sum(),
            Category::FourOfAKind if counts.iter().any(|&c| c >= 4) => self.sum(),
            Category::FullHouse if counts.contains(&3) && counts.contains(&2) => 25,
            Category::SmallStraight if has_run(4) => 30,
            Category::LargeStraight if has_run(5) => 40,
            Category::Yahtzee if counts.contains(&5) => 50,
            Category::Chance => self.sum(),
            _ => 0,
        }
    }
}

/// Roll up to [`MAX_ROLLS`] times, holding the most common face each time.
pub fn roll_turn<R: Rng + ?Sized>(rng: &mut R) -> Hand {
    let mut hand = Hand::roll(rng);
    for _ in 1..MAX_ROLLS {
        let keep = hand.most_common_face();
        if usize::from(hand.counts()[usize::from(keep)]) == DICE_COUNT {
            break;
        }
        hand.reroll_except(keep, rng);
    }
    hand
}
