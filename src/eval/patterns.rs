//! Window tiers and their weights
//!
//! Every length-5 and length-6 window on every line is put into exactly one
//! tier for a given side. Counts are kept per tier and combined with weights
//! that grow much faster than the stone count, so a single open three
//! outweighs any realistic number of scattered stones.

use crate::board::Cell;

/// Severity tier of one window, from one side's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Stones of both sides: nobody can complete five here
    Blocked,
    /// None of our stones
    Neutral,
    One,
    Two,
    /// Three stones with at least one window end taken by our own stone
    BlockedThree,
    /// Three stones with both window ends empty
    OpenThree,
    /// Four stones (or five with a gap); one move from five
    Four,
    /// `_SSSS_`: cannot be stopped with one move
    DoubleOpenFour,
    /// A contiguous run of five or more
    Five,
}

impl Tier {
    pub const COUNT: usize = 9;

    pub const ALL: [Tier; Tier::COUNT] = [
        Tier::Blocked,
        Tier::Neutral,
        Tier::One,
        Tier::Two,
        Tier::BlockedThree,
        Tier::OpenThree,
        Tier::Four,
        Tier::DoubleOpenFour,
        Tier::Five,
    ];

    /// Weight of one window in this tier.
    ///
    /// `Five` has no weight: it short-circuits to the saturating score.
    pub const fn weight(self) -> i64 {
        match self {
            Tier::Blocked | Tier::Neutral | Tier::Five => 0,
            Tier::One => 10,
            Tier::Two => 150,
            Tier::BlockedThree => 600,
            Tier::OpenThree => 4_000,
            Tier::Four => 25_000,
            Tier::DoubleOpenFour => 200_000,
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Classify a single window for `side`.
pub fn classify_window(window: &[Cell], side: Cell) -> Tier {
    let opponent = side.other();
    let mut own = 0usize;
    let mut has_opponent = false;
    let mut run = 0usize;
    let mut longest_run = 0usize;

    for &cell in window {
        if cell == side {
            own += 1;
            run += 1;
            longest_run = longest_run.max(run);
        } else {
            run = 0;
            if cell == opponent {
                has_opponent = true;
            }
        }
    }

    if own > 0 && has_opponent {
        return Tier::Blocked;
    }
    if own == 0 {
        return Tier::Neutral;
    }
    if longest_run >= 5 {
        return Tier::Five;
    }

    let first = window.first().copied();
    let last = window.last().copied();
    let open_ends = first == Some(Cell::Empty) && last == Some(Cell::Empty);

    match own {
        4 if window.len() == 6 && open_ends => Tier::DoubleOpenFour,
        n if n >= 4 => Tier::Four,
        3 if open_ends => Tier::OpenThree,
        3 => Tier::BlockedThree,
        2 => Tier::Two,
        _ => Tier::One,
    }
}

/// Number of windows per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierCounts {
    counts: [u32; Tier::COUNT],
}

impl TierCounts {
    #[inline]
    pub fn add(&mut self, tier: Tier) {
        self.counts[tier.slot()] += 1;
    }

    #[inline]
    pub fn get(&self, tier: Tier) -> u32 {
        self.counts[tier.slot()]
    }

    /// Weighted sum over all tiers
    pub fn weighted(&self) -> i64 {
        Tier::ALL
            .iter()
            .map(|&tier| i64::from(self.get(tier)) * tier.weight())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(pattern: &str) -> Vec<Cell> {
        pattern
            .chars()
            .map(|ch| Cell::from_symbol(ch).unwrap())
            .collect()
    }

    #[test]
    fn test_weight_hierarchy() {
        // Each tier must outweigh several windows of the tier below
        assert!(Tier::DoubleOpenFour.weight() > 4 * Tier::Four.weight());
        assert!(Tier::Four.weight() > 4 * Tier::OpenThree.weight());
        assert!(Tier::OpenThree.weight() > 4 * Tier::BlockedThree.weight());
        assert!(Tier::BlockedThree.weight() > 3 * Tier::Two.weight());
        assert!(Tier::OpenThree.weight() > 3 * Tier::One.weight());
        assert!(Tier::Two.weight() > Tier::One.weight());
    }

    #[test]
    fn test_classify_basic_tiers() {
        let s = Cell::Engine;
        assert_eq!(classify_window(&cells("....."), s), Tier::Neutral);
        assert_eq!(classify_window(&cells("XX..."), s), Tier::Neutral);
        assert_eq!(classify_window(&cells("O...."), s), Tier::One);
        assert_eq!(classify_window(&cells(".O.O."), s), Tier::Two);
        assert_eq!(classify_window(&cells("OX..."), s), Tier::Blocked);
    }

    #[test]
    fn test_classify_threes() {
        let s = Cell::Engine;
        assert_eq!(classify_window(&cells(".OOO."), s), Tier::OpenThree);
        assert_eq!(classify_window(&cells("OOO.."), s), Tier::BlockedThree);
        assert_eq!(classify_window(&cells(".OO.O."), s), Tier::OpenThree);
        assert_eq!(classify_window(&cells("..OOO."), s), Tier::OpenThree);
    }

    #[test]
    fn test_classify_fours() {
        let s = Cell::Opponent;
        assert_eq!(classify_window(&cells(".XXXX."), s), Tier::DoubleOpenFour);
        assert_eq!(classify_window(&cells("XXXX.."), s), Tier::Four);
        assert_eq!(classify_window(&cells(".XXXX"), s), Tier::Four);
        assert_eq!(classify_window(&cells("XX.XX"), s), Tier::Four);
        // Five stones with a gap is one move from five, not a win
        assert_eq!(classify_window(&cells("XX.XXX"), s), Tier::Four);
    }

    #[test]
    fn test_classify_five() {
        let s = Cell::Engine;
        assert_eq!(classify_window(&cells("OOOOO"), s), Tier::Five);
        assert_eq!(classify_window(&cells(".OOOOO"), s), Tier::Five);
        assert_eq!(classify_window(&cells("OOOOOO"), s), Tier::Five);
    }

    #[test]
    fn test_counts_weighted() {
        let mut counts = TierCounts::default();
        counts.add(Tier::One);
        counts.add(Tier::One);
        counts.add(Tier::OpenThree);
        counts.add(Tier::Blocked);
        assert_eq!(counts.get(Tier::One), 2);
        assert_eq!(counts.weighted(), 2 * 10 + 4_000);
    }
}
