// 🏛️ Pillar (柱) - one position of the sexagenary cycle

use std::fmt;

use super::branch::Branch;
use super::stem::Stem;
use crate::error::{ChartError, ChartResult};

/// Number of valid (stem, branch) pairs.
pub const CYCLE_LEN: usize = 60;

/// A parity-matched (stem, branch) pair. Only `new` and `from_cycle_index`
/// build one, so every value sits somewhere on the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pillar {
    stem: Stem,
    branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> ChartResult<Self> {
        if stem.index() % 2 != branch.index() % 2 {
            return Err(ChartError::invariant(format!(
                "{}{} is not a sexagenary pair (stem/branch parity differ)",
                stem, branch
            )));
        }
        Ok(Pillar { stem, branch })
    }

    /// Pillar at position `index` of the cycle (甲子 = 0), wrapping.
    pub fn from_cycle_index(index: i64) -> Self {
        Pillar {
            stem: Stem::from_index(index),
            branch: Branch::from_index(index),
        }
    }

    pub fn stem(&self) -> Stem {
        self.stem
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Position in the cycle (0..60).
    ///
    /// n ≡ stem (mod 10) and n ≡ branch (mod 12) give n ≡ 6·stem − 5·branch
    /// (mod 60), which is exact for parity-matched pairs.
    pub fn cycle_index(&self) -> usize {
        let n = 6 * self.stem.index() as i64 - 5 * self.branch.index() as i64;
        n.rem_euclid(CYCLE_LEN as i64) as usize
    }

    /// Every pair of the cycle in order.
    pub fn cycle() -> impl Iterator<Item = Pillar> {
        (0..CYCLE_LEN as i64).map(Pillar::from_cycle_index)
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cycle_index_round_trip() {
        for n in 0..CYCLE_LEN {
            let pillar = Pillar::from_cycle_index(n as i64);
            assert_eq!(pillar.cycle_index(), n);

            // decompose into (n mod 10, n mod 12), then search the cycle
            let rebuilt = Pillar::new(
                Stem::from_index((n % Stem::COUNT) as i64),
                Branch::from_index((n % Branch::COUNT) as i64),
            )
            .unwrap();
            assert_eq!(Pillar::cycle().position(|p| p == rebuilt), Some(n));
        }
    }

    #[test]
    fn test_cycle_has_sixty_distinct_pairs() {
        let pairs: HashSet<Pillar> = Pillar::cycle().collect();
        assert_eq!(pairs.len(), CYCLE_LEN);
        assert!(pairs
            .iter()
            .all(|p| p.stem().index() % 2 == p.branch().index() % 2));
    }

    #[test]
    fn test_parity_mismatch_is_rejected() {
        assert!(Pillar::new(Stem::Jia, Branch::Chou).is_err());
        assert!(Pillar::new(Stem::Jia, Branch::Xu).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Pillar::from_cycle_index(0).to_string(), "甲子");
        assert_eq!(Pillar::from_cycle_index(59).to_string(), "癸亥");
        assert_eq!(Pillar::from_cycle_index(-1).to_string(), "癸亥");
        assert_eq!(Pillar::from_cycle_index(26).to_string(), "庚寅");
    }
}
