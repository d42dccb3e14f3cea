// 🌱 Heavenly Stems (天干)

use std::fmt;
use std::str::FromStr;

use super::element::{Element, Polarity};
use crate::error::ValidationError;

/// One of the ten heavenly stems, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const COUNT: usize = 10;

    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    const SYMBOLS: [&'static str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Cyclic lookup; negative and oversized indices wrap.
    pub fn from_index(index: i64) -> Stem {
        Stem::ALL[index.rem_euclid(Stem::COUNT as i64) as usize]
    }

    /// Stem `steps` positions further round the cycle.
    pub fn advance(&self, steps: i64) -> Stem {
        Stem::from_index(self.index() as i64 + steps)
    }

    /// Two stems per element, yang first.
    pub fn element(&self) -> Element {
        Element::ALL[self.index() / 2]
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_index(self.index())
    }

    pub fn symbol(&self) -> &'static str {
        Stem::SYMBOLS[self.index()]
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Stem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Stem::ALL
            .iter()
            .find(|stem| stem.symbol() == s || format!("{:?}", stem).eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ValidationError::new("stem", format!("Unknown heavenly stem: {:?}", s)))
    }
}
