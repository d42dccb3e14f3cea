// 🌿 Earthly Branches (地支) and their hidden stems (藏干)

use std::fmt;
use std::str::FromStr;

use super::element::Element;
use super::stem::Stem;
use crate::error::ValidationError;

/// One of the twelve earthly branches, in cycle order (子 = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const COUNT: usize = 12;

    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    const SYMBOLS: [&'static str; 12] = [
        "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
    ];

    const ANIMALS: [&'static str; 12] = [
        "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Cyclic lookup; negative and oversized indices wrap.
    pub fn from_index(index: i64) -> Branch {
        Branch::ALL[index.rem_euclid(Branch::COUNT as i64) as usize]
    }

    pub fn advance(&self, steps: i64) -> Branch {
        Branch::from_index(self.index() as i64 + steps)
    }

    pub fn element(&self) -> Element {
        match self {
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei => Element::Earth,
            Branch::Shen | Branch::You => Element::Metal,
            Branch::Hai | Branch::Zi => Element::Water,
        }
    }

    /// Hidden stems, main qi first, then middle and residual qi.
    pub fn hidden_stems(&self) -> &'static [Stem] {
        use Stem::*;
        match self {
            Branch::Zi => &[Gui],
            Branch::Chou => &[Ji, Xin, Gui],
            Branch::Yin => &[Jia, Bing, Wu],
            Branch::Mao => &[Yi],
            Branch::Chen => &[Wu, Yi, Gui],
            Branch::Si => &[Bing, Geng, Wu],
            Branch::Wu => &[Ding, Ji],
            Branch::Wei => &[Ji, Ding, Yi],
            Branch::Shen => &[Geng, Ren, Wu],
            Branch::You => &[Xin],
            Branch::Xu => &[Wu, Xin, Ding],
            Branch::Hai => &[Ren, Jia],
        }
    }

    /// Zodiac animal (生肖) of the branch.
    pub fn zodiac(&self) -> &'static str {
        Branch::ANIMALS[self.index()]
    }

    pub fn symbol(&self) -> &'static str {
        Branch::SYMBOLS[self.index()]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Branch {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Branch::ALL
            .iter()
            .find(|b| b.symbol() == s || format!("{:?}", b).eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ValidationError::new("branch", format!("Unknown earthly branch: {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_stems_main_qi_matches_element() {
        for branch in Branch::ALL {
            let hidden = branch.hidden_stems();
            assert!((1..=3).contains(&hidden.len()), "{:?}", branch);
            assert_eq!(hidden[0].element(), branch.element(), "{:?}", branch);
        }
    }

    #[test]
    fn test_hidden_stem_order() {
        assert_eq!(Branch::Yin.hidden_stems(), &[Stem::Jia, Stem::Bing, Stem::Wu]);
        assert_eq!(Branch::Hai.hidden_stems(), &[Stem::Ren, Stem::Jia]);
        assert_eq!(Branch::You.hidden_stems(), &[Stem::Xin]);
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Branch::from_index(-1), Branch::Hai);
        assert_eq!(Branch::from_index(14), Branch::Yin);
        assert_eq!(Branch::Xu.advance(3), Branch::Chou);
    }

    #[test]
    fn test_parse() {
        assert_eq!("午".parse::<Branch>().unwrap(), Branch::Wu);
        assert_eq!("SHEN".parse::<Branch>().unwrap(), Branch::Shen);
        assert!("甲".parse::<Branch>().is_err());
    }
}
