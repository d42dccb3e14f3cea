// 🧭 Relational Attributes - what the pillars say about each other
//
// Pure lookups over already-derived pillars:
// - ten gods (十神): every stem classified against the day stem
// - Na Yin (纳音): sound element of each sexagenary pair
// - element tally and void branches (旬空) of the day pillar

use std::fmt;

use crate::symbols::{Branch, Element, Pillar, Stem, CYCLE_LEN};

// ============================================================================
// TEN GODS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenGod {
    /// The day stem itself (日主); never produced by classification.
    DayMaster,
    Peer,
    Rival,
    OutputGod,
    HurtingOfficer,
    IndirectWealth,
    DirectWealth,
    SevenKillings,
    DirectOfficer,
    ResourceSeal,
    DirectSeal,
}

impl TenGod {
    pub fn symbol(&self) -> &'static str {
        match self {
            TenGod::DayMaster => "日主",
            TenGod::Peer => "比肩",
            TenGod::Rival => "劫财",
            TenGod::OutputGod => "食神",
            TenGod::HurtingOfficer => "伤官",
            TenGod::IndirectWealth => "偏财",
            TenGod::DirectWealth => "正财",
            TenGod::SevenKillings => "七杀",
            TenGod::DirectOfficer => "正官",
            TenGod::ResourceSeal => "偏印",
            TenGod::DirectSeal => "正印",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            TenGod::DayMaster => "self",
            TenGod::Peer => "peer",
            TenGod::Rival => "rival",
            TenGod::OutputGod => "output-god",
            TenGod::HurtingOfficer => "hurting-officer",
            TenGod::IndirectWealth => "indirect-wealth",
            TenGod::DirectWealth => "direct-wealth",
            TenGod::SevenKillings => "seven-killings",
            TenGod::DirectOfficer => "direct-officer",
            TenGod::ResourceSeal => "resource-seal",
            TenGod::DirectSeal => "direct-seal",
        }
    }
}

impl fmt::Display for TenGod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the target element stands to the reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRelation {
    Same,
    /// reference produces target
    Produces,
    /// target produces reference
    ProducedBy,
    /// reference overcomes target
    Overcomes,
    /// target overcomes reference
    OvercomeBy,
}

impl ElementRelation {
    pub fn between(reference: Element, target: Element) -> Self {
        if reference == target {
            ElementRelation::Same
        } else if reference.produces() == target {
            ElementRelation::Produces
        } else if target.produces() == reference {
            ElementRelation::ProducedBy
        } else if reference.overcomes() == target {
            ElementRelation::Overcomes
        } else {
            ElementRelation::OvercomeBy
        }
    }

    fn row(&self) -> usize {
        *self as usize
    }
}

/// Rows by `ElementRelation`, columns [same polarity, opposite polarity].
const TEN_GOD_MATRIX: [[TenGod; 2]; 5] = [
    [TenGod::Peer, TenGod::Rival],
    [TenGod::OutputGod, TenGod::HurtingOfficer],
    [TenGod::ResourceSeal, TenGod::DirectSeal],
    [TenGod::IndirectWealth, TenGod::DirectWealth],
    [TenGod::SevenKillings, TenGod::DirectOfficer],
];

/// Ten-god category of `other` seen from `day_stem`.
pub fn ten_god(day_stem: Stem, other: Stem) -> TenGod {
    let relation = ElementRelation::between(day_stem.element(), other.element());
    let column = if day_stem.polarity() == other.polarity() { 0 } else { 1 };
    TEN_GOD_MATRIX[relation.row()][column]
}

/// Hidden stems of `branch`, each with its ten god against the day stem.
pub fn hidden_stem_gods(day_stem: Stem, branch: Branch) -> Vec<(Stem, TenGod)> {
    branch
        .hidden_stems()
        .iter()
        .map(|&stem| (stem, ten_god(day_stem, stem)))
        .collect()
}

// ============================================================================
// NA YIN
// ============================================================================

/// Sound element of every pair, by cycle index. Consecutive pairs share.
const NA_YIN: [&str; CYCLE_LEN] = [
    "海中金", "海中金", "炉中火", "炉中火", "大林木", "大林木", "路旁土", "路旁土", "剑锋金", "剑锋金",
    "山头火", "山头火", "涧下水", "涧下水", "城头土", "城头土", "白蜡金", "白蜡金", "杨柳木", "杨柳木",
    "泉中水", "泉中水", "屋上土", "屋上土", "霹雳火", "霹雳火", "松柏木", "松柏木", "长流水", "长流水",
    "沙中金", "沙中金", "山下火", "山下火", "平地木", "平地木", "壁上土", "壁上土", "金箔金", "金箔金",
    "覆灯火", "覆灯火", "天河水", "天河水", "大驿土", "大驿土", "钗环金", "钗环金", "桑柘木", "桑柘木",
    "大溪水", "大溪水", "沙中土", "沙中土", "天上火", "天上火", "石榴木", "石榴木", "大海水", "大海水",
];

pub fn na_yin(pillar: Pillar) -> &'static str {
    NA_YIN[pillar.cycle_index()]
}

// ============================================================================
// ELEMENT TALLY
// ============================================================================

/// Weighted element count: each stem 1.0, each branch 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementTally {
    weights: [f64; 5],
}

impl ElementTally {
    pub fn from_pillars(pillars: &[Pillar]) -> Self {
        let mut weights = [0.0; 5];
        for pillar in pillars {
            weights[pillar.stem().element().index()] += 1.0;
            weights[pillar.branch().element().index()] += 0.5;
        }
        ElementTally { weights }
    }

    pub fn get(&self, element: Element) -> f64 {
        self.weights[element.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.iter().map(move |&e| (e, self.get(e)))
    }
}

// ============================================================================
// VOID BRANCHES
// ============================================================================

/// The two branches left uncovered by the ten-day decade (旬) of `pillar`.
pub fn void_branches(pillar: Pillar) -> [Branch; 2] {
    let decade_start = (pillar.cycle_index() - pillar.stem().index()) as i64;
    [
        Branch::from_index(decade_start + 10),
        Branch::from_index(decade_start + 11),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_stem_is_peer() {
        for stem in Stem::ALL {
            assert_eq!(ten_god(stem, stem), TenGod::Peer);
        }
    }

    #[test]
    fn test_jia_row_matches_classical_table() {
        use TenGod::*;
        let expected = [
            Peer,
            Rival,
            OutputGod,
            HurtingOfficer,
            IndirectWealth,
            DirectWealth,
            SevenKillings,
            DirectOfficer,
            ResourceSeal,
            DirectSeal,
        ];
        for (other, want) in Stem::ALL.iter().zip(expected) {
            assert_eq!(ten_god(Stem::Jia, *other), want, "甲 vs {}", other);
        }
    }

    #[test]
    fn test_yin_day_stem_rows() {
        use TenGod::*;
        // 乙 sees 甲 as 劫财, 丁 as 食神, 丙 as 伤官
        assert_eq!(ten_god(Stem::Yi, Stem::Jia), Rival);
        assert_eq!(ten_god(Stem::Yi, Stem::Ding), OutputGod);
        assert_eq!(ten_god(Stem::Yi, Stem::Bing), HurtingOfficer);
        // 癸 sees 戊 as 正官, 己 as 七杀, 庚 as 正印
        assert_eq!(ten_god(Stem::Gui, Stem::Wu), DirectOfficer);
        assert_eq!(ten_god(Stem::Gui, Stem::Ji), SevenKillings);
        assert_eq!(ten_god(Stem::Gui, Stem::Geng), DirectSeal);
    }

    #[test]
    fn test_polarity_splits_every_relation() {
        for day in Stem::ALL {
            let gods: HashSet<TenGod> = Stem::ALL.iter().map(|&o| ten_god(day, o)).collect();
            assert_eq!(gods.len(), 10, "day stem {}", day);
            assert!(!gods.contains(&TenGod::DayMaster));
        }
    }

    #[test]
    fn test_hidden_stem_gods() {
        let gods = hidden_stem_gods(Stem::Jia, Branch::Yin);
        assert_eq!(
            gods,
            vec![
                (Stem::Jia, TenGod::Peer),
                (Stem::Bing, TenGod::OutputGod),
                (Stem::Wu, TenGod::IndirectWealth),
            ]
        );
    }

    #[test]
    fn test_mismatched_pair_never_reaches_lookups() {
        // 甲丑 has no place on the cycle, so it fails before any table lookup
        let err = Pillar::new(Stem::Jia, Branch::Chou).unwrap_err();
        assert_eq!(err.kind(), "internal_invariant");

        let lookups: Vec<_> = [(Stem::Jia, Branch::Chou), (Stem::Yi, Branch::Zi), (Stem::Yi, Branch::Chou)]
            .into_iter()
            .filter_map(|(s, b)| Pillar::new(s, b).ok())
            .map(|p| (na_yin(p), void_branches(p)))
            .collect();
        assert_eq!(lookups, vec![("海中金", [Branch::Xu, Branch::Hai])]);
    }

    #[test]
    fn test_na_yin_total_and_paired() {
        for (i, pillar) in Pillar::cycle().enumerate() {
            let label = na_yin(pillar);
            assert!(!label.is_empty());
            if i % 2 == 1 {
                assert_eq!(label, na_yin(Pillar::from_cycle_index(i as i64 - 1)));
            }
        }
        let distinct: HashSet<&str> = Pillar::cycle().map(na_yin).collect();
        assert_eq!(distinct.len(), 30);
        assert_eq!(na_yin(Pillar::from_cycle_index(6)), "路旁土"); // 庚午
    }

    #[test]
    fn test_element_tally() {
        let pillars = [
            Pillar::from_cycle_index(0),  // 甲子: wood + water/2
            Pillar::from_cycle_index(26), // 庚寅: metal + wood/2
        ];
        let tally = ElementTally::from_pillars(&pillars);

        assert_eq!(tally.get(Element::Wood), 1.5);
        assert_eq!(tally.get(Element::Metal), 1.0);
        assert_eq!(tally.get(Element::Water), 0.5);
        assert_eq!(tally.iter().map(|(_, w)| w).sum::<f64>(), 3.0);
    }

    #[test]
    fn test_void_branches() {
        // 甲子 decade leaves 戌亥 empty, 甲戌 leaves 申酉
        assert_eq!(void_branches(Pillar::from_cycle_index(0)), [Branch::Xu, Branch::Hai]);
        assert_eq!(void_branches(Pillar::from_cycle_index(5)), [Branch::Xu, Branch::Hai]);
        assert_eq!(void_branches(Pillar::from_cycle_index(10)), [Branch::Shen, Branch::You]);
        assert_eq!(void_branches(Pillar::from_cycle_index(59)), [Branch::Zi, Branch::Chou]);
    }
}
