// ✨ Auspicious Markers (神煞) - rules as data
//
// Two rule shapes:
// - day-stem keyed: the day stem names qualifying branches, and every
//   pillar whose branch is among them carries the marker
// - branch keyed: each pillar's own branch is looked up in the table and
//   compared against itself
//
// The branch-keyed shape is kept exactly as the source rule set states it.
// With the current tables no branch maps to itself, so those markers never
// fire; they stay so that data corrections need no code change.

use std::fmt;

use crate::symbols::{Branch, Pillar, Stem};

// ============================================================================
// MARKERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    NobleMan,
    HeavenlyNoble,
    Scholar,
    CanopyStar,
    PeachBlossom,
    TravelHorse,
}

impl Marker {
    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::NobleMan => "贵人",
            Marker::HeavenlyNoble => "天乙贵人",
            Marker::Scholar => "文昌",
            Marker::CanopyStar => "华盖",
            Marker::PeachBlossom => "桃花",
            Marker::TravelHorse => "驿马",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// RULE TABLES
// ============================================================================

use Branch::*;

/// Day stem → qualifying branches, indexed by stem.
type StemKeyed = [&'static [Branch]; 10];

/// Branch → mapped branch, indexed by branch.
type BranchKeyed = [Branch; 12];

const NOBLE_MAN: StemKeyed = [
    &[Chou, Wei], &[Zi, Shen], &[Hai, You], &[Hai, You], &[Chou, Wei],
    &[Zi, Shen], &[Chou, Wei], &[Zi, Shen], &[Mao, Si], &[Mao, Si],
];

const HEAVENLY_NOBLE: StemKeyed = [
    &[Si, Shen], &[Wu, You], &[Shen, Hai], &[You, Zi], &[Shen, Hai],
    &[You, Zi], &[Hai, Yin], &[Zi, Mao], &[Yin, Si], &[Mao, Wu],
];

const SCHOLAR: StemKeyed = [
    &[Si], &[Wu], &[Shen], &[You], &[Shen],
    &[You], &[Hai], &[Zi], &[Yin], &[Mao],
];

const CANOPY_STAR: BranchKeyed = [Wei, Wu, Si, Chen, Mao, Yin, Chou, Zi, Hai, Xu, You, Shen];

const PEACH_BLOSSOM: BranchKeyed = [You, Chen, Hai, Wu, Chou, Shen, Mao, Xu, Si, Zi, Wei, Yin];

const TRAVEL_HORSE: BranchKeyed = [Yin, Hai, Shen, Si, Yin, Hai, Shen, Si, Yin, Hai, Shen, Si];

#[derive(Debug, Clone, Copy)]
enum MarkerRule {
    DayStem(&'static StemKeyed),
    OwnBranch(&'static BranchKeyed),
}

impl MarkerRule {
    fn applies(&self, day_stem: Stem, branch: Branch) -> bool {
        match self {
            MarkerRule::DayStem(table) => table[day_stem.index()].contains(&branch),
            MarkerRule::OwnBranch(table) => table[branch.index()] == branch,
        }
    }
}

/// Evaluation order; also the order markers are reported in.
const RULES: [(Marker, MarkerRule); 6] = [
    (Marker::NobleMan, MarkerRule::DayStem(&NOBLE_MAN)),
    (Marker::HeavenlyNoble, MarkerRule::DayStem(&HEAVENLY_NOBLE)),
    (Marker::Scholar, MarkerRule::DayStem(&SCHOLAR)),
    (Marker::CanopyStar, MarkerRule::OwnBranch(&CANOPY_STAR)),
    (Marker::PeachBlossom, MarkerRule::OwnBranch(&PEACH_BLOSSOM)),
    (Marker::TravelHorse, MarkerRule::OwnBranch(&TRAVEL_HORSE)),
];

// ============================================================================
// EVALUATION
// ============================================================================

/// Markers carried by a pillar with `branch`, given the chart's day stem.
pub fn markers_for(day_stem: Stem, branch: Branch) -> Vec<Marker> {
    RULES
        .iter()
        .filter(|(_, rule)| rule.applies(day_stem, branch))
        .map(|(marker, _)| *marker)
        .collect()
}

/// Marker set of each pillar, in input order.
pub fn pillar_markers(day_stem: Stem, pillars: &[Pillar; 4]) -> [Vec<Marker>; 4] {
    std::array::from_fn(|i| markers_for(day_stem, pillars[i].branch()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_stem_keyed_markers() {
        // 甲 day: 丑/未 are 贵人
        assert_eq!(markers_for(Stem::Jia, Chou), vec![Marker::NobleMan]);
        // 甲 day: 巳 is both 天乙贵人 and 文昌
        assert_eq!(
            markers_for(Stem::Jia, Si),
            vec![Marker::HeavenlyNoble, Marker::Scholar]
        );
        // 甲 day: 申 is 天乙贵人 only
        assert_eq!(markers_for(Stem::Jia, Shen), vec![Marker::HeavenlyNoble]);
        assert!(markers_for(Stem::Jia, Zi).is_empty());
    }

    #[test]
    fn test_multiple_markers_on_one_pillar() {
        // 丁 day: 酉 is 贵人, 天乙贵人 and 文昌
        assert_eq!(
            markers_for(Stem::Ding, You),
            vec![Marker::NobleMan, Marker::HeavenlyNoble, Marker::Scholar]
        );
    }

    #[test]
    fn test_branch_keyed_markers_compare_branch_with_itself() {
        for table in [&CANOPY_STAR, &PEACH_BLOSSOM, &TRAVEL_HORSE] {
            assert!(Branch::ALL.iter().all(|b| table[b.index()] != *b));
        }
        for stem in Stem::ALL {
            for branch in Branch::ALL {
                let markers = markers_for(stem, branch);
                assert!(!markers.contains(&Marker::CanopyStar));
                assert!(!markers.contains(&Marker::PeachBlossom));
                assert!(!markers.contains(&Marker::TravelHorse));
            }
        }
    }

    #[test]
    fn test_every_pillar_is_tested_including_day() {
        let pillars = [
            Pillar::new(Stem::Ji, Chou).unwrap(),
            Pillar::new(Stem::Bing, Zi).unwrap(),
            Pillar::new(Stem::Ding, Wei).unwrap(),
            Pillar::new(Stem::Ji, Si).unwrap(),
        ];
        let markers = pillar_markers(Stem::Jia, &pillars);

        assert_eq!(markers[0], vec![Marker::NobleMan]);
        assert!(markers[1].is_empty());
        assert_eq!(markers[2], vec![Marker::NobleMan]);
        assert_eq!(markers[3], vec![Marker::HeavenlyNoble, Marker::Scholar]);
    }
}
