// 📜 Chart Assembler - pillars + attributes + lunar date in one value
//
// A chart is computed in one pass and never mutated afterwards.
// Display strings are not produced here; see `report`.

use chrono::NaiveDateTime;

use crate::attributes::{hidden_stem_gods, na_yin, ten_god, void_branches, ElementTally, TenGod};
use crate::calendar::{CalendarProvider, LunarDate};
use crate::error::ChartResult;
use crate::markers::{pillar_markers, Marker};
use crate::pillars::{derive_pillars, Pillars, EPOCH_YEAR};
use crate::solar_time::DEFAULT_REFERENCE_MERIDIAN;
use crate::symbols::{Branch, Element, Pillar, Stem};

// ============================================================================
// INPUT
// ============================================================================

/// A validated birth moment: civil clock time on the reference meridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthMoment {
    pub civil: NaiveDateTime,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSettings {
    pub reference_meridian: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            reference_meridian: DEFAULT_REFERENCE_MERIDIAN,
        }
    }
}

// ============================================================================
// CHART
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Year,
    Month,
    Day,
    Hour,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::Year, Position::Month, Position::Day, Position::Hour];
}

/// One pillar with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarDetail {
    pub position: Position,
    pub pillar: Pillar,
    pub stem_element: Element,
    pub branch_element: Element,
    /// `TenGod::DayMaster` for the day pillar.
    pub ten_god: TenGod,
    /// Main qi first.
    pub hidden_stems: Vec<(Stem, TenGod)>,
    pub na_yin: &'static str,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub pillars: [PillarDetail; 4],
    pub civil_time: NaiveDateTime,
    pub longitude: f64,
    pub true_solar_time: NaiveDateTime,
    pub hour_branch: Branch,
    pub solar_month: u32,
    pub lunar_date: LunarDate,
    pub zodiac: Branch,
    pub element_tally: ElementTally,
    pub void_branches: [Branch; 2],
}

impl Chart {
    pub fn pillar(&self, position: Position) -> &PillarDetail {
        &self.pillars[position as usize]
    }

    pub fn day_master(&self) -> Stem {
        self.pillar(Position::Day).pillar.stem()
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

pub struct ChartBuilder<P> {
    provider: P,
    settings: ChartSettings,
}

impl<P: CalendarProvider> ChartBuilder<P> {
    pub fn new(provider: P) -> Self {
        ChartBuilder {
            provider,
            settings: ChartSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ChartSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn build(&self, moment: &BirthMoment) -> ChartResult<Chart> {
        compute_chart(moment, &self.settings, &self.provider)
    }
}

/// Derive a complete chart. Makes one solar-term and one lunar-date call.
pub fn compute_chart<P: CalendarProvider + ?Sized>(
    moment: &BirthMoment,
    settings: &ChartSettings,
    provider: &P,
) -> ChartResult<Chart> {
    let derived = derive_pillars(moment.civil, moment.longitude, settings.reference_meridian, provider)?;
    let lunar_date = provider.lunar_date(moment.civil.date()).map_err(|e| {
        tracing::warn!(error = %e, "lunar date lookup failed");
        e
    })?;

    Ok(assemble(&derived, lunar_date, moment))
}

fn assemble(derived: &Pillars, lunar_date: LunarDate, moment: &BirthMoment) -> Chart {
    let pillars = [derived.year, derived.month, derived.day, derived.hour];
    let day_stem = derived.day.stem();
    let mut markers = pillar_markers(day_stem, &pillars);

    let details = std::array::from_fn(|i| {
        let position = Position::ALL[i];
        let pillar = pillars[i];
        let ten_god = match position {
            Position::Day => TenGod::DayMaster,
            _ => ten_god(day_stem, pillar.stem()),
        };
        PillarDetail {
            position,
            pillar,
            stem_element: pillar.stem().element(),
            branch_element: pillar.branch().element(),
            ten_god,
            hidden_stems: hidden_stem_gods(day_stem, pillar.branch()),
            na_yin: na_yin(pillar),
            markers: std::mem::take(&mut markers[i]),
        }
    });

    Chart {
        pillars: details,
        civil_time: moment.civil,
        longitude: moment.longitude,
        true_solar_time: derived.true_solar_time.moment,
        hour_branch: derived.hour_branch,
        solar_month: derived.solar_month,
        lunar_date,
        zodiac: Branch::from_index(lunar_date.year as i64 - EPOCH_YEAR as i64),
        element_tally: ElementTally::from_pillars(&pillars),
        void_branches: void_branches(derived.day),
    }
}
