// ☯️ Sexagenary Cycle Engine - four pillars from one moment
//
// Year  → flips at Start of Spring (立春), not January 1
// Month → solar month from the sectional terms, stem from the year stem
// Day   → plain day count against a fixed 甲戌 reference day
// Hour  → two-hour windows starting 23:00, stem from the day stem
//
// Every pillar is read off the true-solar moment. The solar-term table of
// that moment's civil year is fetched exactly once per derivation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::calendar::{CalendarProvider, SolarTerm, SolarTermTable};
use crate::error::{ChartError, ChartResult};
use crate::solar_time::TrueSolarTime;
use crate::symbols::{Branch, Pillar, Stem};

// ============================================================================
// FIXED TABLES
// ============================================================================

/// A 甲子 year: year-pillar index 0.
pub const EPOCH_YEAR: i32 = 1864;

/// 1900-01-01 as days from the common era (0001-01-01 = 1).
pub const DAY_REFERENCE: i32 = 693_596;

/// Day pillar of the reference day is 甲戌, index 10.
pub const DAY_REFERENCE_OFFSET: i64 = 10;

/// Solar month 1 is always a 寅 month.
pub const FIRST_MONTH_BRANCH: Branch = Branch::Yin;

/// 五虎遁: stem of solar month 1, keyed by year stem group (甲己, 乙庚, 丙辛, 丁壬, 戊癸).
const MONTH_STEM_START: [Stem; 5] = [Stem::Bing, Stem::Wu, Stem::Geng, Stem::Ren, Stem::Jia];

/// 五鼠遁: stem of the 子 hour, keyed by day stem group (甲己, 乙庚, 丙辛, 丁壬, 戊癸).
const HOUR_STEM_START: [Stem; 5] = [Stem::Jia, Stem::Bing, Stem::Wu, Stem::Geng, Stem::Ren];

const SECONDS_PER_HOUR_BRANCH: u32 = 2 * 3600;

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Pillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    pub true_solar_time: TrueSolarTime,
    pub hour_branch: Branch,
    /// Solar month number, 1 = 寅 month.
    pub solar_month: u32,
    /// Civil year whose Start of Spring opened the sexagenary year.
    pub sexagenary_year: i32,
}

// ============================================================================
// DERIVATION
// ============================================================================

/// Derive the four pillars of a civil moment at `longitude`.
///
/// `civil` is clock time on `reference_meridian`. Fails if the provider has
/// no solar-term data for the true-solar moment's civil year.
pub fn derive_pillars<P: CalendarProvider + ?Sized>(
    civil: NaiveDateTime,
    longitude: f64,
    reference_meridian: f64,
    provider: &P,
) -> ChartResult<Pillars> {
    let true_solar_time = TrueSolarTime::normalize(civil, longitude, reference_meridian)?;
    let moment = true_solar_time.moment;

    let terms = provider.solar_terms(moment.year()).map_err(|e| {
        tracing::warn!(error = %e, "solar-term lookup failed");
        ChartError::from(e)
    })?;

    let sexagenary_year = sexagenary_year(moment, &terms)?;
    let year = year_pillar(sexagenary_year);
    let solar_month = solar_month(moment, &terms)?;
    let month = month_pillar(year.stem(), solar_month)?;
    let day = day_pillar(moment.date());
    let hour_branch = hour_branch(moment.time());
    let hour = hour_pillar(day.stem(), hour_branch)?;

    tracing::debug!(
        %civil,
        longitude,
        offset_minutes = true_solar_time.offset_minutes,
        %moment,
        year = %year,
        month = %month,
        day = %day,
        hour = %hour,
        "derived pillars"
    );

    Ok(Pillars {
        year,
        month,
        day,
        hour,
        true_solar_time,
        hour_branch,
        solar_month,
        sexagenary_year,
    })
}

/// Civil year that names the sexagenary year containing `moment`.
pub fn sexagenary_year(moment: NaiveDateTime, terms: &SolarTermTable) -> ChartResult<i32> {
    check_table_year(moment, terms)?;
    if moment < terms.start_of_spring() {
        Ok(terms.year() - 1)
    } else {
        Ok(terms.year())
    }
}

pub fn year_pillar(sexagenary_year: i32) -> Pillar {
    Pillar::from_cycle_index(sexagenary_year as i64 - EPOCH_YEAR as i64)
}

/// Solar month (1..=12) containing `moment`. Windows are `[start, end)`.
///
/// Month n (1..=11) opens at sectional term 2n of the civil year; month 12
/// opens at Minor Cold. Before Minor Cold the moment is still in month 11,
/// opened by Major Snow of the previous civil year.
pub fn solar_month(moment: NaiveDateTime, terms: &SolarTermTable) -> ChartResult<u32> {
    check_table_year(moment, terms)?;

    if moment < terms.instant(SolarTerm::MinorCold) {
        return Ok(11);
    }
    if moment < terms.instant(SolarTerm::StartOfSpring) {
        return Ok(12);
    }

    let month = (1..=11u32)
        .rev()
        .find(|&n| {
            SolarTerm::from_index(2 * n as usize)
                .map(|term| terms.instant(term) <= moment)
                .unwrap_or(false)
        })
        .ok_or_else(|| ChartError::invariant(format!("no solar month contains {}", moment)))?;
    Ok(month)
}

pub fn month_pillar(year_stem: Stem, solar_month: u32) -> ChartResult<Pillar> {
    if !(1..=12).contains(&solar_month) {
        return Err(ChartError::invariant(format!("solar month {} not in 1..=12", solar_month)));
    }
    let steps = solar_month as i64 - 1;
    let start = MONTH_STEM_START[year_stem.index() % 5];
    Pillar::new(start.advance(steps), FIRST_MONTH_BRANCH.advance(steps))
}

pub fn day_pillar(date: NaiveDate) -> Pillar {
    let days = (date.num_days_from_ce() - DAY_REFERENCE) as i64;
    Pillar::from_cycle_index(days + DAY_REFERENCE_OFFSET)
}

/// Branch k covers `[(2k-1):00, (2k+1):00)`; 子 wraps midnight.
pub fn hour_branch(time: NaiveTime) -> Branch {
    let shifted = time.num_seconds_from_midnight() + 3600;
    Branch::from_index((shifted / SECONDS_PER_HOUR_BRANCH) as i64)
}

pub fn hour_pillar(day_stem: Stem, hour_branch: Branch) -> ChartResult<Pillar> {
    let start = HOUR_STEM_START[day_stem.index() % 5];
    Pillar::new(start.advance(hour_branch.index() as i64), hour_branch)
}

fn check_table_year(moment: NaiveDateTime, terms: &SolarTermTable) -> ChartResult<()> {
    if moment.year() != terms.year() {
        return Err(ChartError::invariant(format!(
            "solar terms of {} used for a moment in {}",
            terms.year(),
            moment.year()
        )));
    }
    Ok(())
}
