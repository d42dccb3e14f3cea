// 📅 Calendar Provider boundary
//
// The pillar engine never computes astronomy. Everything it needs from the
// sky arrives through `CalendarProvider`:
// - the 24 solar-term instants of a civil year
// - the lunisolar date of a civil day
//
// All instants are civil time on the reference meridian (UTC+8).

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use thiserror::Error;

// ============================================================================
// SOLAR TERMS
// ============================================================================

/// The 24 solar terms (节气) in civil-year order, so every term of year Y
/// falls inside year Y. Even indices are the sectional terms (节) that open
/// the solar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolarTerm {
    MinorCold,
    MajorCold,
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
    SpringEquinox,
    PureBrightness,
    GrainRain,
    StartOfSummer,
    GrainBuds,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
}

impl SolarTerm {
    pub const COUNT: usize = 24;

    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::MinorCold,
        SolarTerm::MajorCold,
        SolarTerm::StartOfSpring,
        SolarTerm::RainWater,
        SolarTerm::AwakeningOfInsects,
        SolarTerm::SpringEquinox,
        SolarTerm::PureBrightness,
        SolarTerm::GrainRain,
        SolarTerm::StartOfSummer,
        SolarTerm::GrainBuds,
        SolarTerm::GrainInEar,
        SolarTerm::SummerSolstice,
        SolarTerm::MinorHeat,
        SolarTerm::MajorHeat,
        SolarTerm::StartOfAutumn,
        SolarTerm::EndOfHeat,
        SolarTerm::WhiteDew,
        SolarTerm::AutumnEquinox,
        SolarTerm::ColdDew,
        SolarTerm::FrostDescent,
        SolarTerm::StartOfWinter,
        SolarTerm::MinorSnow,
        SolarTerm::MajorSnow,
        SolarTerm::WinterSolstice,
    ];

    const SYMBOLS: [&'static str; 24] = [
        "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种",
        "夏至", "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪",
        "大雪", "冬至",
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<SolarTerm> {
        SolarTerm::ALL.get(index).copied()
    }

    pub fn symbol(&self) -> &'static str {
        SolarTerm::SYMBOLS[self.index()]
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// All 24 term instants of one civil year, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarTermTable {
    year: i32,
    instants: [NaiveDateTime; 24],
}

impl SolarTermTable {
    pub fn new(year: i32, instants: [NaiveDateTime; 24]) -> Result<Self, CalendarError> {
        for (i, pair) in instants.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(CalendarError::OutOfOrder {
                    year,
                    term: SolarTerm::ALL[i + 1],
                });
            }
        }
        Ok(SolarTermTable { year, instants })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn instant(&self, term: SolarTerm) -> NaiveDateTime {
        self.instants[term.index()]
    }

    pub fn start_of_spring(&self) -> NaiveDateTime {
        self.instant(SolarTerm::StartOfSpring)
    }
}

// ============================================================================
// LUNAR DATE
// ============================================================================

/// Lunisolar calendar date as supplied by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub leap: bool,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("no solar-term data for civil year {0}")]
    MissingYear(i32),

    #[error("no instant for solar term {term} of civil year {year}")]
    MissingTerm { year: i32, term: SolarTerm },

    #[error("solar term {term} of civil year {year} is not after the preceding term")]
    OutOfOrder { year: i32, term: SolarTerm },

    #[error("no lunar calendar data covering {0}")]
    DateOutOfRange(NaiveDate),

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("{source_name} line {line}: {message}")]
    Malformed {
        source_name: String,
        line: u64,
        message: String,
    },
}

impl CalendarError {
    pub fn malformed(source_name: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        CalendarError::Malformed {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Which lookup failed, in `kind:key` form.
    pub fn boundary(&self) -> Option<String> {
        match self {
            CalendarError::MissingYear(year) => Some(format!("solar_terms:{}", year)),
            CalendarError::MissingTerm { year, term } | CalendarError::OutOfOrder { year, term } => {
                Some(format!("solar_terms:{}:{}", year, term))
            }
            CalendarError::DateOutOfRange(date) => Some(format!("lunar_date:{}", date)),
            CalendarError::Io { path, .. } => Some(path.clone()),
            CalendarError::Malformed { source_name, line, .. } => {
                Some(format!("{}:{}", source_name, line))
            }
        }
    }
}

// ============================================================================
// PROVIDER TRAIT
// ============================================================================

pub trait CalendarProvider {
    /// Instant of `term` in civil year `year`.
    fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError>;

    /// Lunisolar date of a civil day.
    fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError>;

    fn start_of_spring(&self, year: i32) -> Result<NaiveDateTime, CalendarError> {
        self.solar_term_instant(year, SolarTerm::StartOfSpring)
    }

    fn solar_terms(&self, year: i32) -> Result<SolarTermTable, CalendarError> {
        let instants = SolarTerm::ALL
            .iter()
            .map(|&term| self.solar_term_instant(year, term))
            .collect::<Result<Vec<_>, _>>()?;
        let instants: [NaiveDateTime; 24] = instants
            .try_into()
            .map_err(|_| CalendarError::MissingYear(year))?;
        SolarTermTable::new(year, instants)
    }
}

impl<P: CalendarProvider + ?Sized> CalendarProvider for &P {
    fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError> {
        (**self).solar_term_instant(year, term)
    }

    fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
        (**self).lunar_date(date)
    }

    fn solar_terms(&self, year: i32) -> Result<SolarTermTable, CalendarError> {
        (**self).solar_terms(year)
    }
}

impl<P: CalendarProvider + ?Sized> CalendarProvider for Arc<P> {
    fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError> {
        (**self).solar_term_instant(year, term)
    }

    fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
        (**self).lunar_date(date)
    }

    fn solar_terms(&self, year: i32) -> Result<SolarTermTable, CalendarError> {
        (**self).solar_terms(year)
    }
}

// ============================================================================
// CACHED PROVIDER
// ============================================================================

/// Memoises solar-term tables per civil year. The tables are a pure
/// function of the year, so entries never expire.
pub struct CachedCalendar<P> {
    inner: P,
    terms: Arc<RwLock<HashMap<i32, SolarTermTable>>>,
}

impl<P: CalendarProvider> CachedCalendar<P> {
    pub fn new(inner: P) -> Self {
        CachedCalendar {
            inner,
            terms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn cached_years(&self) -> usize {
        self.terms.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<P: CalendarProvider> CalendarProvider for CachedCalendar<P> {
    fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError> {
        Ok(self.solar_terms(year)?.instant(term))
    }

    fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
        self.inner.lunar_date(date)
    }

    fn solar_terms(&self, year: i32) -> Result<SolarTermTable, CalendarError> {
        if let Some(table) = self.terms.read().unwrap_or_else(|e| e.into_inner()).get(&year) {
            return Ok(table.clone());
        }

        let table = self.inner.solar_terms(year)?;
        self.terms
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(year, table.clone());
        tracing::debug!(year, "cached solar-term table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Evenly spaced synthetic terms: term i at Jan 6 + 15.2 days * i.
    struct Evenly {
        calls: Cell<usize>,
    }

    impl CalendarProvider for Evenly {
        fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError> {
            self.calls.set(self.calls.get() + 1);
            if year < 1900 {
                return Err(CalendarError::MissingYear(year));
            }
            let base = NaiveDate::from_ymd_opt(year, 1, 6)
                .ok_or(CalendarError::MissingYear(year))?
                .and_hms_opt(0, 0, 0)
                .ok_or(CalendarError::MissingYear(year))?;
            Ok(base + chrono::Duration::hours(365 * term.index() as i64))
        }

        fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
            Err(CalendarError::DateOutOfRange(date))
        }
    }

    #[test]
    fn test_term_order() {
        assert_eq!(SolarTerm::StartOfSpring.index(), 2);
        assert_eq!(SolarTerm::from_index(23), Some(SolarTerm::WinterSolstice));
        assert_eq!(SolarTerm::from_index(24), None);
        assert_eq!(SolarTerm::MajorSnow.to_string(), "大雪");
    }

    #[test]
    fn test_default_solar_terms_collects_all() {
        let provider = Evenly { calls: Cell::new(0) };
        let table = provider.solar_terms(2000).unwrap();

        assert_eq!(table.year(), 2000);
        assert_eq!(provider.calls.get(), 24);
        assert!(table.instant(SolarTerm::MinorCold) < table.start_of_spring());
    }

    #[test]
    fn test_table_rejects_unordered_instants() {
        let t = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let err = SolarTermTable::new(2000, [t; 24]).unwrap_err();
        assert_eq!(
            err,
            CalendarError::OutOfOrder {
                year: 2000,
                term: SolarTerm::MajorCold
            }
        );
    }

    #[test]
    fn test_cache_calls_inner_once_per_year() {
        let cached = CachedCalendar::new(Evenly { calls: Cell::new(0) });

        cached.solar_terms(2001).unwrap();
        cached.start_of_spring(2001).unwrap();
        cached.solar_term_instant(2001, SolarTerm::WinterSolstice).unwrap();

        assert_eq!(cached.inner.calls.get(), 24);
        assert_eq!(cached.cached_years(), 1);
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let cached = CachedCalendar::new(Evenly { calls: Cell::new(0) });

        assert_eq!(cached.solar_terms(1850).unwrap_err(), CalendarError::MissingYear(1850));
        assert_eq!(cached.cached_years(), 0);
    }

    #[test]
    fn test_boundary_labels() {
        assert_eq!(
            CalendarError::MissingTerm { year: 1999, term: SolarTerm::StartOfSpring }.boundary(),
            Some("solar_terms:1999:立春".to_string())
        );
        assert_eq!(
            CalendarError::DateOutOfRange(NaiveDate::from_ymd_opt(2100, 1, 1).unwrap()).boundary(),
            Some("lunar_date:2100-01-01".to_string())
        );
    }
}
