// 🗂️ Table Calendar - CSV-backed CalendarProvider
//
// Two data files, both produced offline from a real ephemeris:
//
//   solar_terms.csv    year,term,instant
//                      1990,立春,1990-02-04 10:14:00     (term: index 0..23 or name)
//
//   lunar_months.csv   lunar_year,month,leap,start
//                      1990,1,false,1990-01-27
//
// Lunar month rows give the civil date of each month's first day. The last
// row only closes the table: dates on or after it are out of range. Rows
// need not be contiguous; a date more than 30 days past the latest month
// start falls in a gap and is out of range.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::calendar::{CalendarError, CalendarProvider, LunarDate, SolarTerm, SolarTermTable};

const MAX_MONTH_DAYS: i64 = 30;

// ============================================================================
// RAW RECORDS
// ============================================================================

#[derive(Debug, Deserialize)]
struct SolarTermRecord {
    year: i32,
    term: String,
    instant: String,
}

#[derive(Debug, Deserialize)]
struct LunarMonthRecord {
    lunar_year: i32,
    month: u32,
    leap: bool,
    start: NaiveDate,
}

/// First civil day of one lunar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarMonthStart {
    pub lunar_year: i32,
    pub month: u32,
    pub leap: bool,
    pub start: NaiveDate,
}

// ============================================================================
// TABLE CALENDAR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TableCalendar {
    terms: BTreeMap<i32, SolarTermTable>,
    months: Vec<LunarMonthStart>,
}

impl TableCalendar {
    /// Build from already-validated tables.
    pub fn new(terms: Vec<SolarTermTable>, months: Vec<LunarMonthStart>) -> Result<Self, CalendarError> {
        validate_months("lunar_months", &months)?;
        Ok(TableCalendar {
            terms: terms.into_iter().map(|t| (t.year(), t)).collect(),
            months,
        })
    }

    pub fn from_paths(solar_terms: &Path, lunar_months: &Path) -> Result<Self, CalendarError> {
        let open = |path: &Path| {
            File::open(path).map_err(|e| CalendarError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        };
        let terms = parse_solar_terms(&path_label(solar_terms), open(solar_terms)?)?;
        let months = parse_lunar_months(&path_label(lunar_months), open(lunar_months)?)?;

        tracing::info!(
            years = terms.len(),
            months = months.len(),
            "loaded calendar tables"
        );
        TableCalendar::new(terms, months)
    }

    pub fn from_readers<T: Read, M: Read>(solar_terms: T, lunar_months: M) -> Result<Self, CalendarError> {
        let terms = parse_solar_terms("solar_terms", solar_terms)?;
        let months = parse_lunar_months("lunar_months", lunar_months)?;
        TableCalendar::new(terms, months)
    }

    /// Civil years with solar-term data, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.terms.keys().copied()
    }
}

impl CalendarProvider for TableCalendar {
    fn solar_term_instant(&self, year: i32, term: SolarTerm) -> Result<NaiveDateTime, CalendarError> {
        self.terms
            .get(&year)
            .map(|table| table.instant(term))
            .ok_or(CalendarError::MissingYear(year))
    }

    fn solar_terms(&self, year: i32) -> Result<SolarTermTable, CalendarError> {
        self.terms.get(&year).cloned().ok_or(CalendarError::MissingYear(year))
    }

    fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
        let idx = self.months.partition_point(|m| m.start <= date);
        if idx == 0 || idx == self.months.len() {
            return Err(CalendarError::DateOutOfRange(date));
        }

        let month = &self.months[idx - 1];
        let day = (date - month.start).num_days() + 1;
        // Lunar months run 29 or 30 days; anything longer is a gap in the table
        if day > MAX_MONTH_DAYS {
            return Err(CalendarError::DateOutOfRange(date));
        }
        Ok(LunarDate {
            year: month.lunar_year,
            month: month.month,
            day: day as u32,
            leap: month.leap,
        })
    }
}

// ============================================================================
// PARSING
// ============================================================================

fn path_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_solar_terms<R: Read>(label: &str, reader: R) -> Result<Vec<SolarTermTable>, CalendarError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| CalendarError::malformed(label, 1, e.to_string()))?
        .clone();

    let mut years: BTreeMap<i32, [Option<NaiveDateTime>; 24]> = BTreeMap::new();

    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(label, &e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: SolarTermRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| CalendarError::malformed(label, line, e.to_string()))?;

        let term = parse_term(&row.term)
            .ok_or_else(|| CalendarError::malformed(label, line, format!("unknown solar term {:?}", row.term)))?;
        let instant = parse_instant(&row.instant)
            .ok_or_else(|| CalendarError::malformed(label, line, format!("bad instant {:?}", row.instant)))?;

        let slot = &mut years.entry(row.year).or_insert([None; 24])[term.index()];
        if slot.is_some() {
            return Err(CalendarError::malformed(
                label,
                line,
                format!("duplicate {} for {}", term, row.year),
            ));
        }
        *slot = Some(instant);
    }

    years
        .into_iter()
        .map(|(year, slots)| {
            let mut instants = Vec::with_capacity(SolarTerm::COUNT);
            for (term, slot) in SolarTerm::ALL.iter().zip(slots) {
                instants.push(slot.ok_or(CalendarError::MissingTerm { year, term: *term })?);
            }
            let instants: [NaiveDateTime; 24] = instants
                .try_into()
                .map_err(|_| CalendarError::MissingYear(year))?;
            SolarTermTable::new(year, instants)
        })
        .collect()
}

fn parse_lunar_months<R: Read>(label: &str, reader: R) -> Result<Vec<LunarMonthStart>, CalendarError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut months = Vec::new();

    for result in rdr.deserialize() {
        let row: LunarMonthRecord = result.map_err(|e| csv_error(label, &e))?;
        months.push(LunarMonthStart {
            lunar_year: row.lunar_year,
            month: row.month,
            leap: row.leap,
            start: row.start,
        });
    }

    validate_months(label, &months)?;
    Ok(months)
}

fn validate_months(label: &str, months: &[LunarMonthStart]) -> Result<(), CalendarError> {
    // Header is line 1, first row line 2
    for (i, m) in months.iter().enumerate() {
        let line = i as u64 + 2;
        if !(1..=12).contains(&m.month) {
            return Err(CalendarError::malformed(label, line, format!("month {} not in 1..=12", m.month)));
        }
        if i > 0 && months[i - 1].start >= m.start {
            return Err(CalendarError::malformed(label, line, "month starts must increase"));
        }
    }
    Ok(())
}

fn parse_term(raw: &str) -> Option<SolarTerm> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(index) => SolarTerm::from_index(index),
        Err(_) => SolarTerm::ALL.iter().find(|t| t.symbol() == raw).copied(),
    }
}

fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn csv_error(label: &str, err: &csv::Error) -> CalendarError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CalendarError::malformed(label, line, err.to_string())
}
