// Shared test fixtures: a small calendar with approximate solar terms.
//
// The term instants are the usual civil dates of each term at noon. They
// are close to (not equal to) real ephemeris values, which is all the
// engine tests need. Lunar month starts are real for the covered spans.

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::{SolarTerm, SolarTermTable};
use crate::calendar_table::{LunarMonthStart, TableCalendar};

/// (month, day) of each term, civil-year order.
const TERM_DATES: [(u32, u32); 24] = [
    (1, 6), (1, 20), (2, 4), (2, 19), (3, 6), (3, 21),
    (4, 5), (4, 20), (5, 6), (5, 21), (6, 6), (6, 21),
    (7, 7), (7, 23), (8, 8), (8, 23), (9, 8), (9, 23),
    (10, 8), (10, 23), (11, 7), (11, 22), (12, 7), (12, 22),
];

const LUNAR_MONTHS: &[(i32, u32, bool, (i32, u32, u32))] = &[
    (1989, 11, false, (1989, 11, 28)),
    (1989, 12, false, (1989, 12, 28)),
    (1990, 1, false, (1990, 1, 27)),
    (1990, 2, false, (1990, 2, 25)),
    (1990, 3, false, (1990, 3, 27)),
    (1990, 4, false, (1990, 4, 25)),
    (1990, 5, false, (1990, 5, 24)),
    (1990, 5, true, (1990, 6, 23)),
    (1990, 6, false, (1990, 7, 22)),
    (1990, 7, false, (1990, 8, 20)),
    (1999, 11, false, (1999, 12, 8)),
    (1999, 12, false, (2000, 1, 7)),
    (2000, 1, false, (2000, 2, 5)),
    (2000, 2, false, (2000, 3, 6)),
    (2000, 3, false, (2000, 4, 5)),
    (2000, 4, false, (2000, 5, 4)),
    (2000, 5, false, (2000, 6, 2)),
    (2000, 6, false, (2000, 7, 2)),
    (2000, 7, false, (2000, 7, 31)),
    (2000, 8, false, (2000, 8, 29)),
    (2000, 9, false, (2000, 9, 28)),
    (2000, 10, false, (2000, 10, 27)),
    (2000, 11, false, (2000, 11, 26)),
    (2000, 12, false, (2000, 12, 26)),
];

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

pub fn approximate_terms(year: i32) -> SolarTermTable {
    let instants: Vec<NaiveDateTime> = SolarTerm::ALL
        .iter()
        .map(|term| {
            let (m, d) = TERM_DATES[term.index()];
            at(year, m, d, 12, 0)
        })
        .collect();
    SolarTermTable::new(year, instants.try_into().unwrap()).unwrap()
}

/// Solar terms for 1985..=2030, lunar months around 1990 and 2000.
pub fn sample_calendar() -> TableCalendar {
    let terms = (1985..=2030).map(approximate_terms).collect();
    let months = LUNAR_MONTHS
        .iter()
        .map(|&(lunar_year, month, leap, (y, m, d))| LunarMonthStart {
            lunar_year,
            month,
            leap,
            start: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        })
        .collect();
    TableCalendar::new(terms, months).unwrap()
}
