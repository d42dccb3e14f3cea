// BaZi Chart - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod symbols;        // Stems, branches, elements, pillars
pub mod solar_time;     // Temporal Normalizer
pub mod calendar;       // Calendar provider boundary + per-year cache
pub mod calendar_table; // CSV-backed calendar provider
pub mod pillars;        // Sexagenary Cycle Engine
pub mod attributes;     // Ten gods, Na Yin, tally, voids
pub mod markers;        // Auspicious markers (神煞)
pub mod chart;          // Chart Assembler
pub mod report;         // Serialized chart
pub mod request;        // Wire request + validation
pub mod error;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use symbols::{Branch, Element, Pillar, Polarity, Stem, CYCLE_LEN};
pub use solar_time::{TrueSolarTime, DEFAULT_REFERENCE_MERIDIAN};
pub use calendar::{
    CachedCalendar, CalendarError, CalendarProvider, LunarDate, SolarTerm, SolarTermTable,
};
pub use calendar_table::{LunarMonthStart, TableCalendar};
pub use pillars::{derive_pillars, Pillars};
pub use attributes::{ten_god, ElementTally, TenGod};
pub use markers::Marker;
pub use chart::{compute_chart, BirthMoment, Chart, ChartBuilder, ChartSettings, PillarDetail, Position};
pub use report::ChartReport;
pub use request::{BirthRequest, RequestEnvelope};
pub use error::{ChartError, ChartResult, ErrorPayload, ValidationError};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
