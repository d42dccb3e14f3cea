// ☀️ True Solar Time - longitude correction of civil time
//
// Civil clocks follow a reference meridian (120°E for Beijing time).
// The sun crosses 1° of longitude every 4 minutes, so a birth place west
// of the meridian sees local noon later than the clock does.
//
// This is the linear approximation only: the equation of time (orbital
// eccentricity, axial tilt) is deliberately not applied.

use chrono::{Duration, NaiveDateTime};

use crate::error::ValidationError;

/// Meridian of UTC+8 civil time.
pub const DEFAULT_REFERENCE_MERIDIAN: f64 = 120.0;

/// Minutes of clock time per degree of longitude.
pub const MINUTES_PER_DEGREE: f64 = 4.0;

/// A civil moment corrected to local true solar time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrueSolarTime {
    pub civil: NaiveDateTime,
    pub longitude: f64,
    pub offset_minutes: f64,
    pub moment: NaiveDateTime,
}

impl TrueSolarTime {
    pub fn normalize(
        civil: NaiveDateTime,
        longitude: f64,
        reference_meridian: f64,
    ) -> Result<Self, ValidationError> {
        validate_longitude("longitude", longitude)?;
        validate_longitude("reference_meridian", reference_meridian)?;

        let offset_minutes = offset_minutes(longitude, reference_meridian);
        let offset = Duration::seconds((offset_minutes * 60.0).round() as i64);
        let moment = civil
            .checked_add_signed(offset)
            .ok_or_else(|| ValidationError::new("birthYear", "Timestamp out of supported range"))?;

        Ok(TrueSolarTime {
            civil,
            longitude,
            offset_minutes,
            moment,
        })
    }
}

/// Clock offset in minutes between `longitude` and the reference meridian.
pub fn offset_minutes(longitude: f64, reference_meridian: f64) -> f64 {
    longitude * MINUTES_PER_DEGREE - reference_meridian * MINUTES_PER_DEGREE
}

fn validate_longitude(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("Must be a longitude between -180 and 180 degrees, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_beijing_offset() {
        // 116.4°E is 3.6° west of 120°E → 14.4 minutes earlier
        let tst = TrueSolarTime::normalize(at(1990, 1, 1, 0, 0), 116.4, 120.0).unwrap();

        assert!((tst.offset_minutes + 14.4).abs() < 1e-9);
        assert_eq!(
            tst.moment,
            NaiveDate::from_ymd_opt(1989, 12, 31).unwrap().and_hms_opt(23, 45, 36).unwrap()
        );
    }

    #[test]
    fn test_on_meridian_is_identity() {
        let civil = at(2000, 6, 15, 12, 0);
        let tst = TrueSolarTime::normalize(civil, 120.0, 120.0).unwrap();
        assert_eq!(tst.moment, civil);
    }

    #[test]
    fn test_east_of_meridian_moves_forward() {
        // Harbin-ish 126.6°E → +26.4 min
        let tst = TrueSolarTime::normalize(at(2000, 6, 15, 12, 0), 126.6, 120.0).unwrap();
        assert_eq!(tst.moment, at(2000, 6, 15, 12, 26) + Duration::seconds(24));
    }

    #[test]
    fn test_invalid_longitude() {
        let err = TrueSolarTime::normalize(at(2000, 1, 1, 0, 0), 181.0, 120.0).unwrap_err();
        assert_eq!(err.field, "longitude");

        let err = TrueSolarTime::normalize(at(2000, 1, 1, 0, 0), f64::NAN, 120.0).unwrap_err();
        assert_eq!(err.field, "longitude");
    }
}
