// 📥 Birth Request - wire shape of a chart request and its validation
//
// Every field is optional on the wire so that a missing field becomes a
// ValidationError naming it, rather than a deserialization failure.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chart::BirthMoment;
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthRequest {
    pub birth_year: Option<i32>,
    pub birth_month: Option<u32>,
    pub birth_day: Option<u32>,
    pub birth_hour: Option<u32>,
    pub birth_minute: Option<u32>,
    pub longitude: Option<f64>,
}

/// HTTP body: `{ "userData": { ... } }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub user_data: BirthRequest,
}

impl RequestEnvelope {
    /// Read an envelope from loose JSON, naming the wire field of any
    /// value with the wrong type.
    pub fn from_value(body: &Value) -> Result<Self, ValidationError> {
        let user_data = match body.get("userData") {
            None | Some(Value::Null) => return Ok(RequestEnvelope::default()),
            Some(Value::Object(fields)) => fields,
            Some(_) => return Err(ValidationError::new("userData", "Must be an object")),
        };

        Ok(RequestEnvelope {
            user_data: BirthRequest {
                birth_year: typed_field(user_data, "birthYear")?,
                birth_month: typed_field(user_data, "birthMonth")?,
                birth_day: typed_field(user_data, "birthDay")?,
                birth_hour: typed_field(user_data, "birthHour")?,
                birth_minute: typed_field(user_data, "birthMinute")?,
                longitude: typed_field(user_data, "longitude")?,
            },
        })
    }
}

fn typed_field<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    name: &str,
) -> Result<Option<T>, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ValidationError::new(name, format!("Invalid value: {}", e))),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

fn in_range(value: u32, min: u32, max: u32, field: &str) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::new(
            field,
            format!("{} is outside {}..={}", value, min, max),
        ))
    }
}

impl BirthRequest {
    /// Check presence (in wire order), ranges, then calendar validity.
    pub fn validate(&self) -> Result<BirthMoment, ValidationError> {
        let year = required(self.birth_year, "birthYear")?;
        let month = required(self.birth_month, "birthMonth")?;
        let day = required(self.birth_day, "birthDay")?;
        let hour = required(self.birth_hour, "birthHour")?;
        let minute = required(self.birth_minute, "birthMinute")?;
        let longitude = required(self.longitude, "longitude")?;

        let month = in_range(month, 1, 12, "birthMonth")?;
        let day = in_range(day, 1, 31, "birthDay")?;
        let hour = in_range(hour, 0, 23, "birthHour")?;
        let minute = in_range(minute, 0, 59, "birthMinute")?;
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::new(
                "longitude",
                format!("{} is not a longitude in degrees", longitude),
            ));
        }

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ValidationError::new(
                "birthDay",
                format!("{}-{:02}-{:02} is not a calendar date", year, month, day),
            )
        })?;
        let civil = date
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| ValidationError::new("birthHour", "invalid time of day"))?;

        Ok(BirthMoment { civil, longitude })
    }
}
