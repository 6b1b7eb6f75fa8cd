use chrono::NaiveDate;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{shift::ShiftPeriod, worker::Worker};
use crate::error::{
    ValidationError, FIELD_REQUIRED_MESSAGE, INVALID_DATE_FORMAT_MESSAGE,
    INVALID_INTEGER_MESSAGE,
};

/// Input DTO for submitting a shift. The worker comes from the session,
/// never from the payload.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateShiftInput {
    pub date: NaiveDate,
    /// One of 0, 8 or 16.
    pub start_hour: i64,
}

impl CreateShiftInput {
    /// Reads the payload field by field so shape errors are keyed like
    /// rule violations. `date` is checked before `start_hour`.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let date = parse_date(body.get("date"))?;
        let start_hour = parse_start_hour(body.get("start_hour"))?;
        Ok(Self { date, start_hour })
    }
}

fn parse_date(value: Option<&Value>) -> Result<NaiveDate, ValidationError> {
    let malformed = |message: &'static str| ValidationError::Malformed {
        field: "date",
        message,
    };

    match value {
        None | Some(Value::Null) => Err(malformed(FIELD_REQUIRED_MESSAGE)),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| malformed(INVALID_DATE_FORMAT_MESSAGE)),
        Some(_) => Err(malformed(INVALID_DATE_FORMAT_MESSAGE)),
    }
}

/// Any integer is accepted, including numeric strings and integral floats.
/// Values beyond `i64` saturate; they can never be an allowed start hour.
fn parse_start_hour(value: Option<&Value>) -> Result<i64, ValidationError> {
    let malformed = |message: &'static str| ValidationError::Malformed {
        field: "start_hour",
        message,
    };

    match value {
        None | Some(Value::Null) => Err(malformed(FIELD_REQUIRED_MESSAGE)),
        Some(Value::Number(n)) => {
            if let Some(hour) = n.as_i64() {
                Ok(hour)
            } else if n.is_u64() {
                Ok(i64::MAX)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
                    _ => Err(malformed(INVALID_INTEGER_MESSAGE)),
                }
            }
        }
        Some(Value::String(s)) => parse_integer_text(s.trim())
            .ok_or_else(|| malformed(INVALID_INTEGER_MESSAGE)),
        Some(_) => Err(malformed(INVALID_INTEGER_MESSAGE)),
    }
}

fn parse_integer_text(s: &str) -> Option<i64> {
    if let Ok(hour) = s.parse::<i64>() {
        return Some(hour);
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Attributes that passed validation and are ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedShift {
    pub worker: Worker,
    pub shift_period: ShiftPeriod,
    pub date: NaiveDate,
}
