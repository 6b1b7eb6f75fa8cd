use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

use super::worker::Worker;
use crate::error::{ValidationError, START_HOUR_UNMAPPED_MESSAGE};

/// Start hours a shift may begin at.
pub const ALLOWED_START_HOURS: [i64; 3] = [0, 8, 16];

/// One of the three fixed eight-hour blocks of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ShiftPeriod {
    #[serde(rename = "0 - 8")]
    Night,
    #[serde(rename = "8 - 16")]
    Day,
    #[serde(rename = "16 - 24")]
    Evening,
}

impl ShiftPeriod {
    /// Maps a start hour to its period. Hours outside [`ALLOWED_START_HOURS`]
    /// are rejected even though the allow-list check normally runs first.
    pub fn from_start_hour(start_hour: i64) -> Result<Self, ValidationError> {
        match start_hour {
            0 => Ok(ShiftPeriod::Night),
            8 => Ok(ShiftPeriod::Day),
            16 => Ok(ShiftPeriod::Evening),
            _ => Err(ValidationError::InvalidStartHour {
                message: START_HOUR_UNMAPPED_MESSAGE,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShiftPeriod::Night => "0 - 8",
            ShiftPeriod::Day => "8 - 16",
            ShiftPeriod::Evening => "16 - 24",
        }
    }
}

impl fmt::Display for ShiftPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShiftPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0 - 8" => Ok(ShiftPeriod::Night),
            "8 - 16" => Ok(ShiftPeriod::Day),
            "16 - 24" => Ok(ShiftPeriod::Evening),
            other => Err(format!("Unknown shift period: {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub shift_period: ShiftPeriod,
    /// `None` once the owning user has been removed.
    pub worker: Option<Worker>,
}

/// Row shape of `"Shifts"` left-joined with `"Users"`.
#[derive(Debug, FromRow)]
pub struct ShiftRow {
    pub id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub shift_period: String,
    pub worker_id: Option<i32>,
    pub worker_username: Option<String>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = String;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let shift_period = row.shift_period.parse()?;
        let worker = match (row.worker_id, row.worker_username) {
            (Some(id), Some(username)) => Some(Worker { id, username }),
            _ => None,
        };

        Ok(Shift {
            id: row.id,
            date: row.date,
            created_at: row.created_at,
            shift_period,
            worker,
        })
    }
}

/// Outbound shape of a shift: the worker reference is replaced by the
/// worker's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShiftRepresentation {
    pub id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub shift_period: ShiftPeriod,
    pub worker: Option<String>,
}

impl From<&Shift> for ShiftRepresentation {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            date: shift.date,
            created_at: shift.created_at,
            shift_period: shift.shift_period,
            worker: shift.worker.as_ref().map(|w| w.username.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shift(worker: Option<Worker>) -> Shift {
        Shift {
            id: 7,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            created_at: DateTime::parse_from_rfc3339("2026-03-14T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            shift_period: ShiftPeriod::Day,
            worker,
        }
    }

    #[test]
    fn test_start_hour_mapping() {
        assert_eq!(ShiftPeriod::from_start_hour(0).unwrap().label(), "0 - 8");
        assert_eq!(ShiftPeriod::from_start_hour(8).unwrap().label(), "8 - 16");
        assert_eq!(ShiftPeriod::from_start_hour(16).unwrap().label(), "16 - 24");

        for hour in ALLOWED_START_HOURS {
            assert!(ShiftPeriod::from_start_hour(hour).is_ok());
        }
    }

    #[test]
    fn test_unmapped_start_hour_is_rejected() {
        for hour in [i64::MIN, -8, 1, 5, 7, 9, 15, 17, 24, 3_000_000_000, i64::MAX] {
            let err = ShiftPeriod::from_start_hour(hour).unwrap_err();
            assert_eq!(err.field(), "start_hour");
            assert_eq!(err.to_string(), "invalid start hour");
        }
    }

    #[test]
    fn test_label_parse_rejects_free_text() {
        assert_eq!("16 - 24".parse::<ShiftPeriod>().unwrap(), ShiftPeriod::Evening);
        assert!("16-24".parse::<ShiftPeriod>().is_err());
        assert!("morning".parse::<ShiftPeriod>().is_err());
    }

    #[test]
    fn test_row_without_worker_maps_to_none() {
        let row = ShiftRow {
            id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            created_at: Utc::now(),
            shift_period: "0 - 8".to_string(),
            worker_id: None,
            worker_username: None,
        };
        let shift = Shift::try_from(row).unwrap();
        assert_eq!(shift.worker, None);
        assert_eq!(shift.shift_period, ShiftPeriod::Night);
    }

    #[test]
    fn test_row_with_unknown_period_fails() {
        let row = ShiftRow {
            id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            created_at: Utc::now(),
            shift_period: "4 - 12".to_string(),
            worker_id: Some(3),
            worker_username: Some("bob".to_string()),
        };
        assert!(Shift::try_from(row).is_err());
    }

    #[test]
    fn test_representation_uses_username() {
        let alice = Worker {
            id: 1,
            username: "alice".to_string(),
        };
        let value = serde_json::to_value(ShiftRepresentation::from(&shift(Some(alice)))).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "date": "2026-03-14",
                "created_at": "2026-03-14T09:30:00Z",
                "shift_period": "8 - 16",
                "worker": "alice"
            })
        );
    }

    #[test]
    fn test_representation_without_worker_is_null() {
        let value = serde_json::to_value(ShiftRepresentation::from(&shift(None))).unwrap();
        assert_eq!(value["worker"], serde_json::Value::Null);
        assert!(value.get("start_hour").is_none());
    }
}
