//! Calendar date used to select one day of audit records.
//!
//! Records carry their date as a plain `YYYY-MM-DD` string and are compared
//! by exact string equality. Only the caller-supplied date is normalized
//! here (parsing, zero-padding, "today" in a timezone); record dates are
//! never converted.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

const FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub raw: String,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date '{}': expected YYYY-MM-DD", self.raw)
    }
}

impl std::error::Error for DateParseError {}

/// Canonical `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuditDate(String);

impl AuditDate {
    pub fn parse(raw: &str) -> Result<Self, DateParseError> {
        NaiveDate::parse_from_str(raw.trim(), FORMAT)
            .map(Self::from_naive)
            .map_err(|_| DateParseError {
                raw: raw.to_string(),
            })
    }

    pub fn from_naive(d: NaiveDate) -> Self {
        Self(d.format(FORMAT).to_string())
    }

    /// Calendar date of `now` as observed in `tz`.
    pub fn on_instant(now: DateTime<Utc>, tz: Tz) -> Self {
        Self::from_naive(now.with_timezone(&tz).date_naive())
    }

    pub fn today_in(tz: Tz) -> Self {
        Self::on_instant(Utc::now(), tz)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact equality against a record's date field. Missing dates never match.
    pub fn matches(&self, record_date: Option<&str>) -> bool {
        record_date == Some(self.0.as_str())
    }
}

impl fmt::Display for AuditDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AuditDate {
    type Error = DateParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<AuditDate> for String {
    fn from(d: AuditDate) -> Self {
        d.0
    }
}
