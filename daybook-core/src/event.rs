//! Event types.
//!
//! An [`Event`] is one scheduled item on a calendar day. Times of day are
//! carried as fixed-width `HH:MM` text ([`ClockTime`]) so that plain string
//! ordering matches chronological ordering within a day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A scheduled calendar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque unique identifier, fixed at creation.
    pub id: String,
    pub name: String,
    #[serde(with = "calendar_day")]
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display tag only; nothing in the store looks at it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    /// Generate a fresh identifier for a new event.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercased. A missing description never
    /// matches.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }

    /// Half-open `[start, end)` overlap with another time range on the same day.
    pub fn overlaps(&self, start: &ClockTime, end: &ClockTime) -> bool {
        *start < self.end_time && *end > self.start_time
    }

    /// Return a copy of this event with `patch` applied.
    pub fn patched(&self, patch: &EventPatch) -> Event {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(date) = patch.date {
            next.date = date;
        }
        if let Some(start) = &patch.start_time {
            next.start_time = start.clone();
        }
        if let Some(end) = &patch.end_time {
            next.end_time = end.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        next
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {} {}", self.start_time, self.end_time, self.name)
    }
}

/// Partial replacement of an event's fields.
///
/// `None` leaves a field alone. The optional fields use a nested option so a
/// patch can clear them: `Some(None)` removes the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &EventPatch::default()
    }
}

/// A wall-clock time in zero-padded 24-hour `HH:MM` form.
///
/// Ordering is the ordering of the text, which is chronological because the
/// format is fixed width.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(String);

impl ClockTime {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let bytes = trimmed.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());

        if !well_formed {
            return Err(ValidationError::InvalidTime(s.to_string()));
        }

        let hours = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let minutes = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
        if hours > 23 || minutes > 59 {
            return Err(ValidationError::InvalidTime(s.to_string()));
        }

        Ok(ClockTime(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClockTime::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that names a calendar day. Time-of-day is dropped.
pub trait AsCalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl AsCalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl AsCalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> AsCalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Serde helpers for the `date` field.
///
/// Written as `YYYY-MM-DD`. Reading also accepts a full RFC 3339 timestamp
/// and keeps its calendar day in the local time zone, which is the day a
/// snapshot that stored local midnight as a UTC instant was written for.
mod calendar_day {
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;

        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }

        timestamp_day(&raw, &Local)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'")))
    }

    /// Calendar day of an RFC 3339 timestamp as seen from `tz`.
    pub(super) fn timestamp_day<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(tz).date_naive())
    }
}
