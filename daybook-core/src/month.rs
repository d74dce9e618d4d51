//! Month grid: which days to show for a displayed month and how many events
//! each one has.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::persist::Storage;
use crate::store::EventStore;

/// First column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column index of `weekday` in a grid starting on this day.
    fn column(self, weekday: Weekday) -> u64 {
        let offset = match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        };
        u64::from(offset)
    }

    pub fn weekday_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days borrowed from neighbouring
    /// months.
    pub in_month: bool,
    pub is_today: bool,
    pub event_count: usize,
}

/// The month currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
    week_start: WeekStart,
}

impl MonthView {
    /// The month containing `date`.
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        MonthView {
            first: date - Days::new(u64::from(date.day0())),
            week_start,
        }
    }

    pub fn new(year: i32, month: u32, week_start: WeekStart) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(MonthView { first, week_start })
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first.pred_opt().unwrap_or(self.first)
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Stays put at the edge of the representable calendar.
    pub fn next(&self) -> Self {
        MonthView {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
            week_start: self.week_start,
        }
    }

    pub fn previous(&self) -> Self {
        MonthView {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
            week_start: self.week_start,
        }
    }

    /// e.g. "May 2024"
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn weekday_labels(&self) -> [&'static str; 7] {
        self.week_start.weekday_labels()
    }

    /// First and last day shown: whole weeks covering the month.
    pub fn grid_range(&self) -> (NaiveDate, NaiveDate) {
        let first = self.first;
        let last = self.last_day();

        let lead = self.week_start.column(first.weekday());
        let trail = 6 - self.week_start.column(last.weekday());

        let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
        let end = last.checked_add_days(Days::new(trail)).unwrap_or(last);
        (start, end)
    }

    /// Every cell of the grid, row by row, with event counts from `store`.
    pub fn days<S: Storage>(&self, store: &EventStore<S>, today: NaiveDate) -> Vec<GridDay> {
        let (start, end) = self.grid_range();
        let counts = store.count_by_date(start, end);

        start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| GridDay {
                date,
                in_month: date.month() == self.first.month() && date.year() == self.first.year(),
                is_today: date == today,
                event_count: counts.get(&date).copied().unwrap_or(0),
            })
            .collect()
    }
}
