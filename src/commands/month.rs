use anyhow::Result;
use chrono::Local;
use daybook_core::EventStore;
use daybook_core::month::{MonthView, WeekStart};
use daybook_core::persist::Storage;

use super::parse_month;
use crate::render;

pub fn run<S: Storage>(store: &EventStore<S>, month: Option<&str>, week_start: WeekStart) -> Result<()> {
    let today = Local::now().date_naive();

    let shown = match month {
        Some(m) => parse_month(m)?,
        None => today,
    };

    let view = MonthView::containing(shown, week_start);
    let days = view.days(store, today);
    println!("{}", render::month_grid(&view, &days));
    Ok(())
}
