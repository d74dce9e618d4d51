//! Terminal rendering for daybook types.
//!
//! Extension traits and helpers that turn daybook-core values into colored
//! terminal text using owo_colors.

use chrono::{Datelike, NaiveDate};
use daybook_core::Event;
use daybook_core::month::{GridDay, MonthView};
use owo_colors::OwoColorize;

/// Width of one grid cell, without the separating space
const CELL_WIDTH: usize = 6;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!("{} - {}", self.start_time, self.end_time);
        let mut line = format!("{} {}", time.cyan(), self.name.bold());
        if let Some(color) = &self.color {
            line.push_str(&format!(" {}", format!("({color})").dimmed()));
        }
        line
    }
}

/// e.g. "Wednesday, May 1, 2024"
fn day_title(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// The events of one day, with descriptions and ids.
pub fn day_listing(date: NaiveDate, events: &[&Event]) -> String {
    let mut lines = vec![day_title(date).bold().to_string()];

    if events.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
    }

    for event in events {
        lines.extend(event_lines(event));
    }

    lines.join("\n")
}

fn event_lines(event: &Event) -> Vec<String> {
    let mut lines = vec![format!("  {} {}", event.render(), event.id.dimmed())];
    if let Some(description) = &event.description {
        lines.push(format!("      {}", description.dimmed()));
    }
    lines
}

/// Events under a heading per day. Expects `events` sorted by date.
pub fn grouped_by_day(events: &[&Event]) -> String {
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for event in events {
        if current_date != Some(event.date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(day_title(event.date).bold().to_string());
            current_date = Some(event.date);
        }
        lines.extend(event_lines(event));
    }

    lines.join("\n")
}

/// The month grid with a count badge on every day that has events.
pub fn month_grid(view: &MonthView, days: &[GridDay]) -> String {
    let total_width = 7 * (CELL_WIDTH + 1) - 1;
    let mut lines = vec![
        format!("{:^width$}", view.title(), width = total_width)
            .bold()
            .to_string(),
    ];

    let header: Vec<String> = view
        .weekday_labels()
        .iter()
        .map(|label| format!("{:<width$}", label, width = CELL_WIDTH))
        .collect();
    lines.push(header.join(" ").dimmed().to_string());

    for week in days.chunks(7) {
        let row: Vec<String> = week.iter().map(render_cell).collect();
        lines.push(row.join(" "));
    }

    lines.join("\n")
}

fn render_cell(day: &GridDay) -> String {
    let number = format!("{:>2}", day.date.day());
    let badge = if day.event_count > 0 {
        format!("·{}", day.event_count)
    } else {
        String::new()
    };
    // Pad on plain text so escape codes don't skew the columns
    let padding = " ".repeat(CELL_WIDTH.saturating_sub(2 + badge.chars().count()));

    let number = if day.is_today {
        number.reversed().bold().to_string()
    } else if !day.in_month {
        number.dimmed().to_string()
    } else {
        number
    };

    format!("{}{}{}", number, badge.blue(), padding)
}
