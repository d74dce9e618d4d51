use anyhow::Result;
use daybook_core::draft::{EventDraft, SubmitError};
use chrono::NaiveDate;
use daybook_core::persist::Storage;
use daybook_core::{Event, EventStore};
use owo_colors::OwoColorize;

use super::{parse_date, warn_if_unsaved};
use crate::render;

pub fn run<S: Storage>(
    store: &mut EventStore<S>,
    date: &str,
    name: String,
    start: String,
    end: String,
    description: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let date = parse_date(date)?;

    let draft = EventDraft {
        name,
        date,
        start_time: start,
        end_time: end,
        description: description.unwrap_or_default(),
        color,
    };

    // Show the day as it looks after the change
    let subscription = store.subscribe(move |events| println!("{}", listing_for(date, events)));
    let result = draft.submit(store);
    store.unsubscribe(subscription);

    match result {
        Ok(id) => {
            println!("{}", format!("Added event {id}").green());
            Ok(())
        }
        Err(SubmitError::NotSaved { source, .. }) => {
            warn_if_unsaved::<()>(Err(source));
            Ok(())
        }
        Err(SubmitError::Invalid(err)) => anyhow::bail!("{err}"),
    }
}

/// The day listing for `date` within a full event collection.
fn listing_for(date: NaiveDate, events: &[Event]) -> String {
    let on_day: Vec<&Event> = events.iter().filter(|e| e.is_on(date)).collect();
    render::day_listing(date, &on_day)
}
