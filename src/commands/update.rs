use anyhow::{Result, anyhow};
use daybook_core::draft::find_conflict;
use daybook_core::error::ValidationError;
use daybook_core::persist::Storage;
use daybook_core::{ClockTime, EventPatch, EventStore};
use owo_colors::OwoColorize;

use super::{parse_date, warn_if_unsaved};
use crate::render::Render;

/// Raw field changes from the command line.
#[derive(Debug, Default)]
pub struct Changes {
    pub name: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Changes {
    fn into_patch(self) -> Result<EventPatch> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                return Err(ValidationError::MissingField("name").into());
            }
            other => other.map(|n| n.trim().to_string()),
        };

        Ok(EventPatch {
            name,
            date: self.date.as_deref().map(parse_date).transpose()?,
            start_time: self.start.as_deref().map(ClockTime::parse).transpose()?,
            end_time: self.end.as_deref().map(ClockTime::parse).transpose()?,
            description: self.description.map(clearable),
            color: self.color.map(clearable),
        })
    }
}

/// An empty value on the command line clears the field.
fn clearable(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn run<S: Storage>(store: &mut EventStore<S>, id: &str, changes: Changes) -> Result<()> {
    let patch = changes.into_patch()?;
    if patch.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --name, --date, --start, --end, --description, --color");
    }

    let Some(current) = store.get_event(id) else {
        println!("{}", format!("No event with id {id}").dimmed());
        return Ok(());
    };

    // The updated event has to pass the same checks as a new one
    let candidate = current.patched(&patch);
    if candidate.end_time <= candidate.start_time {
        return Err(anyhow!(ValidationError::EndNotAfterStart {
            start: candidate.start_time.to_string(),
            end: candidate.end_time.to_string(),
        }));
    }

    let others = store
        .get_events_for_date(candidate.date)
        .into_iter()
        .filter(|e| e.id != id);
    if let Some(clash) = find_conflict(&candidate.start_time, &candidate.end_time, others) {
        return Err(anyhow!(ValidationError::Conflict {
            name: clash.name.clone(),
            start: clash.start_time.to_string(),
            end: clash.end_time.to_string(),
        }));
    }

    warn_if_unsaved(store.update_event(id, &patch));
    println!("Updated {}", candidate.render());
    Ok(())
}
