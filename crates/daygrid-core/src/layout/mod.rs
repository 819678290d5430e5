//! Day-local event layout: overlap columns, vertical placement and the
//! time-slot grid behind a day column.

pub mod columns;
pub mod position;
pub mod slots;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use columns::{ColumnAssignment, ColumnMap, assign_columns};
pub use position::{Position, position};
pub use slots::{TimeSlot, time_slots};

use crate::config::DayTimeRange;
use crate::error::LayoutError;
use crate::event::Event;

/// An event ready to be drawn: column share plus vertical placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEvent {
    pub id: String,
    pub column: usize,
    pub total_columns: usize,
    pub top: f64,
    pub height: f64,
    pub left_fraction: f64,
    pub width_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub day: NaiveDate,
    pub items: Vec<PositionedEvent>,
}

impl DayLayout {
    pub fn get(&self, id: &str) -> Option<&PositionedEvent> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lays out the events of `day`.
///
/// Every event must start on `day` and carry a unique id. Malformed
/// events (end before start) are laid out, not rejected.
#[tracing::instrument(skip(events, range), fields(count = events.len()))]
pub fn layout_day(
    day: NaiveDate,
    events: &[Event],
    range: &DayTimeRange,
) -> Result<DayLayout, LayoutError> {
    validate_day(day, events)?;

    let columns = assign_columns(events);

    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by(|a, b| columns::layout_order(a, b));

    let items = ordered
        .into_iter()
        .filter_map(|event| {
            let assignment = columns.get(&event.id)?;
            let pos = position(event, range);
            Some(PositionedEvent {
                id: event.id.clone(),
                column: assignment.column,
                total_columns: assignment.total_columns,
                top: pos.top,
                height: pos.height,
                left_fraction: assignment.left_fraction(),
                width_fraction: assignment.width_fraction(),
            })
        })
        .collect::<Vec<_>>();

    debug!(
        %day,
        events = items.len(),
        max_columns = items.iter().map(|i| i.total_columns).max().unwrap_or(0),
        "laid out day"
    );

    Ok(DayLayout { day, items })
}

fn validate_day(day: NaiveDate, events: &[Event]) -> Result<(), LayoutError> {
    let mut seen = BTreeSet::new();

    for event in events {
        if event.start.date() != day {
            return Err(LayoutError::InvalidEventRange {
                id: event.id.clone(),
                day,
                start: event.start,
            });
        }
        if !seen.insert(event.id.as_str()) {
            return Err(LayoutError::DuplicateEventId(event.id.clone()));
        }
    }

    Ok(())
}
