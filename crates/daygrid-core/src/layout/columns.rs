//! Overlap column assignment for the events of one day.
//!
//! Events are packed greedily by start time into the lowest free column.
//! Columns are counted per overlap cluster, so a busy morning does not
//! narrow an unrelated afternoon event.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub column: usize,
    pub total_columns: usize,
}

impl ColumnAssignment {
    pub fn width_fraction(&self) -> f64 {
        1.0 / self.total_columns as f64
    }

    pub fn left_fraction(&self) -> f64 {
        self.column as f64 / self.total_columns as f64
    }
}

pub type ColumnMap = BTreeMap<String, ColumnAssignment>;

/// Start ascending, then end, then id.
pub fn layout_order(a: &Event, b: &Event) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.occupied_end().cmp(&b.occupied_end()))
        .then_with(|| a.id.cmp(&b.id))
}

type OccupiedEnd = (NaiveDateTime, bool);

#[derive(Default)]
struct Cluster<'a> {
    column_ends: Vec<OccupiedEnd>,
    members: Vec<(&'a str, usize)>,
    end: Option<OccupiedEnd>,
}

impl<'a> Cluster<'a> {
    fn accepts(&self, event: &Event) -> bool {
        self.end.is_none_or(|end| (event.start, false) < end)
    }

    fn place(&mut self, event: &'a Event) {
        let end = event.occupied_end();
        let column = match self
            .column_ends
            .iter()
            .position(|column_end| *column_end <= (event.start, false))
        {
            Some(free) => {
                self.column_ends[free] = end;
                free
            }
            None => {
                self.column_ends.push(end);
                self.column_ends.len() - 1
            }
        };

        trace!(id = %event.id, column, "placed event");
        self.members.push((event.id.as_str(), column));
        self.end = Some(self.end.map_or(end, |current| current.max(end)));
    }

    fn flush_into(&mut self, out: &mut ColumnMap) {
        let total_columns = self.column_ends.len();
        for (id, column) in self.members.drain(..) {
            out.insert(
                id.to_string(),
                ColumnAssignment {
                    column,
                    total_columns,
                },
            );
        }
        self.column_ends.clear();
        self.end = None;
    }
}

/// Assigns each event a column such that overlapping events never share one.
///
/// Every member of an overlap cluster reports the number of columns opened
/// for that cluster as `total_columns`. The result does not depend on the
/// order of `events`.
#[tracing::instrument(skip(events), fields(count = events.len()))]
pub fn assign_columns(events: &[Event]) -> ColumnMap {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| layout_order(a, b));

    let mut out = ColumnMap::new();
    let mut cluster = Cluster::default();

    for event in sorted {
        if !cluster.accepts(event) {
            cluster.flush_into(&mut out);
        }
        cluster.place(event);
    }
    cluster.flush_into(&mut out);

    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::assign_columns;
    use crate::event::{Event, EventCategory};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(id: &str, start: (u32, u32), end: (u32, u32)) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            start: at(start.0, start.1),
            end: at(end.0, end.1),
            color: "#0ea5e9".to_string(),
            category: EventCategory::Work,
        }
    }

    #[test]
    fn reuses_freed_column_inside_cluster() {
        let events = vec![
            event("a", (9, 0), (10, 0)),
            event("b", (9, 30), (10, 30)),
            event("c", (10, 0), (11, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["a"].column, 0);
        assert_eq!(map["b"].column, 1);
        assert_eq!(map["c"].column, 0);
        assert!(map.values().all(|a| a.total_columns == 2));
    }

    #[test]
    fn separate_clusters_restart_at_column_zero() {
        let events = vec![
            event("morning-1", (8, 0), (9, 0)),
            event("morning-2", (8, 0), (9, 0)),
            event("morning-3", (8, 30), (9, 0)),
            event("lunch", (12, 0), (13, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["morning-3"].total_columns, 3);
        assert_eq!(map["lunch"].column, 0);
        assert_eq!(map["lunch"].total_columns, 1);
    }

    #[test]
    fn back_to_back_events_share_a_column() {
        let events = vec![
            event("first", (9, 0), (10, 0)),
            event("second", (10, 0), (11, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["first"].column, 0);
        assert_eq!(map["second"].column, 0);
        assert_eq!(map["second"].total_columns, 1);
    }

    #[test]
    fn identical_times_are_ordered_by_id() {
        let events = vec![event("z", (9, 0), (10, 0)), event("a", (9, 0), (10, 0))];
        let map = assign_columns(&events);

        assert_eq!(map["a"].column, 0);
        assert_eq!(map["z"].column, 1);
    }

    #[test]
    fn malformed_event_still_gets_a_column() {
        let events = vec![
            event("long", (9, 0), (11, 0)),
            event("backwards", (10, 0), (9, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["backwards"].column, 1);
        assert_eq!(map["backwards"].total_columns, 2);
    }

    #[test]
    fn instant_at_shared_start_takes_its_own_column() {
        let events = vec![
            event("meeting", (9, 0), (10, 0)),
            event("reminder", (9, 0), (9, 0)),
            event("after", (10, 0), (10, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["reminder"].column, 0);
        assert_eq!(map["meeting"].column, 1);
        assert_eq!(map["meeting"].total_columns, 2);
        assert_eq!(map["after"].column, 0);
        assert_eq!(map["after"].total_columns, 1);
    }

    #[test]
    fn fractions_follow_column_share() {
        let events = vec![
            event("a", (9, 0), (10, 0)),
            event("b", (9, 0), (10, 0)),
            event("c", (9, 0), (10, 0)),
            event("d", (9, 0), (10, 0)),
        ];
        let map = assign_columns(&events);

        assert_eq!(map["c"].width_fraction(), 0.25);
        assert_eq!(map["c"].left_fraction(), 0.5);
    }
}
