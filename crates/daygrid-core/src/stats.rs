use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::Event;

/// Summary cards shown above the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub today: usize,
    pub upcoming: usize,
    pub total_hours: i64,
}

impl EventStats {
    pub fn compute(events: &[Event], now: NaiveDateTime) -> Self {
        let today = now.date();
        let minutes: i64 = events.iter().map(|e| e.duration_minutes().max(0)).sum();

        Self {
            total: events.len(),
            today: events.iter().filter(|e| e.start.date() == today).count(),
            upcoming: events.iter().filter(|e| e.start > now).count(),
            // rounds half up
            total_hours: (minutes + 30) / 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::EventStats;
    use crate::event::{Event, EventCategory};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            start,
            end,
            color: "#f59e0b".to_string(),
            category: EventCategory::Reminder,
        }
    }

    #[test]
    fn counts_today_upcoming_and_hours() {
        let now = at(10, 11, 0);
        let events = vec![
            event("past-today", at(10, 9, 0), at(10, 10, 0)),
            event("later-today", at(10, 14, 0), at(10, 15, 30)),
            event("tomorrow", at(11, 9, 0), at(11, 9, 45)),
            event("last-week", at(3, 9, 0), at(3, 9, 30)),
        ];
        let stats = EventStats::compute(&events, now);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.today, 2);
        assert_eq!(stats.upcoming, 2);
        // 60 + 90 + 45 + 30 = 225 minutes
        assert_eq!(stats.total_hours, 4);
    }

    #[test]
    fn malformed_durations_do_not_subtract() {
        let now = at(10, 8, 0);
        let events = vec![
            event("ok", at(10, 9, 0), at(10, 10, 0)),
            event("backwards", at(10, 12, 0), at(10, 9, 0)),
        ];
        assert_eq!(EventStats::compute(&events, now).total_hours, 1);
        assert_eq!(EventStats::compute(&[], now), EventStats::default());
    }
}
