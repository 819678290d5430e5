use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::DayTimeRange;
use crate::event::Event;

/// Vertical placement of an event inside a day column, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub height: f64,
}

impl Position {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Maps an event's wall-clock span onto the day grid.
///
/// Both ends are measured from `start_hour` on the event's start date and
/// clipped to the visible range. The height never drops below
/// `min_event_height`; an event that would then run past the bottom of the
/// grid is pulled up so it stays visible.
pub fn position(event: &Event, range: &DayTimeRange) -> Position {
    let origin = grid_origin(event.start, range);
    let total = range.total_minutes();

    let start_offset = (event.start - origin).num_minutes().clamp(0, total);
    let end_offset = (event.end - origin).num_minutes().clamp(0, total);

    let px = range.pixels_per_minute();
    let total_height = total as f64 * px;
    let mut top = start_offset as f64 * px;
    let height = ((end_offset - start_offset) as f64 * px).max(range.min_event_height);

    if top + height > total_height {
        top = (total_height - height).max(0.0);
    }

    Position { top, height }
}

fn grid_origin(start: NaiveDateTime, range: &DayTimeRange) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(range.start_hour.min(23), 0, 0).unwrap_or_default();
    start.date().and_time(time)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::position;
    use crate::config::DayTimeRange;
    use crate::event::{Event, EventCategory};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: "e".to_string(),
            title: "e".to_string(),
            description: None,
            start,
            end,
            color: "#0ea5e9".to_string(),
            category: EventCategory::Meeting,
        }
    }

    fn business_hours() -> DayTimeRange {
        DayTimeRange {
            start_hour: 8,
            end_hour: 18,
            ..DayTimeRange::default()
        }
    }

    #[test]
    fn inside_range_matches_hour_and_minute_offsets() {
        let pos = position(&event(at(10, 9, 30), at(10, 11, 0)), &business_hours());
        assert_eq!(pos.top, 90.0);
        assert_eq!(pos.height, 90.0);
    }

    #[test]
    fn scales_with_pixels_per_hour() {
        let range = DayTimeRange {
            pixels_per_hour: 120.0,
            ..DayTimeRange::default()
        };
        let pos = position(&event(at(10, 1, 15), at(10, 1, 45)), &range);
        assert_eq!(pos.top, 150.0);
        assert_eq!(pos.height, 60.0);
    }

    #[test]
    fn early_start_is_clipped_to_grid_top() {
        let pos = position(&event(at(10, 6, 0), at(10, 9, 0)), &business_hours());
        assert_eq!(pos.top, 0.0);
        assert_eq!(pos.height, 60.0);
    }

    #[test]
    fn late_end_is_clipped_to_grid_bottom() {
        let pos = position(&event(at(10, 17, 0), at(10, 20, 0)), &business_hours());
        assert_eq!(pos.top, 540.0);
        assert_eq!(pos.bottom(), 600.0);
    }

    #[test]
    fn midnight_end_reaches_bottom_of_full_day() {
        let pos = position(&event(at(10, 23, 0), at(11, 0, 0)), &DayTimeRange::default());
        assert_eq!(pos.top, 1380.0);
        assert_eq!(pos.height, 60.0);
    }

    #[test]
    fn short_and_backwards_events_get_minimum_height() {
        let range = business_hours();
        let short = position(&event(at(10, 9, 0), at(10, 9, 5)), &range);
        let backwards = position(&event(at(10, 12, 0), at(10, 11, 0)), &range);

        assert_eq!(short.height, 20.0);
        assert_eq!(backwards.top, 240.0);
        assert_eq!(backwards.height, 20.0);
    }

    #[test]
    fn event_after_range_stays_visible_at_bottom() {
        let pos = position(&event(at(10, 19, 0), at(10, 20, 0)), &business_hours());
        assert_eq!(pos.top, 580.0);
        assert_eq!(pos.height, 20.0);
    }
}
