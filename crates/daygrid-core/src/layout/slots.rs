use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::DayTimeRange;

/// One clickable cell of the day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
    pub label: String,
}

impl TimeSlot {
    pub fn is_hour_start(&self) -> bool {
        self.minute == 0
    }

    /// Start of this slot on `date`, as handed to click-to-create.
    pub fn at(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_hms_opt(self.hour, self.minute, 0)
    }
}

/// Slots from `start_hour:00` up to `end_hour:00`, `slot_minutes` apart.
pub fn time_slots(range: &DayTimeRange) -> Vec<TimeSlot> {
    let step = range.slot_step();
    let first = range.start_hour * 60;
    let last = range.end_hour * 60;

    (first..last)
        .step_by(step as usize)
        .map(|minutes| {
            let hour = minutes / 60;
            let minute = minutes % 60;
            TimeSlot {
                hour,
                minute,
                label: slot_label(hour, minute),
            }
        })
        .collect()
}

fn slot_label(hour: u32, minute: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };

    if minute == 0 {
        format!("{display_hour} {suffix}")
    } else {
        format!("{display_hour}:{minute:02} {suffix}")
    }
}
