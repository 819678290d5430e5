use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_COLOR: &str = "#0ea5e9";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Work,
    Meeting,
    Personal,
    Reminder,
    Other,
}

impl EventCategory {
    /// Display order used by filter chips and category counts.
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Work,
        EventCategory::Personal,
        EventCategory::Meeting,
        EventCategory::Reminder,
        EventCategory::Other,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            EventCategory::Work => "work",
            EventCategory::Meeting => "meeting",
            EventCategory::Personal => "personal",
            EventCategory::Reminder => "reminder",
            EventCategory::Other => "other",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.as_key() == key)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// A calendar event in local wall-clock time.
///
/// `end > start` is expected but not enforced; the layout engine treats a
/// malformed event as occupying the single instant at `start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub start: NaiveDateTime,

    pub end: NaiveDateTime,

    #[serde(default = "default_color")]
    pub color: String,

    pub category: EventCategory,
}

impl Event {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_malformed(&self) -> bool {
        self.end < self.start
    }

    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.max(self.start)
    }

    /// End of the span the event occupies on the grid. Zero-length and
    /// malformed events occupy an instant just past `start`, which the flag
    /// orders after a plain end at the same time.
    pub fn occupied_end(&self) -> (NaiveDateTime, bool) {
        (self.effective_end(), self.end <= self.start)
    }

    /// Half-open overlap: events that merely touch do not overlap, events
    /// starting at the same instant always do.
    pub fn overlaps(&self, other: &Event) -> bool {
        (self.start, false) < other.occupied_end() && (other.start, false) < self.occupied_end()
    }
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Form payload used to create or edit an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub start: NaiveDateTime,

    pub end: NaiveDateTime,

    #[serde(default = "default_color")]
    pub color: String,

    pub category: EventCategory,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            start,
            end,
            color: default_color(),
            category: EventCategory::Other,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required");
        }
        if self.end <= self.start {
            errors.insert("end", "End time must be after start time");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub(crate) fn into_event(self, id: String) -> Event {
        let description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Event {
            id,
            title: self.title.trim().to_string(),
            description,
            start: self.start,
            end: self.end,
            color: self.color,
            category: self.category,
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            color: event.color.clone(),
            category: event.category,
        }
    }
}

/// Per-field validation messages, keyed by the `EventDraft` field they
/// concern: `"title"` or `"end"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}
