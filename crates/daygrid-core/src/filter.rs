use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::event::{
  Event,
  EventCategory
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq
)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(EventCategory)
}

impl CategoryFilter {
  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    if raw.trim().eq_ignore_ascii_case(
      "all"
    ) {
      return Some(Self::All);
    }
    EventCategory::from_key(raw)
      .map(Self::Only)
  }

  pub fn admits(
    &self,
    category: EventCategory
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Only(wanted) => {
        *wanted == category
      }
    }
  }
}

/// Search box plus category chip.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
  query:    String,
  category: CategoryFilter
}

impl EventFilter {
  pub fn new(
    query: impl Into<String>,
    category: CategoryFilter
  ) -> Self {
    Self {
      query: query.into(),
      category
    }
  }

  pub fn set_query(
    &mut self,
    query: impl Into<String>
  ) {
    self.query = query.into();
  }

  pub fn set_category(
    &mut self,
    category: CategoryFilter
  ) {
    self.category = category;
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn category(
    &self
  ) -> CategoryFilter {
    self.category
  }

  /// True when either the query or the
  /// category narrows the list.
  pub fn is_active(&self) -> bool {
    !self.query.trim().is_empty()
      || self.category
        != CategoryFilter::All
  }

  pub fn matches(
    &self,
    event: &Event
  ) -> bool {
    if !self
      .category
      .admits(event.category)
    {
      return false;
    }

    let needle = self.query.trim();
    if needle.is_empty() {
      return true;
    }

    let needle =
      needle.to_lowercase();
    event
      .title
      .to_lowercase()
      .contains(&needle)
      || event
        .description
        .as_deref()
        .is_some_and(|text| {
          text
            .to_lowercase()
            .contains(&needle)
        })
  }

  #[tracing::instrument(skip(
    self, events
  ))]
  pub fn apply(
    &self,
    events: &[Event]
  ) -> Vec<Event> {
    let kept = events
      .iter()
      .filter(|event| self.matches(event))
      .cloned()
      .collect::<Vec<_>>();
    trace!(
      before = events.len(),
      after = kept.len(),
      "filtered events"
    );
    kept
  }
}

/// Totals shown next to each filter
/// chip; always over the unfiltered
/// list.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize
)]
pub struct CategoryCounts {
  pub all:         usize,
  pub by_category:
    BTreeMap<EventCategory, usize>
}

impl CategoryCounts {
  pub fn get(
    &self,
    category: EventCategory
  ) -> usize {
    self
      .by_category
      .get(&category)
      .copied()
      .unwrap_or(0)
  }
}

pub fn category_counts(
  events: &[Event]
) -> CategoryCounts {
  let mut by_category = EventCategory::ALL
    .into_iter()
    .map(|category| (category, 0))
    .collect::<BTreeMap<_, _>>();

  for event in events {
    *by_category
      .entry(event.category)
      .or_insert(0) += 1;
  }

  CategoryCounts {
    all: events.len(),
    by_category
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    NaiveDateTime
  };

  use super::{
    CategoryFilter,
    EventFilter,
    category_counts
  };
  use crate::event::{
    Event,
    EventCategory
  };

  fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
      .unwrap()
      .and_hms_opt(hour, 0, 0)
      .unwrap()
  }

  fn event(
    id: &str,
    title: &str,
    description: Option<&str>,
    category: EventCategory
  ) -> Event {
    Event {
      id: id.to_string(),
      title: title.to_string(),
      description: description
        .map(str::to_string),
      start: at(9),
      end: at(10),
      color: "#0ea5e9".to_string(),
      category
    }
  }

  fn sample() -> Vec<Event> {
    vec![
      event(
        "1",
        "Team Standup",
        Some("Daily team sync"),
        EventCategory::Meeting
      ),
      event(
        "2",
        "Code Review",
        None,
        EventCategory::Work
      ),
      event(
        "3",
        "Lunch Break",
        Some("Time to eat"),
        EventCategory::Personal
      ),
    ]
  }

  #[test]
  fn empty_filter_keeps_everything() {
    let filter = EventFilter::default();
    assert!(!filter.is_active());
    assert_eq!(filter.apply(&sample()).len(), 3);
  }

  #[test]
  fn search_hits_title_or_description_case_insensitively()
   {
    let mut filter = EventFilter::default();

    filter.set_query("  SYNC ");
    let hits = filter.apply(&sample());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "1");

    filter.set_query("review");
    assert_eq!(filter.apply(&sample())[0].id, "2");
  }

  #[test]
  fn category_and_query_combine() {
    let filter = EventFilter::new(
      "e",
      CategoryFilter::Only(
        EventCategory::Work
      )
    );
    let hits = filter.apply(&sample());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "2");
  }

  #[test]
  fn category_filter_parses_all_and_keys()
   {
    assert_eq!(
      CategoryFilter::parse("ALL"),
      Some(CategoryFilter::All)
    );
    assert_eq!(
      CategoryFilter::parse("reminder"),
      Some(CategoryFilter::Only(
        EventCategory::Reminder
      ))
    );
    assert_eq!(
      CategoryFilter::parse("nope"),
      None
    );
  }

  #[test]
  fn counts_include_empty_categories() {
    let counts = category_counts(&sample());
    assert_eq!(counts.all, 3);
    assert_eq!(
      counts.get(EventCategory::Meeting),
      1
    );
    assert_eq!(
      counts.get(EventCategory::Reminder),
      0
    );
    assert_eq!(counts.by_category.len(), 5);
  }

  #[test]
  fn set_category_narrows_apply() {
    let mut filter = EventFilter::default();
    assert_eq!(filter.apply(&sample()).len(), 3);

    filter.set_category(
      CategoryFilter::Only(
        EventCategory::Personal
      )
    );
    assert!(filter.is_active());
    let hits = filter.apply(&sample());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3");

    filter.set_category(
      CategoryFilter::Only(
        EventCategory::Reminder
      )
    );
    assert!(filter.apply(&sample()).is_empty());

    filter.set_category(CategoryFilter::All);
    assert!(!filter.is_active());
    assert_eq!(filter.apply(&sample()).len(), 3);
  }
}
