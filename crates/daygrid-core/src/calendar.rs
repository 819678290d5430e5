use chrono::{
  Datelike,
  Days,
  Months,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::event::Event;

const MONTH_GRID_CELLS: usize = 42;
const WEEK_DAYS: usize = 7;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
  #[default]
  Month,
  Week
}

impl ViewType {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Month => "month",
      | Self::Week => "week"
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "month" => Some(Self::Month),
      | "week" => Some(Self::Week),
      | _ => None
    }
  }
}

/// One cell of the month or week grid.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize
)]
pub struct CalendarDay {
  pub date:             NaiveDate,
  pub is_current_month: bool,
  pub is_today:         bool,
  pub events:           Vec<Event>
}

/// Current date and view of the
/// calendar header controls.
#[derive(Debug, Clone)]
pub struct CalendarNavigator {
  current: NaiveDate,
  view:    ViewType
}

impl CalendarNavigator {
  pub fn new(
    current: NaiveDate,
    view: ViewType
  ) -> Self {
    Self {
      current,
      view
    }
  }

  pub fn current(&self) -> NaiveDate {
    self.current
  }

  pub fn view(&self) -> ViewType {
    self.view
  }

  pub fn set_date(
    &mut self,
    date: NaiveDate
  ) {
    self.current = date;
  }

  pub fn switch_view(
    &mut self,
    view: ViewType
  ) {
    self.view = view;
  }

  pub fn today(
    &mut self,
    today: NaiveDate
  ) {
    self.current = today;
  }

  pub fn previous(&mut self) {
    self.current = match self.view {
      | ViewType::Month => self
        .current
        .checked_sub_months(Months::new(
          1
        )),
      | ViewType::Week => self
        .current
        .checked_sub_days(Days::new(
          WEEK_DAYS as u64
        ))
    }
    .unwrap_or(self.current);
    debug!(current = %self.current, view = self.view.as_key(), "navigated back");
  }

  pub fn next(&mut self) {
    self.current = match self.view {
      | ViewType::Month => self
        .current
        .checked_add_months(Months::new(
          1
        )),
      | ViewType::Week => self
        .current
        .checked_add_days(Days::new(
          WEEK_DAYS as u64
        ))
    }
    .unwrap_or(self.current);
    debug!(current = %self.current, view = self.view.as_key(), "navigated forward");
  }

  /// Cells for the active view.
  pub fn days(
    &self,
    today: NaiveDate,
    events: &[Event]
  ) -> Vec<CalendarDay> {
    match self.view {
      | ViewType::Month => {
        month_grid(
          self.current,
          today,
          events
        )
      }
      | ViewType::Week => {
        week_days(
          self.current,
          today,
          events
        )
      }
    }
  }
}

/// Sunday on or before `date`.
pub fn week_start(
  date: NaiveDate
) -> NaiveDate {
  let back = u64::from(
    date
      .weekday()
      .num_days_from_sunday()
  );
  date
    .checked_sub_days(Days::new(back))
    .unwrap_or(date)
}

/// Six Sunday-started weeks covering the
/// month of `anchor`.
pub fn month_grid(
  anchor: NaiveDate,
  today: NaiveDate,
  events: &[Event]
) -> Vec<CalendarDay> {
  let first =
    anchor.with_day(1).unwrap_or(anchor);
  build_days(
    week_start(first),
    MONTH_GRID_CELLS,
    anchor.month(),
    today,
    events
  )
}

/// The Sunday-started week containing
/// `anchor`.
pub fn week_days(
  anchor: NaiveDate,
  today: NaiveDate,
  events: &[Event]
) -> Vec<CalendarDay> {
  build_days(
    week_start(anchor),
    WEEK_DAYS,
    anchor.month(),
    today,
    events
  )
}

fn build_days(
  first: NaiveDate,
  count: usize,
  month: u32,
  today: NaiveDate,
  events: &[Event]
) -> Vec<CalendarDay> {
  first
    .iter_days()
    .take(count)
    .map(|date| {
      CalendarDay {
        date,
        is_current_month: date.month()
          == month,
        is_today: date == today,
        events: events_starting_on(
          events, date
        )
      }
    })
    .collect()
}

fn events_starting_on(
  events: &[Event],
  date: NaiveDate
) -> Vec<Event> {
  let mut out = events
    .iter()
    .filter(|event| {
      event.start.date() == date
    })
    .cloned()
    .collect::<Vec<_>>();
  out.sort_by(|a, b| {
    a.start
      .cmp(&b.start)
      .then_with(|| a.id.cmp(&b.id))
  });
  out
}
