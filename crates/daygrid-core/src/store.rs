use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::event::{Event, EventDraft};

/// In-memory event list behind the calendar views.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Events starting on `day`, earliest first.
    pub fn events_on(&self, day: NaiveDate) -> Vec<Event> {
        let mut out = self
            .events
            .iter()
            .filter(|event| event.start.date() == day)
            .cloned()
            .collect::<Vec<_>>();
        out.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        out
    }

    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub fn add(&mut self, draft: EventDraft) -> Result<&Event, StoreError> {
        draft.validate().map_err(StoreError::Invalid)?;

        let id = format!("event-{}", Uuid::new_v4());
        info!(%id, "adding event");
        self.events.push(draft.into_event(id));

        let idx = self.events.len() - 1;
        Ok(&self.events[idx])
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn update(&mut self, id: &str, draft: EventDraft) -> Result<&Event, StoreError> {
        draft.validate().map_err(StoreError::Invalid)?;

        let idx = self.index_of(id)?;
        debug!(%id, "updating event");
        self.events[idx] = draft.into_event(id.to_string());
        Ok(&self.events[idx])
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Event, StoreError> {
        let idx = self.index_of(id)?;
        info!(%id, "deleting event");
        Ok(self.events.remove(idx))
    }

    pub fn replace_all(&mut self, events: Vec<Event>) {
        debug!(count = events.len(), "replacing event list");
        self.events = events;
    }

    /// Moves an event to `day`, keeping its wall-clock start and duration.
    #[tracing::instrument(skip(self))]
    pub fn reschedule(&mut self, id: &str, day: NaiveDate) -> Result<&Event, StoreError> {
        let idx = self.index_of(id)?;
        let event = &mut self.events[idx];

        let duration = event.end - event.start;
        let start = day.and_time(event.start.time());
        event.start = start;
        event.end = start + duration;

        info!(%id, start = %event.start, end = %event.end, "rescheduled event");
        Ok(&self.events[idx])
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Pick-up-and-drop rescheduling: `start` an event, then `drop_on` a day.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    dragged: Option<String>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn start(&mut self, store: &EventStore, id: &str) -> Result<(), StoreError> {
        if store.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(%id, "drag started");
        self.dragged = Some(id.to_string());
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.dragged = None;
    }

    /// Ends the drag on `day`. The drag is cleared even when the drop fails.
    pub fn drop_on(&mut self, store: &mut EventStore, day: NaiveDate) -> Result<Event, StoreError> {
        let id = self.dragged.take().ok_or(StoreError::NothingDragged)?;
        store.reschedule(&id, day).cloned()
    }
}
