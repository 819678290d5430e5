pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod layout;
pub mod render;
pub mod stats;
pub mod store;
pub mod theme;

use std::ffi::OsString;
use std::fs;
use std::io::{
  self,
  Write
};
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::cli::Command;
use crate::event::Event;
use crate::filter::EventFilter;
use crate::store::EventStore;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting daygrid"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg
    .apply_overrides(
      cli
        .overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
    .context(
      "failed to apply config \
       overrides"
    )?;
  debug!(day = ?cfg.day, "effective day range");

  let renderer = render::Renderer::new(
    !cli.no_color,
    cfg.ui.theme.resolve_from_env()
  );
  let mut out = io::stdout().lock();

  match cli.command {
    | Command::Layout {
      events,
      date,
      category,
      search,
      json
    } => {
      let store = EventStore::new(
        load_events(&events)?
      );
      let filter =
        EventFilter::new(search, category);
      let day_events =
        filter.apply(&store.events_on(date));

      let day_layout = layout::layout_day(
        date,
        &day_events,
        &cfg.day
      )
      .with_context(|| {
        format!(
          "failed to lay out {date}"
        )
      })?;

      if json {
        serde_json::to_writer_pretty(
          &mut out,
          &day_layout
        )?;
        writeln!(out)?;
      } else {
        renderer.print_day_layout(
          &mut out,
          &day_layout,
          &day_events
        )?;
      }
    }
    | Command::Slots => {
      renderer.print_slots(
        &mut out,
        &layout::time_slots(&cfg.day)
      )?;
    }
    | Command::Month {
      events,
      date,
      category,
      search
    } => {
      let filter =
        EventFilter::new(search, category);
      let events =
        filter.apply(&load_events(&events)?);
      let today =
        Local::now().date_naive();
      let days = calendar::month_grid(
        date.unwrap_or(today),
        today,
        &events
      );
      renderer
        .print_month(&mut out, &days)?;
    }
    | Command::Stats {
      events
    } => {
      let events = load_events(&events)?;
      let stats =
        stats::EventStats::compute(
          &events,
          Local::now().naive_local()
        );
      let counts =
        filter::category_counts(&events);
      renderer.print_stats(
        &mut out, &stats, &counts
      )?;
    }
    | Command::Theme {
      mode,
      toggle
    } => {
      let next = mode.or(
        toggle
          .then_some(cfg.ui.theme.toggle())
      );

      if let Some(next) = next {
        // --set overrides stay out of
        // the saved file.
        let mut saved =
          config::Config::load(
            cli.config.as_deref()
          )?;
        saved.ui.theme = next;
        let path = saved.save_path()?;
        saved.save(&path).with_context(
          || {
            format!(
              "failed to save {}",
              path.display()
            )
          }
        )?;
        cfg.ui.theme = next;
      }

      writeln!(
        out,
        "{} ({})",
        cfg.ui.theme,
        cfg
          .ui
          .theme
          .resolve_from_env()
          .as_key()
      )?;
    }
  }

  info!("done");
  Ok(())
}

/// Reads a JSON array of events.
#[tracing::instrument]
pub fn load_events(
  path: &Path
) -> anyhow::Result<Vec<Event>> {
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let events: Vec<Event> =
    serde_json::from_str(&text)
      .with_context(|| {
        format!(
          "failed to parse events from \
           {}",
          path.display()
        )
      })?;
  debug!(count = events.len(), "loaded events");
  Ok(events)
}
