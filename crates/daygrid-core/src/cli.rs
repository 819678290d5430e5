use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::filter::CategoryFilter;
use crate::theme::ThemeMode;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "daygrid",
    version,
    about = "Day-grid event layout for calendar views",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Path to daygrid.toml
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Override a config key, e.g. --set day.start_hour=8
    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<KeyVal>,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Lay out the events of one day into columns
    Layout {
        /// JSON array of events
        #[arg(long)]
        events: PathBuf,

        /// Day to lay out (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Category chip: all, work, meeting, personal, reminder, other
        #[arg(long, default_value = "all", value_parser = parse_category)]
        category: CategoryFilter,

        /// Case-insensitive search on title and description
        #[arg(long, default_value = "")]
        search: String,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the time slots of the configured day range
    Slots,
    /// Print the month grid with per-day event counts
    Month {
        #[arg(long)]
        events: PathBuf,

        /// Any day of the month to show; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "all", value_parser = parse_category)]
        category: CategoryFilter,

        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print event statistics and category counts
    Stats {
        #[arg(long)]
        events: PathBuf,
    },
    /// Show or change the saved theme (light, dark, auto)
    Theme {
        /// Mode to save
        #[arg(value_parser = parse_theme, conflicts_with = "toggle")]
        mode: Option<ThemeMode>,

        /// Cycle light -> dark -> auto and save
        #[arg(long)]
        toggle: bool,
    },
}

fn parse_category(raw: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(raw).ok_or_else(|| format!("unknown category: {raw}"))
}

fn parse_theme(raw: &str) -> Result<ThemeMode, String> {
    ThemeMode::from_key(raw).ok_or_else(|| format!("unknown theme: {raw}"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
