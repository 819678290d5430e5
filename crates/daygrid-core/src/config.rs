use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::ConfigError;
use crate::theme::ThemeMode;

const CONFIG_ENV_VAR: &str =
  "DAYGRID_CONFIG";
const CONFIG_FILE_NAME: &str =
  "daygrid.toml";

const DEFAULT_START_HOUR: u32 = 0;
const DEFAULT_END_HOUR: u32 = 24;
const DEFAULT_SLOT_MINUTES: u32 = 30;
const DEFAULT_PIXELS_PER_HOUR: f64 =
  60.0;
const DEFAULT_MIN_EVENT_HEIGHT: f64 =
  20.0;

/// Visible hour span and slot
/// granularity of one day column.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(default)]
pub struct DayTimeRange {
  pub start_hour:       u32,
  pub end_hour:         u32,
  pub slot_minutes:     u32,
  pub pixels_per_hour:  f64,
  pub min_event_height: f64
}

impl Default for DayTimeRange {
  fn default() -> Self {
    Self {
      start_hour:       DEFAULT_START_HOUR,
      end_hour:         DEFAULT_END_HOUR,
      slot_minutes:
        DEFAULT_SLOT_MINUTES,
      pixels_per_hour:
        DEFAULT_PIXELS_PER_HOUR,
      min_event_height:
        DEFAULT_MIN_EVENT_HEIGHT
    }
  }
}

impl DayTimeRange {
  pub fn total_minutes(&self) -> i64 {
    i64::from(
      self
        .end_hour
        .saturating_sub(self.start_hour)
    ) * 60
  }

  pub fn pixels_per_minute(
    &self
  ) -> f64 {
    self.pixels_per_hour / 60.0
  }

  pub fn total_height(&self) -> f64 {
    self.total_minutes() as f64
      * self.pixels_per_minute()
  }

  /// Slot step in minutes, falling back
  /// to the default when
  /// `slot_minutes` does not divide an
  /// hour.
  pub fn slot_step(&self) -> u32 {
    if slot_minutes_valid(
      self.slot_minutes
    ) {
      self.slot_minutes
    } else {
      DEFAULT_SLOT_MINUTES
    }
  }

  /// Pulls every field back into a
  /// usable range. Returns `true` when
  /// anything was corrected.
  pub fn sanitize(&mut self) -> bool {
    let before = *self;

    if self.start_hour > 23 {
      warn!(
        start_hour = self.start_hour,
        "start_hour out of range; \
         clamping to 23"
      );
      self.start_hour = 23;
    }
    if self.end_hour > 24 {
      warn!(
        end_hour = self.end_hour,
        "end_hour out of range; \
         clamping to 24"
      );
      self.end_hour = 24;
    }
    if self.end_hour <= self.start_hour
    {
      warn!(
        start_hour = self.start_hour,
        end_hour = self.end_hour,
        "end_hour must be after \
         start_hour; extending by one \
         hour"
      );
      self.end_hour =
        self.start_hour + 1;
    }

    if !slot_minutes_valid(
      self.slot_minutes
    ) {
      warn!(
        slot_minutes =
          self.slot_minutes,
        "slot_minutes must divide an \
         hour; using default"
      );
      self.slot_minutes =
        DEFAULT_SLOT_MINUTES;
    }

    if !self.pixels_per_hour.is_finite()
      || self.pixels_per_hour <= 0.0
    {
      warn!(
        pixels_per_hour =
          self.pixels_per_hour,
        "pixels_per_hour must be \
         positive; using default"
      );
      self.pixels_per_hour =
        DEFAULT_PIXELS_PER_HOUR;
    }

    if !self.min_event_height.is_finite()
    {
      warn!(
        "min_event_height is not \
         finite; using default"
      );
      self.min_event_height =
        DEFAULT_MIN_EVENT_HEIGHT;
    } else if self.min_event_height
      < 0.0
    {
      warn!(
        min_event_height =
          self.min_event_height,
        "min_event_height is \
         negative; clamping to 0"
      );
      self.min_event_height = 0.0;
    }

    before != *self
  }
}

fn slot_minutes_valid(
  slot_minutes: u32
) -> bool {
  slot_minutes != 0
    && 60 % slot_minutes == 0
}

/// Presentation preferences kept in
/// the `[ui]` table.
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
#[serde(default)]
pub struct UiConfig {
  pub theme: ThemeMode
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize
)]
#[serde(default)]
struct ConfigFile {
  day: DayTimeRange,
  ui:  UiConfig
}

#[derive(Debug, Clone, Default)]
pub struct Config {
  pub day:         DayTimeRange,
  pub ui:          UiConfig,
  pub loaded_file: Option<PathBuf>
}

impl Config {
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(override_path)
    else {
      warn!(
        "no daygrid.toml found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let text =
      fs::read_to_string(&path)
        .map_err(ConfigError::from)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    let mut cfg = Self::from_toml(&text)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })?;
    cfg.loaded_file = Some(path);
    Ok(cfg)
  }

  pub fn from_toml(
    text: &str
  ) -> Result<Self, ConfigError> {
    let file: ConfigFile =
      toml::from_str(text)?;
    let mut cfg = Self {
      day:         file.day,
      ui:          file.ui,
      loaded_file: None
    };
    cfg.day.sanitize();
    Ok(cfg)
  }

  pub fn to_toml(
    &self
  ) -> Result<String, ConfigError> {
    let file = ConfigFile {
      day: self.day,
      ui:  self.ui
    };
    Ok(toml::to_string_pretty(&file)?)
  }

  /// Where `save` writes: the file this
  /// config was loaded from, else the
  /// per-user default location.
  pub fn save_path(
    &self
  ) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &self.loaded_file
    {
      return Ok(path.clone());
    }
    dirs::config_dir()
      .map(|dir| {
        dir
          .join("daygrid")
          .join(CONFIG_FILE_NAME)
      })
      .ok_or(ConfigError::NoConfigDir)
  }

  /// Writes the config back to disk,
  /// creating parent directories.
  #[tracing::instrument(skip(self))]
  pub fn save(
    &self,
    path: &Path
  ) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
    {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, self.to_toml()?)?;
    info!(config = %path.display(), theme = %self.ui.theme, "saved config");
    Ok(())
  }

  /// Applies `key=value` overrides and
  /// re-sanitizes the day range. Keys
  /// may carry their table prefix
  /// (`day.start_hour`, `ui.theme`).
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> Result<(), ConfigError>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let (table, name) =
        match k.split_once('.') {
          | Some((table, name)) => {
            (Some(table), name)
          }
          | None => (None, k.as_str())
        };
      debug!(key = %k, value = %v, "applying override");

      let value = v.trim();
      match (table, name) {
        | (None | Some("day"), "start_hour") => {
          self.day.start_hour =
            parse_value(&k, value)?
        }
        | (None | Some("day"), "end_hour") => {
          self.day.end_hour =
            parse_value(&k, value)?
        }
        | (None | Some("day"), "slot_minutes") => {
          self.day.slot_minutes =
            parse_value(&k, value)?
        }
        | (None | Some("day"), "pixels_per_hour") => {
          self.day.pixels_per_hour =
            parse_value(&k, value)?
        }
        | (None | Some("day"), "min_event_height") => {
          self.day.min_event_height =
            parse_value(&k, value)?
        }
        | (None | Some("ui"), "theme") => {
          self.ui.theme =
            ThemeMode::from_key(value)
              .ok_or_else(|| {
                ConfigError::InvalidValue {
                  key:   k.clone(),
                  value: value.to_string()
                }
              })?
        }
        | _ => {
          return Err(
            ConfigError::UnknownKey(
              k.clone()
            )
          );
        }
      }
    }

    self.day.sanitize();
    Ok(())
  }
}

fn parse_value<T: std::str::FromStr>(
  key: &str,
  value: &str
) -> Result<T, ConfigError> {
  value.parse::<T>().map_err(|_| {
    ConfigError::InvalidValue {
      key:   key.to_string(),
      value: value.to_string()
    }
  })
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  let candidate = dirs::config_dir()?
    .join("daygrid")
    .join(CONFIG_FILE_NAME);
  candidate
    .exists()
    .then_some(candidate)
}
